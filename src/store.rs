//! The authoritative, server-synchronized collection of student records.
//! Every mutation is a single replace-or-append-or-remove applied only after
//! the remote call succeeds; any failure leaves the collection untouched.

use crate::api::{ApiError, StudentsApi};
use crate::model::StudentRecord;
use crate::session::Session;

pub struct RecordStore {
    records: Vec<StudentRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        RecordStore { records: Vec::new() }
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn get(&self, id: i64) -> Option<&StudentRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn bearer<'s>(session: &'s Session) -> Result<&'s str, ApiError> {
        session
            .bearer()
            .ok_or_else(|| ApiError::Auth("not logged in".to_string()))
    }

    /// Replace the collection with the server's. The caller treats an auth
    /// failure here as fatal for the operation and redirects to login.
    pub fn load_all(
        &mut self,
        api: &mut dyn StudentsApi,
        session: &Session,
    ) -> Result<usize, ApiError> {
        let bearer = Self::bearer(session)?;
        self.records = api.list(bearer)?;
        Ok(self.records.len())
    }

    /// Create on the server, then append the record it returns (which
    /// carries the newly assigned id).
    pub fn create(
        &mut self,
        api: &mut dyn StudentsApi,
        session: &Session,
        record: &StudentRecord,
    ) -> Result<StudentRecord, ApiError> {
        let bearer = Self::bearer(session)?;
        let saved = api.create(bearer, record)?;
        self.records.push(saved.clone());
        Ok(saved)
    }

    /// Update on the server, then replace the matching record in place.
    pub fn update(
        &mut self,
        api: &mut dyn StudentsApi,
        session: &Session,
        id: i64,
        record: &StudentRecord,
    ) -> Result<StudentRecord, ApiError> {
        let bearer = Self::bearer(session)?;
        let saved = api.update(bearer, id, record)?;
        match self.records.iter().position(|r| r.id == id) {
            Some(pos) => self.records[pos] = saved.clone(),
            // server knows it, we did not: adopt it
            None => self.records.push(saved.clone()),
        }
        Ok(saved)
    }

    /// Delete on the server, then remove locally. Interactive confirmation
    /// happens at the IPC boundary before this is ever called.
    pub fn delete(
        &mut self,
        api: &mut dyn StudentsApi,
        session: &Session,
        id: i64,
    ) -> Result<(), ApiError> {
        let bearer = Self::bearer(session)?;
        api.delete(bearer, id)?;
        self.records.retain(|r| r.id != id);
        Ok(())
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
