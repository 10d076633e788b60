use serde::Deserialize;

use crate::api::StudentsApi;
use crate::draft::Draft;
use crate::session::Session;
use crate::store::RecordStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub api: Option<Box<dyn StudentsApi>>,
    pub session: Session,
    pub store: RecordStore,
    pub draft: Option<Draft>,
    /// Set while the form edits an existing record; submit picks update
    /// over create on its presence.
    pub editing_id: Option<i64>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            api: None,
            session: Session::new(),
            store: RecordStore::new(),
            draft: None,
            editing_id: None,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
