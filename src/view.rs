//! Pure table projection of the record store. No validation, no persistence;
//! the IPC layer dispatches edit/delete intents separately.

use serde_json::{json, Value};

use crate::model::{ClosedEnum, StudentRecord};

/// Derived education summary shown in the table, highest qualification
/// first: PG > UG > HSC > SSLC > flat class/grade > "Not specified".
pub fn highest_education(s: &StudentRecord) -> String {
    if s.has_pg {
        return format!("{} - {}", s.pg_course, s.pg_college);
    }
    if s.has_ug {
        return format!("{} - {}", s.ug_course, s.ug_college);
    }
    if s.has_hsc {
        let stream = s.hsc_stream.map(ClosedEnum::as_str).unwrap_or("");
        return format!("HSC {} - {}", stream, s.hsc_college);
    }
    if s.has_school_sslc {
        return format!("SSLC - {}", s.sslc_school);
    }
    if !s.class_grade.is_empty() {
        return s.class_grade.clone();
    }
    "Not specified".to_string()
}

pub fn row(s: &StudentRecord) -> Value {
    json!({
        "id": s.id,
        "name": s.full_name,
        "education": highest_education(s),
        "medium": s.medium_of_instruction.map(ClosedEnum::as_str).unwrap_or(""),
        "targetExams": if s.target_exams.is_empty() { "Not specified" } else { &s.target_exams },
        "contact": {
            "parentContact": s.parent_contact,
            "email": s.email,
        },
        "hasPhoto": !s.photo.is_empty(),
    })
}

pub fn rows(records: &[StudentRecord]) -> Vec<Value> {
    records.iter().map(row).collect()
}
