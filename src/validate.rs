//! Submission gate for the student form. Required top-level fields are
//! checked first and reported all at once; the conditional academic sections
//! are checked after, in order, stopping at the first incomplete one.
//! Nothing here touches the store; a failing draft is preserved unchanged.

use chrono::NaiveDate;

use crate::draft::Draft;
use crate::model::label_of;

/// Memory names of the fields that must be non-empty before any submit.
const REQUIRED: &[&str] = &[
    "fullName",
    "dateOfBirth",
    "gender",
    "parentGuardianName",
    "parentContact",
    "address",
    "aadharNumber",
    "studentContact",
    "email",
    "targetExams",
    "preparationLevel",
    "mediumOfInstruction",
    "startDate",
    "endDate",
];

const DATE_FIELDS: &[&str] = &["dateOfBirth", "startDate", "endDate"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Sslc,
    Hsc,
    Ug,
    Pg,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Sslc, Section::Hsc, Section::Ug, Section::Pg];

    pub fn flag(self) -> &'static str {
        match self {
            Self::Sslc => "hasSchoolSslc",
            Self::Hsc => "hasHsc",
            Self::Ug => "hasUg",
            Self::Pg => "hasPg",
        }
    }

    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Sslc => &["sslcSchool", "sslcBoard", "sslcYear", "sslcPercentage"],
            Self::Hsc => &["hscCollege", "hscBoard", "hscYear", "hscPercentage", "hscStream"],
            Self::Ug => &["ugCourse", "ugCollege", "ugYear", "ugPercentage"],
            Self::Pg => &["pgCourse", "pgCollege", "pgYear", "pgPercentage"],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Sslc => "School/SSLC (10th Grade)",
            Self::Hsc => "HSC/12th Grade",
            Self::Ug => "Under Graduate (UG)",
            Self::Pg => "Post Graduate (PG)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Labels of every empty required top-level field.
    MissingFields(Vec<&'static str>),
    /// A single field is present but malformed; carries the full user message.
    BadFormat(String),
    /// The first enabled section with an empty required sub-field.
    IncompleteSection(Section),
}

impl ValidationError {
    pub fn message(&self) -> String {
        match self {
            Self::MissingFields(labels) => {
                format!("Please fill in the required fields: {}", labels.join(", "))
            }
            Self::BadFormat(message) => message.clone(),
            Self::IncompleteSection(section) => {
                format!("Please complete the {} section", section.title())
            }
        }
    }
}

fn text(draft: &Draft, name: &str) -> String {
    draft
        .get(name)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn flag(draft: &Draft, name: &str) -> bool {
    draft.get(name).and_then(|v| v.as_bool()).unwrap_or(false)
}

fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn check(draft: &Draft) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = REQUIRED
        .iter()
        .filter(|name| text(draft, name).is_empty())
        .map(|name| label_of(name))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    // Format checks only run once everything required is present. Aadhar is
    // deliberately not pattern-checked here: the admin records partial or
    // masked numbers from paper applications.
    for name in ["studentContact", "parentContact"] {
        if digits_only(&text(draft, name)).len() != 10 {
            return Err(ValidationError::BadFormat(format!(
                "Please enter a valid 10-digit phone number for {}.",
                label_of(name)
            )));
        }
    }
    let email = text(draft, "email");
    if !looks_like_email(&email) {
        return Err(ValidationError::BadFormat(
            "Please enter a valid email address.".to_string(),
        ));
    }
    for name in DATE_FIELDS {
        let raw = text(draft, name);
        if NaiveDate::parse_from_str(&raw, "%Y-%m-%d").is_err() {
            return Err(ValidationError::BadFormat(format!(
                "Please enter a valid date for {}.",
                label_of(name)
            )));
        }
    }

    for section in Section::ALL {
        if !flag(draft, section.flag()) {
            continue;
        }
        let incomplete = section
            .required_fields()
            .iter()
            .any(|name| text(draft, name).is_empty());
        if incomplete {
            return Err(ValidationError::IncompleteSection(section));
        }
    }

    Ok(())
}

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !s.contains(char::is_whitespace)
}
