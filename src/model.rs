use serde::{Deserialize, Serialize};

/// Closed option sets offered by the registration form. Kept as real enums so
/// the table projection and the form can never drift apart on tokens.
pub trait ClosedEnum: Sized + Copy {
    fn parse(s: &str) -> Option<Self>;
    fn as_str(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl ClosedEnum for Gender {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    Cbse,
    Icse,
    StateBoard,
    Other,
}

impl ClosedEnum for Board {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "cbse" => Some(Self::Cbse),
            "icse" => Some(Self::Icse),
            "state-board" => Some(Self::StateBoard),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Cbse => "cbse",
            Self::Icse => "icse",
            Self::StateBoard => "state-board",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Science,
    Commerce,
    Arts,
}

impl ClosedEnum for Stream {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "science" => Some(Self::Science),
            "commerce" => Some(Self::Commerce),
            "arts" => Some(Self::Arts),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Science => "science",
            Self::Commerce => "commerce",
            Self::Arts => "arts",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medium {
    Tamil,
    English,
    Hindi,
}

impl ClosedEnum for Medium {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "tamil" => Some(Self::Tamil),
            "english" => Some(Self::English),
            "hindi" => Some(Self::Hindi),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Tamil => "tamil",
            Self::English => "english",
            Self::Hindi => "hindi",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreparationLevel {
    Beginner,
    Intermediate,
    Advanced,
    Revision,
}

impl ClosedEnum for PreparationLevel {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            "revision" => Some(Self::Revision),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Revision => "revision",
        }
    }
}

/// Serde adapter for optional closed enums. The form keeps unset selects as
/// an empty string, so `None` serializes to `""` and `""`/null parse to `None`.
/// An unknown token is a hard error, never silently kept.
pub mod blank_enum {
    use super::ClosedEnum;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: ClosedEnum,
        S: Serializer,
    {
        serializer.serialize_str(value.map(ClosedEnum::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: ClosedEnum,
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if raw.is_empty() {
            return Ok(None);
        }
        T::parse(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown option: {}", raw)))
    }
}

/// The persisted student entity. `id` is assigned by the server on create and
/// never changes. Everything else is optional at the storage layer; which
/// subset must be filled in is the validation gate's policy, not the model's.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentRecord {
    pub id: i64,

    // Personal information
    pub full_name: String,
    pub date_of_birth: String,
    #[serde(with = "blank_enum")]
    pub gender: Option<Gender>,
    pub parent_guardian_name: String,
    pub student_contact: String,
    pub parent_contact: String,
    pub email: String,
    pub address: String,
    pub aadhar_number: String,
    pub aadhar_photo: String,

    // Flat academic summary kept from the older form layout
    pub school_college_name: String,
    pub class_grade: String,
    pub board_university: String,
    pub academic_records: String,
    #[serde(with = "blank_enum")]
    pub medium_of_instruction: Option<Medium>,

    // School/SSLC (10th grade) section
    pub has_school_sslc: bool,
    pub sslc_school: String,
    #[serde(with = "blank_enum")]
    pub sslc_board: Option<Board>,
    pub sslc_year: String,
    pub sslc_percentage: String,

    // HSC (12th grade) section
    pub has_hsc: bool,
    pub hsc_college: String,
    #[serde(with = "blank_enum")]
    pub hsc_board: Option<Board>,
    #[serde(with = "blank_enum")]
    pub hsc_stream: Option<Stream>,
    pub hsc_year: String,
    pub hsc_percentage: String,

    // Undergraduate section
    pub has_ug: bool,
    pub ug_course: String,
    pub ug_college: String,
    pub ug_specialization: String,
    pub ug_year: String,
    pub ug_percentage: String,

    // Postgraduate section
    pub has_pg: bool,
    pub pg_course: String,
    pub pg_college: String,
    pub pg_specialization: String,
    pub pg_year: String,
    pub pg_percentage: String,

    // Competitive exam focus
    pub target_exams: String,
    pub preferred_subjects: String,
    #[serde(with = "blank_enum")]
    pub preparation_level: Option<PreparationLevel>,
    pub coaching_package: String,
    pub start_date: String,
    pub end_date: String,

    pub photo: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Date,
    Enum,
    Bool,
    Image,
}

/// One row of the field registry: the in-memory (camelCase) name, the wire
/// (snake_case) name used by the persistence API, the user-facing label and
/// the semantic kind. This table is the single source of truth for field
/// names; the draft defaults, the wire translation and the validation labels
/// are all derived from it.
pub struct FieldSpec {
    pub name: &'static str,
    pub wire: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "fullName", wire: "full_name", label: "Full Name", kind: FieldKind::Text },
    FieldSpec { name: "dateOfBirth", wire: "date_of_birth", label: "Date of Birth", kind: FieldKind::Date },
    FieldSpec { name: "gender", wire: "gender", label: "Gender", kind: FieldKind::Enum },
    FieldSpec { name: "parentGuardianName", wire: "parent_guardian_name", label: "Parent/Guardian Name", kind: FieldKind::Text },
    FieldSpec { name: "studentContact", wire: "student_contact", label: "Student Contact Number", kind: FieldKind::Text },
    FieldSpec { name: "parentContact", wire: "parent_contact", label: "Parent/Guardian Contact", kind: FieldKind::Text },
    FieldSpec { name: "email", wire: "email", label: "Email Address", kind: FieldKind::Text },
    FieldSpec { name: "address", wire: "address", label: "Residential Address", kind: FieldKind::LongText },
    FieldSpec { name: "aadharNumber", wire: "aadhar_number", label: "Aadhar Number", kind: FieldKind::Text },
    FieldSpec { name: "aadharPhoto", wire: "aadhar_photo", label: "Aadhar Card Photo", kind: FieldKind::Image },
    FieldSpec { name: "schoolCollegeName", wire: "school_college_name", label: "School/College Name", kind: FieldKind::Text },
    FieldSpec { name: "classGrade", wire: "class_grade", label: "Class/Grade", kind: FieldKind::Text },
    FieldSpec { name: "boardUniversity", wire: "board_university", label: "Board/University", kind: FieldKind::Text },
    FieldSpec { name: "academicRecords", wire: "academic_records", label: "Academic Records", kind: FieldKind::LongText },
    FieldSpec { name: "mediumOfInstruction", wire: "medium_of_instruction", label: "Medium of Instruction", kind: FieldKind::Enum },
    FieldSpec { name: "hasSchoolSslc", wire: "has_school_sslc", label: "School/SSLC (10th Grade)", kind: FieldKind::Bool },
    FieldSpec { name: "sslcSchool", wire: "sslc_school", label: "School Name", kind: FieldKind::Text },
    FieldSpec { name: "sslcBoard", wire: "sslc_board", label: "Board", kind: FieldKind::Enum },
    FieldSpec { name: "sslcYear", wire: "sslc_year", label: "Year of Completion", kind: FieldKind::Text },
    FieldSpec { name: "sslcPercentage", wire: "sslc_percentage", label: "Percentage/Grade", kind: FieldKind::Text },
    FieldSpec { name: "hasHsc", wire: "has_hsc", label: "HSC/12th Grade", kind: FieldKind::Bool },
    FieldSpec { name: "hscCollege", wire: "hsc_college", label: "College/School Name", kind: FieldKind::Text },
    FieldSpec { name: "hscBoard", wire: "hsc_board", label: "Board", kind: FieldKind::Enum },
    FieldSpec { name: "hscStream", wire: "hsc_stream", label: "Stream", kind: FieldKind::Enum },
    FieldSpec { name: "hscYear", wire: "hsc_year", label: "Year of Completion", kind: FieldKind::Text },
    FieldSpec { name: "hscPercentage", wire: "hsc_percentage", label: "Percentage/Grade", kind: FieldKind::Text },
    FieldSpec { name: "hasUg", wire: "has_ug", label: "Under Graduate (UG)", kind: FieldKind::Bool },
    FieldSpec { name: "ugCourse", wire: "ug_course", label: "Course Name", kind: FieldKind::Text },
    FieldSpec { name: "ugCollege", wire: "ug_college", label: "College Name", kind: FieldKind::Text },
    FieldSpec { name: "ugSpecialization", wire: "ug_specialization", label: "Specialization", kind: FieldKind::Text },
    FieldSpec { name: "ugYear", wire: "ug_year", label: "Year of Completion", kind: FieldKind::Text },
    FieldSpec { name: "ugPercentage", wire: "ug_percentage", label: "Percentage/CGPA", kind: FieldKind::Text },
    FieldSpec { name: "hasPg", wire: "has_pg", label: "Post Graduate (PG)", kind: FieldKind::Bool },
    FieldSpec { name: "pgCourse", wire: "pg_course", label: "Course Name", kind: FieldKind::Text },
    FieldSpec { name: "pgCollege", wire: "pg_college", label: "College Name", kind: FieldKind::Text },
    FieldSpec { name: "pgSpecialization", wire: "pg_specialization", label: "Specialization", kind: FieldKind::Text },
    FieldSpec { name: "pgYear", wire: "pg_year", label: "Year of Completion", kind: FieldKind::Text },
    FieldSpec { name: "pgPercentage", wire: "pg_percentage", label: "Percentage/CGPA", kind: FieldKind::Text },
    FieldSpec { name: "targetExams", wire: "target_exams", label: "Target Exams", kind: FieldKind::Text },
    FieldSpec { name: "preferredSubjects", wire: "preferred_subjects", label: "Preferred Subjects", kind: FieldKind::Text },
    FieldSpec { name: "preparationLevel", wire: "preparation_level", label: "Preparation Level", kind: FieldKind::Enum },
    FieldSpec { name: "coachingPackage", wire: "coaching_package", label: "Coaching Package/Batch", kind: FieldKind::Text },
    FieldSpec { name: "startDate", wire: "start_date", label: "Training Start Date", kind: FieldKind::Date },
    FieldSpec { name: "endDate", wire: "end_date", label: "Training End Date", kind: FieldKind::Date },
    FieldSpec { name: "photo", wire: "photo", label: "Student Photo", kind: FieldKind::Image },
];

pub fn field(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

pub fn label_of(name: &'static str) -> &'static str {
    field(name).map(|f| f.label).unwrap_or(name)
}
