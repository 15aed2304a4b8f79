//! Logical content addresses
//!
//! Content lives at `{data_root}/{year}/{subject}/{file}` on the origin.

use crate::content::document::ContentDocument;
use crate::error::{MediError, MediResult};
use crate::request::RequestKey;
use std::fmt;
use std::str::FromStr;

/// Default root of the content hierarchy
pub const DEFAULT_DATA_ROOT: &str = "/data";

/// Kind of study content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Cours
    Lecture,
    /// QCM
    Quiz,
    /// Annales
    Exam,
}

impl ContentKind {
    /// Index file listing a subject's content of this kind
    pub fn index_file(&self) -> &'static str {
        match self {
            Self::Lecture => "lectures.json",
            Self::Quiz => "quizzes.json",
            Self::Exam => "exams.json",
        }
    }

    /// Label shown to students
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lecture => "COURS",
            Self::Quiz => "QCM",
            Self::Exam => "ANNALES",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lecture => "lecture",
            Self::Quiz => "quiz",
            Self::Exam => "exam",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ContentKind {
    type Err = MediError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lecture" | "lectures" | "cours" => Ok(Self::Lecture),
            "quiz" | "quizzes" | "qcm" => Ok(Self::Quiz),
            "exam" | "exams" | "annales" => Ok(Self::Exam),
            other => Err(MediError::InvalidAddress(format!(
                "unknown content kind '{}'. Valid kinds: lecture, quiz, exam",
                other
            ))),
        }
    }
}

/// Coordinates of one content file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentAddress {
    pub year_id: String,
    pub subject_id: String,
    pub kind: ContentKind,
    pub file_name: String,
}

impl ContentAddress {
    /// Build an address, rejecting segments that would escape the hierarchy
    pub fn new(
        year_id: impl Into<String>,
        subject_id: impl Into<String>,
        kind: ContentKind,
        file_name: impl Into<String>,
    ) -> MediResult<Self> {
        let address = Self {
            year_id: year_id.into(),
            subject_id: subject_id.into(),
            kind,
            file_name: file_name.into(),
        };

        for (name, value) in [
            ("year", &address.year_id),
            ("subject", &address.subject_id),
            ("file", &address.file_name),
        ] {
            validate_segment(name, value)?;
        }

        Ok(address)
    }

    /// Address of the index file for a subject and kind
    pub fn index(year_id: &str, subject_id: &str, kind: ContentKind) -> MediResult<Self> {
        Self::new(year_id, subject_id, kind, kind.index_file())
    }

    /// Request key under the default data root
    pub fn request_key(&self) -> RequestKey {
        self.request_key_under(DEFAULT_DATA_ROOT)
    }

    /// Request key under a custom data root
    pub fn request_key_under(&self, data_root: &str) -> RequestKey {
        RequestKey::new(&format!(
            "{}/{}/{}/{}",
            data_root.trim_end_matches('/'),
            self.year_id,
            self.subject_id,
            self.file_name
        ))
    }
}

fn validate_segment(name: &str, value: &str) -> MediResult<()> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '?', '#']);

    if invalid {
        Err(MediError::InvalidAddress(format!(
            "{} segment '{}' must be a single path component",
            name, value
        )))
    } else {
        Ok(())
    }
}

/// What a view asks the resolver for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRequest {
    /// A document to fetch
    File(ContentAddress),
    /// A document already in hand; never fetched
    Embedded(ContentDocument),
}
