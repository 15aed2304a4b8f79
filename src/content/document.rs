//! Typed content documents
//!
//! Section and document kinds are closed enums: a section `type` that is
//! not listed here fails decoding instead of being silently skipped.

use crate::content::address::{ContentAddress, ContentKind, ContentRequest};
use crate::error::{MediError, MediResult};
use crate::request::RequestKey;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Highlighter colour of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Yellow,
    Pink,
    Blue,
    Green,
}

/// Payload shared by every section kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionBody {
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
}

/// One block of a lecture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Section {
    Heading(SectionBody),
    Paragraph(SectionBody),
    Bullet(SectionBody),
    /// Key point
    Highlight(SectionBody),
    Warning(SectionBody),
    /// `content` is the image URL
    Image(SectionBody),
}

impl Section {
    /// The section's payload
    pub fn body(&self) -> &SectionBody {
        match self {
            Self::Heading(body)
            | Self::Paragraph(body)
            | Self::Bullet(body)
            | Self::Highlight(body)
            | Self::Warning(body)
            | Self::Image(body) => body,
        }
    }

    /// Highlight colour, defaulting to yellow for highlights
    pub fn marker(&self) -> Option<MarkerColor> {
        match self {
            Self::Highlight(body) => Some(body.color.unwrap_or(MarkerColor::Yellow)),
            other => other.body().color,
        }
    }
}

/// A lecture document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    pub id: String,
    pub title: String,
    pub duration: String,
    pub sections: Vec<Section>,
}

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

impl Question {
    /// The text of the correct option
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

/// A quiz (QCM)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub questions: Vec<Question>,
}

/// A past exam paper (annales)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    pub questions: Vec<Question>,
}

/// Any decoded content document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContentDocument {
    Lecture(Lecture),
    Quiz(Quiz),
    Exam(Exam),
}

impl ContentDocument {
    /// Decode a response body as the document shape for `kind`
    pub fn decode(kind: ContentKind, key: &RequestKey, body: &[u8]) -> MediResult<Self> {
        let document = match kind {
            ContentKind::Lecture => Self::Lecture(parse(key, body)?),
            ContentKind::Quiz => Self::Quiz(parse(key, body)?),
            ContentKind::Exam => Self::Exam(parse(key, body)?),
        };
        document.validate(key)?;
        Ok(document)
    }

    /// Kind of this document
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Lecture(_) => ContentKind::Lecture,
            Self::Quiz(_) => ContentKind::Quiz,
            Self::Exam(_) => ContentKind::Exam,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Lecture(lecture) => &lecture.id,
            Self::Quiz(quiz) => &quiz.id,
            Self::Exam(exam) => &exam.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Lecture(lecture) => &lecture.title,
            Self::Quiz(quiz) => &quiz.title,
            Self::Exam(exam) => &exam.title,
        }
    }

    fn validate(&self, key: &RequestKey) -> MediResult<()> {
        let questions = match self {
            Self::Lecture(_) => return Ok(()),
            Self::Quiz(quiz) => &quiz.questions,
            Self::Exam(exam) => &exam.questions,
        };
        validate_questions(key, questions)
    }
}

fn validate_questions(key: &RequestKey, questions: &[Question]) -> MediResult<()> {
    for question in questions {
        if question.correct_option().is_none() {
            return Err(MediError::malformed(
                key.as_str(),
                format!(
                    "question {} has correctIndex {} but {} options",
                    question.id,
                    question.correct_index,
                    question.options.len()
                ),
            ));
        }
    }
    Ok(())
}

fn parse<T: DeserializeOwned>(key: &RequestKey, body: &[u8]) -> MediResult<T> {
    serde_json::from_slice(body).map_err(|e| MediError::malformed(key.as_str(), e.to_string()))
}

/// A lecture as listed in a subject's `lectures.json`
///
/// With `file`, the lecture body lives in its own document; without it,
/// the entry carries its sections inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectureEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
}

impl LectureEntry {
    /// The entry as an inline lecture
    pub fn to_lecture(&self) -> Lecture {
        Lecture {
            id: self.id.clone(),
            title: self.title.clone(),
            duration: self.duration.clone(),
            sections: self.sections.clone(),
        }
    }

    /// What to hand the resolver to open this lecture
    pub fn to_request(&self, year_id: &str, subject_id: &str) -> MediResult<ContentRequest> {
        match &self.file {
            Some(file) => Ok(ContentRequest::File(ContentAddress::new(
                year_id,
                subject_id,
                ContentKind::Lecture,
                file.as_str(),
            )?)),
            None => Ok(ContentRequest::Embedded(ContentDocument::Lecture(
                self.to_lecture(),
            ))),
        }
    }
}

/// Content available for one subject and kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContentIndex {
    Lectures(Vec<LectureEntry>),
    Quizzes(Vec<Quiz>),
    Exams(Vec<Exam>),
}

impl ContentIndex {
    /// An index with nothing in it
    pub fn empty(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Lecture => Self::Lectures(vec![]),
            ContentKind::Quiz => Self::Quizzes(vec![]),
            ContentKind::Exam => Self::Exams(vec![]),
        }
    }

    /// Decode an index file body
    pub fn decode(kind: ContentKind, key: &RequestKey, body: &[u8]) -> MediResult<Self> {
        match kind {
            ContentKind::Lecture => Ok(Self::Lectures(parse(key, body)?)),
            ContentKind::Quiz => {
                let quizzes: Vec<Quiz> = parse(key, body)?;
                for quiz in &quizzes {
                    validate_questions(key, &quiz.questions)?;
                }
                Ok(Self::Quizzes(quizzes))
            }
            ContentKind::Exam => {
                let exams: Vec<Exam> = parse(key, body)?;
                for exam in &exams {
                    validate_questions(key, &exam.questions)?;
                }
                Ok(Self::Exams(exams))
            }
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Lectures(_) => ContentKind::Lecture,
            Self::Quizzes(_) => ContentKind::Quiz,
            Self::Exams(_) => ContentKind::Exam,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Lectures(items) => items.len(),
            Self::Quizzes(items) => items.len(),
            Self::Exams(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> RequestKey {
        RequestKey::new("/data/DCEM2/Cardiologie/hta.json")
    }

    const HTA: &str = r#"{
        "id": "hta",
        "title": "Hypertension artérielle",
        "duration": "45 min",
        "sections": [
            {"id": "s1", "type": "heading", "content": "Définition"},
            {"id": "s2", "type": "paragraph", "content": "PA ≥ 140/90 mmHg."},
            {"id": "s3", "type": "highlight", "content": "Règle des 3 consultations", "color": "pink"},
            {"id": "s4", "type": "highlight", "content": "MAPA"},
            {"id": "s5", "type": "warning", "content": "Urgence hypertensive"}
        ]
    }"#;

    #[test]
    fn decodes_lecture_sections_in_order() {
        let doc = ContentDocument::decode(ContentKind::Lecture, &key(), HTA.as_bytes()).unwrap();
        let ContentDocument::Lecture(lecture) = doc else {
            panic!("expected lecture");
        };

        assert_eq!(lecture.sections.len(), 5);
        assert!(matches!(lecture.sections[0], Section::Heading(_)));
        assert_eq!(lecture.sections[2].marker(), Some(MarkerColor::Pink));
        assert_eq!(lecture.sections[3].marker(), Some(MarkerColor::Yellow));
        assert_eq!(lecture.sections[4].body().content, "Urgence hypertensive");
    }

    #[test]
    fn unknown_section_type_is_malformed() {
        let body = r#"{"id":"x","title":"x","duration":"1h","sections":[{"id":"s","type":"video","content":"x"}]}"#;
        let err = ContentDocument::decode(ContentKind::Lecture, &key(), body.as_bytes()).unwrap_err();
        assert!(matches!(err, MediError::MalformedContent { .. }));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = ContentDocument::decode(ContentKind::Quiz, &key(), b"<html>").unwrap_err();
        assert!(matches!(err, MediError::MalformedContent { .. }));
    }

    #[test]
    fn exam_year_is_optional() {
        let body = r#"{"id":"e1","title":"Session 2023","questions":[
            {"id":"q1","text":"?","options":["a","b"],"correctIndex":1,"explanation":"b"}
        ]}"#;
        let doc = ContentDocument::decode(ContentKind::Exam, &key(), body.as_bytes()).unwrap();
        let ContentDocument::Exam(exam) = doc else {
            panic!("expected exam");
        };
        assert_eq!(exam.year, None);
        assert_eq!(exam.questions[0].correct_option(), Some("b"));
    }

    #[test]
    fn out_of_range_correct_index_is_malformed() {
        let body = r#"{"id":"q","title":"QCM","questions":[
            {"id":"q1","text":"?","options":["a","b"],"correctIndex":2,"explanation":""}
        ]}"#;
        let err = ContentDocument::decode(ContentKind::Quiz, &key(), body.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("correctIndex 2"));
    }

    #[test]
    fn lecture_index_with_file_and_inline_entries() {
        let body = r#"[
            {"id":"hta","title":"HTA","duration":"45 min","file":"hta.json"},
            {"id":"demo","title":"Démo","duration":"5 min","sections":[
                {"id":"s1","type":"bullet","content":"point"}
            ]}
        ]"#;
        let index = ContentIndex::decode(ContentKind::Lecture, &key(), body.as_bytes()).unwrap();
        let ContentIndex::Lectures(entries) = index else {
            panic!("expected lectures");
        };

        assert_eq!(entries[0].file.as_deref(), Some("hta.json"));
        assert!(entries[1].file.is_none());
        assert_eq!(entries[1].to_lecture().sections.len(), 1);

        match entries[0].to_request("DCEM2", "Cardiologie").unwrap() {
            ContentRequest::File(address) => assert_eq!(address.file_name, "hta.json"),
            other => panic!("expected file request, got {:?}", other),
        }
        assert!(matches!(
            entries[1].to_request("DCEM2", "Cardiologie").unwrap(),
            ContentRequest::Embedded(ContentDocument::Lecture(_))
        ));
    }

    #[test]
    fn empty_index_per_kind() {
        assert!(ContentIndex::empty(ContentKind::Exam).is_empty());
        assert_eq!(ContentIndex::empty(ContentKind::Quiz).kind(), ContentKind::Quiz);
    }
}
