//! Study content: addresses, documents and the resolver that loads them

mod address;
mod document;
mod resolver;

pub use address::{ContentAddress, ContentKind, ContentRequest, DEFAULT_DATA_ROOT};
pub use document::{
    ContentDocument, ContentIndex, Exam, Lecture, LectureEntry, MarkerColor, Question, Quiz,
    Section, SectionBody,
};
pub use resolver::{ContentResolver, DEFAULT_TIMEOUT};
