//! MediSketch - offline content delivery for medical study notes
//!
//! Caches the app shell per build generation, routes requests through the
//! active generation, and loads lectures, quizzes and exams as typed
//! documents.

pub mod cache;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod fetch;
pub mod origin;
pub mod request;
pub mod ui;

pub use error::{MediError, MediResult};
