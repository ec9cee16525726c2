pub mod document;
pub mod sample;

pub use document::{DocumentInput, DocumentKind};
pub use sample::sample_document;
