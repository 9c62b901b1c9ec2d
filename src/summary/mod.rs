pub mod error;
pub mod summarizer;
