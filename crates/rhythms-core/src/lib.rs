pub mod draft;
pub mod error;
pub mod types;

pub use draft::{Draft, FINAL_MARKER, VERIFY_MARKER, bullet_parts, normalize_for_match};
pub use error::EngineError;
pub use types::{ActivityRecord, Category, OutputFormat, RecordSource, Section};
