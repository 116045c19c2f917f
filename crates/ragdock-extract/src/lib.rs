//! RagDock Extract — multi-format text extraction with graceful degradation.
//!
//! The extractor never fails: unreadable streams, corrupt documents and
//! unsupported formats all degrade to a human-readable placeholder so the
//! indexing pipeline can proceed with whatever content is available.

pub mod extractor;
pub mod kind;
pub mod location;
mod markup;
mod office;
mod pdf;

pub use extractor::{ContentExtractor, ExtractedContent, MAX_CONTENT_CHARS};
pub use kind::FileKind;
pub use location::BlobLocation;
