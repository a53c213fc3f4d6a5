//! Assets Module
//!
//! The filesystem side of static serving: request path mapping, disk reads
//! and content type lookup.

mod file_store;
mod mime;

pub use file_store::{FileData, FileStore, INDEX_DOCUMENT};
pub use mime::{content_type_for, DEFAULT_CONTENT_TYPE};
