//! Filesystem access and content directory loading

pub mod collection;
pub mod fs;

pub use collection::{Collection, Selected};
pub use fs::{is_content_file, read_to_string, write_atomic};
