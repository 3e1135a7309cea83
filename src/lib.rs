//! Normalizes the import block of Go source files: blank lines interior to
//! a multi-import group are removed, leaving one contiguous block, and a
//! file is rewritten in place (atomically) only when a change was needed.

pub mod rewrite;
pub mod scan;
pub mod squash;
pub mod walk;

pub use squash::{squash_file, squash_source};
pub use walk::process_path;
