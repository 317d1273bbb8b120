/*!
# Core Module

Shared foundations: error handling, source positions and file reading.
*/

pub mod errors;
pub mod fs_utils;
pub mod position;

pub use errors::{ErrorLevel, IndentError, Result};
pub use fs_utils::{read_source, read_source_file, write_source, SourceText};
pub use position::{LineIndex, Position, Span};
