//! Archive ingestion
//!
//! Turns local monthly mbox archives into the ordered message batches the
//! threading stage consumes. Fetching archives is left to the caller.

pub mod mbox;
pub mod parser;

pub use mbox::{load_archive_dir, parse_mbox, read_archive};
pub use parser::parse_message;
