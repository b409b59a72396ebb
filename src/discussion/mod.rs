//! Release discussion attribution
//!
//! Takes the threaded archive and decides which threads talk about which
//! snapshot, then folds near-duplicate subjects together.
//!
//! - `matcher`: top-level thread → release attribution
//! - `subject`: subject reduction rules
//! - `aggregate`: topic grouping, reference counts and the exported digest

pub mod aggregate;
pub mod matcher;
pub mod subject;

pub use aggregate::{
    DigestExport, ReleaseSummary, ThreadSummary, export_discussions, group_by_topic,
};
pub use matcher::{Discussions, find_discussions};
pub use subject::{FAILED_SUMMARY, NO_SUMMARY, SubjectReducer};
