//! Release discussion digests from mailing list archives.
//!
//! Threads archived messages into a reply forest, attributes top-level
//! threads to the snapshot release they discuss and folds near-duplicate
//! subjects into one topic per release.
//!
//! ```no_run
//! use mail_review::{ReleaseDigest, ReviewConfig};
//! use mail_review::sync::load_archive_dir;
//! use std::path::Path;
//!
//! let config = ReviewConfig::from_env()?;
//! let batches = load_archive_dir(Path::new("mbox"), &config.mailing_list, config.start_month)?;
//! let digest = ReleaseDigest::from_config(&config)?.run(&batches);
//! print!("{digest}");
//! # Ok::<(), mail_review::ReviewError>(())
//! ```

pub mod config;
pub mod digest;
pub mod discussion;
pub mod error;
pub mod models;
pub mod sync;
pub mod threading;

pub use config::ReviewConfig;
pub use digest::ReleaseDigest;
pub use discussion::{DigestExport, ReleaseSummary, ThreadSummary};
pub use error::{ReviewError, ReviewResult};
pub use models::{Epoch, Message, MessageBatch};
