//! Email threading module
//!
//! Builds a reply forest from archived mailing list messages and detects
//! release announcements along the way.
//!
//! ## Threading Strategy
//!
//! Unlike full JWZ threading there are no phantom containers: a message is
//! attached below the most specific *known* message it refers to, and
//! references to messages outside the archive are ignored.
//!
//! 1. **In-Reply-To**: the direct parent if present in the archive
//! 2. **References**: newest reference first, falling back to older ones
//! 3. **Root**: otherwise the message starts a new top-level thread
//!
//! ## Module Structure
//!
//! - `message_id`: Message-ID canonicalization across header formats
//! - `container`: Arena storage for the forest
//! - `release_pattern`: Epoch-keyed announcement patterns
//! - `builder`: Forest construction
//! - `tree_traversal`: Iterative walks over the forest

pub mod builder;
pub mod container;
pub mod message_id;
pub mod release_pattern;
pub mod tree_traversal;

pub use builder::{ThreadedArchive, build_threads};
pub use container::{Node, NodeId, ThreadForest};
pub use message_id::normalize_message_id;
pub use release_pattern::{ReleasePolicy, ReleaseToken};
