//! Reply forest construction
//!
//! Messages are inserted month by month, oldest first. A message can only be
//! attached below a message that was inserted before it, which is what keeps
//! the result a forest.
//!
//! ## Parent Resolution
//!
//! 1. **In-Reply-To**: the direct parent, if it is already known
//! 2. **References**: scanned newest first, so the deepest known ancestor wins
//! 3. **Root**: the message starts a new top-level thread
//!
//! Release announcements are detected while inserting, using the pattern the
//! [`ReleasePolicy`] assigns to the batch's month.

use std::collections::{BTreeMap, HashMap};

use crate::models::{Message, MessageBatch};

use super::container::{NodeId, ThreadForest};
use super::message_id::normalize_message_id;
use super::release_pattern::{ReleasePolicy, ReleaseToken};

/// Output of a threading pass over the whole archive.
#[derive(Debug, Clone, Default)]
pub struct ThreadedArchive {
    pub forest: ThreadForest,

    /// Normalized Message-ID to node
    pub lookup: HashMap<String, NodeId>,

    /// Release token to the normalized Message-ID of its announcement
    pub releases: BTreeMap<ReleaseToken, String>,
}

impl ThreadedArchive {
    /// Resolve a message identifier in any header format to its node.
    pub fn find(&self, message_id: &str) -> Option<NodeId> {
        self.lookup.get(&normalize_message_id(message_id)).copied()
    }

    /// Node of the announcement for `release`.
    pub fn announcement(&self, release: &ReleaseToken) -> Option<NodeId> {
        self.releases
            .get(release)
            .and_then(|message_id| self.lookup.get(message_id))
            .copied()
    }
}

/// Pick the parent for a message according to the resolution order.
fn resolve_parent(lookup: &HashMap<String, NodeId>, message: &Message) -> NodeId {
    if let Some(in_reply_to) = message.in_reply_to.as_deref() {
        let in_reply_to = normalize_message_id(in_reply_to);
        match lookup.get(&in_reply_to) {
            Some(parent) => return *parent,
            None => log::debug!("message {} not found", in_reply_to),
        }
    }

    for reference in message.references.iter().rev() {
        let reference = normalize_message_id(reference);
        match lookup.get(&reference) {
            Some(parent) => return *parent,
            None => log::debug!("message {} not found", reference),
        }
    }

    ThreadForest::ROOT
}

/// Build the reply forest and release index from monthly batches.
///
/// Batches must be supplied oldest month first. Out-of-order batches are
/// logged and processed anyway; replies to messages from a later month will
/// then start new top-level threads.
pub fn build_threads(batches: &[MessageBatch], policy: &ReleasePolicy) -> ThreadedArchive {
    let mut archive = ThreadedArchive::default();
    let mut previous_epoch = None;

    for batch in batches {
        if previous_epoch.is_some_and(|previous| previous > batch.epoch) {
            log::warn!(
                "batch {} supplied after a later month, replies may be misattributed",
                batch.epoch
            );
        }
        previous_epoch = Some(batch.epoch);

        log::debug!("threading {} ({} messages)", batch.epoch, batch.messages.len());

        for (key, message) in batch.messages.iter().enumerate() {
            let (Some(raw_id), Some(subject)) =
                (message.message_id.as_deref(), message.subject.as_deref())
            else {
                log::debug!("skipping {}.{}: missing Message-ID or Subject", batch.epoch, key);
                continue;
            };
            log::trace!("{}.{} {}", batch.epoch, key, subject);

            let message_id = normalize_message_id(raw_id);
            let parent = resolve_parent(&archive.lookup, message);

            let release = policy.detect(subject, batch.epoch);
            if let Some(release) = &release {
                log::debug!("found release {}", release);
                archive.releases.insert(release.clone(), message_id.clone());
            }

            let id = archive.forest.attach(
                parent,
                format!("{}.{}", batch.epoch, key),
                message.clone(),
                batch.epoch,
                release,
            );

            if archive.lookup.insert(message_id.clone(), id).is_some() {
                log::debug!("duplicate message {}, newest copy wins", message_id);
            }
        }
    }

    log::info!(
        "threaded {} messages, {} releases",
        archive.forest.len() - 1,
        archive.releases.len()
    );

    archive
}
