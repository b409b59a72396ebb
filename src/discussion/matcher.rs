//! Attribution of top-level threads to releases
//!
//! Two rules, checked in order for every direct child of the synthetic root:
//!
//! 1. **Announcement**: the announcement's direct replies discuss its release
//!    and replace anything matched to that release before it
//! 2. **Subject mention**: the first release token, newest first, that occurs
//!    in the subject claims the whole thread
//!
//! Threads matching neither rule are dropped. A subject like
//! `update 20180207 -> 20180209 plasma crashing` goes to the newer release,
//! which is usually what the reporter means.

use std::collections::BTreeMap;

use crate::threading::{NodeId, ReleaseToken, ThreadForest, ThreadedArchive};

/// Nodes attributed to each release, in matching order.
pub type Discussions = BTreeMap<ReleaseToken, Vec<NodeId>>;

/// Newest release whose token appears in `subject`.
pub fn release_mentioned<'a, I>(subject: &str, newest_first: I) -> Option<&'a ReleaseToken>
where
    I: IntoIterator<Item = &'a ReleaseToken>,
{
    newest_first
        .into_iter()
        .find(|release| subject.contains(release.as_str()))
}

/// Attribute every top-level thread in the archive to a release.
pub fn find_discussions(archive: &ThreadedArchive) -> Discussions {
    let forest = &archive.forest;
    let mut discussions = Discussions::new();

    for &root_id in forest.children(ThreadForest::ROOT) {
        let node = forest.node(root_id);

        if let Some(release) = &node.release {
            // Replies to the announcement replace whatever was matched before
            if discussions
                .insert(release.clone(), forest.children(root_id).to_vec())
                .is_some()
            {
                log::debug!("{} replaces earlier threads for {}", node.name, release);
            }
            continue;
        }

        match release_mentioned(node.subject(), archive.releases.keys().rev()) {
            Some(release) => {
                log::trace!("{} mentions release {}", node.name, release);
                discussions.entry(release.clone()).or_default().push(root_id);
            }
            None => log::trace!("{} matches no release", node.name),
        }
    }

    discussions
}
