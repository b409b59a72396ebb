//! Per-release discussion summaries
//!
//! Matched nodes are grouped by reduced subject. Each node counts itself plus
//! all of its replies, so a long sub-thread weighs more than a single
//! message, and no message is counted twice within a release.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::threading::tree_traversal::count_descendants;
use crate::threading::{NodeId, ReleaseToken, ThreadedArchive};

use super::matcher::Discussions;
use super::subject::SubjectReducer;

/// Nodes of one release grouped by topic, topics in first-seen order.
pub type TopicGroups = Vec<(String, Vec<NodeId>)>;

/// One discussion topic within a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadSummary {
    /// Canonical topic
    #[serde(rename = "summary")]
    pub topic: String,

    /// Messages and all their replies
    pub reference_count: usize,

    /// Node names of the participating messages, thread root first
    pub messages: Vec<String>,
}

/// Digest entry for one release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSummary {
    /// Node name of the announcement message
    pub announcement: String,
    pub reference_count: usize,
    pub thread_count: usize,
    pub threads: Vec<ThreadSummary>,
}

/// Full digest, releases in ascending token order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DigestExport(pub BTreeMap<ReleaseToken, ReleaseSummary>);

impl DigestExport {
    pub fn get(&self, release: &str) -> Option<&ReleaseSummary> {
        self.0.get(&ReleaseToken::new(release))
    }

    pub fn releases(&self) -> impl Iterator<Item = (&ReleaseToken, &ReleaseSummary)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DigestExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (release, summary) in &self.0 {
            writeln!(
                f,
                "{} <{} / {}>",
                release, summary.reference_count, summary.thread_count
            )?;
            for thread in &summary.threads {
                writeln!(
                    f,
                    "- {} <{} / {}>",
                    thread.topic,
                    thread.reference_count,
                    thread.messages.join(", ")
                )?;
            }
        }
        Ok(())
    }
}

/// Group each release's nodes by reduced subject.
pub fn group_by_topic(
    archive: &ThreadedArchive,
    discussions: &Discussions,
    reducer: &SubjectReducer,
) -> BTreeMap<ReleaseToken, TopicGroups> {
    discussions
        .iter()
        .map(|(release, nodes)| {
            let mut groups: TopicGroups = Vec::new();

            for &id in nodes {
                let topic = reducer.reduce(archive.forest.node(id).subject(), release.as_str());
                match groups.iter_mut().find(|(existing, _)| *existing == topic) {
                    Some((_, members)) => members.push(id),
                    None => groups.push((topic, vec![id])),
                }
            }

            (release.clone(), groups)
        })
        .collect()
}

/// Build the digest for every known release.
///
/// Releases without any discussion are still listed with zero counts.
pub fn export_discussions(
    archive: &ThreadedArchive,
    grouped: &BTreeMap<ReleaseToken, TopicGroups>,
) -> DigestExport {
    let forest = &archive.forest;
    let mut export = BTreeMap::new();

    for release in archive.releases.keys() {
        let Some(announcement) = archive.announcement(release) else {
            log::warn!("announcement for release {} missing from archive", release);
            continue;
        };

        let threads: Vec<ThreadSummary> = grouped
            .get(release)
            .map(|groups| {
                groups
                    .iter()
                    .map(|(topic, members)| ThreadSummary {
                        topic: topic.clone(),
                        reference_count: members
                            .iter()
                            .map(|&id| 1 + count_descendants(forest, id))
                            .sum(),
                        messages: members
                            .iter()
                            .map(|&id| forest.node(id).name.clone())
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        export.insert(
            release.clone(),
            ReleaseSummary {
                announcement: forest.node(announcement).name.clone(),
                reference_count: threads.iter().map(|thread| thread.reference_count).sum(),
                thread_count: threads.len(),
                threads,
            },
        );
    }

    DigestExport(export)
}
