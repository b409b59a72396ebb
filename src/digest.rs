use crate::config::ReviewConfig;
use crate::discussion::{
    DigestExport, SubjectReducer, export_discussions, find_discussions, group_by_topic,
};
use crate::error::ReviewResult;
use crate::models::MessageBatch;
use crate::threading::{ReleasePolicy, ThreadedArchive, build_threads};

/// Corpus-to-digest pipeline with its compiled patterns.
///
/// A run has no side effects beyond logging and keeps no state between
/// calls, so one instance can be reused for any number of corpora.
#[derive(Debug, Clone)]
pub struct ReleaseDigest {
    policy: ReleasePolicy,
    reducer: SubjectReducer,
}

impl ReleaseDigest {
    pub fn new(policy: ReleasePolicy, reducer: SubjectReducer) -> Self {
        Self { policy, reducer }
    }

    pub fn from_config(config: &ReviewConfig) -> ReviewResult<Self> {
        let policy = ReleasePolicy::from_config(config)?;
        let reducer = SubjectReducer::new(&config.mailing_list, &policy)?;
        Ok(Self::new(policy, reducer))
    }

    pub fn policy(&self) -> &ReleasePolicy {
        &self.policy
    }

    pub fn reducer(&self) -> &SubjectReducer {
        &self.reducer
    }

    /// Thread the corpus. Batches must be ordered oldest month first.
    pub fn thread(&self, batches: &[MessageBatch]) -> ThreadedArchive {
        build_threads(batches, &self.policy)
    }

    /// Summarize an already threaded archive.
    pub fn summarize(&self, archive: &ThreadedArchive) -> DigestExport {
        let discussions = find_discussions(archive);
        log::debug!("{} releases with discussion", discussions.len());
        let grouped = group_by_topic(archive, &discussions, &self.reducer);
        export_discussions(archive, &grouped)
    }

    pub fn run(&self, batches: &[MessageBatch]) -> DigestExport {
        self.summarize(&self.thread(batches))
    }
}
