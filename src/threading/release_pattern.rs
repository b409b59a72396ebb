//! Release announcement detection
//!
//! Snapshot announcements are recognised by subject. The list changed its
//! subject convention when it migrated platforms, so the pattern depends on
//! the month a message arrived in. Patterns live in a small policy table keyed
//! by the first epoch they apply to; a future migration is a new table entry.

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ReviewConfig;
use crate::error::{ReviewError, ReviewResult};
use crate::models::Epoch;

/// Announcement subject before the migration; `{list}` is the list name.
pub const PATTERN_TAGGED: &str =
    r"^\[{list}\] New Tumbleweed snapshot (?P<version>\d+) released!$";

/// Announcement subject after the migration dropped the list tag.
pub const PATTERN_UNTAGGED: &str = r"^New Tumbleweed snapshot (?P<version>\d+) released!$";

/// Announcement subject with list tag and reply markers already stripped.
pub const PATTERN_BARE: &str = r"^New Tumbleweed snapshot (?P<version>\d+)( released!)?$";

/// Snapshot version announced by a release message.
///
/// Ordered numerically for digit strings: a shorter token sorts first, equal
/// lengths compare lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseToken(String);

impl ReleaseToken {
    pub fn new(token: impl Into<String>) -> Self {
        ReleaseToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for ReleaseToken {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for ReleaseToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ReleaseToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReleaseToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Compile an announcement pattern, substituting the escaped list name.
fn compile_pattern(template: &str, list: &str) -> ReviewResult<Regex> {
    let pattern = template.replace("{list}", &regex::escape(list));
    Regex::new(&pattern).map_err(|source| ReviewError::InvalidPattern { pattern, source })
}

#[derive(Debug, Clone)]
struct PolicyEntry {
    since: Epoch,
    pattern: Regex,
}

/// Epoch-keyed table of announcement patterns.
#[derive(Debug, Clone)]
pub struct ReleasePolicy {
    entries: Vec<PolicyEntry>,
    bare: Regex,
}

impl ReleasePolicy {
    /// Build a policy from `(first epoch, pattern template)` pairs.
    ///
    /// Entries may be given in any order. Messages older than every entry
    /// fall back to the earliest one.
    pub fn new<'a, I>(list: &str, entries: I) -> ReviewResult<Self>
    where
        I: IntoIterator<Item = (Epoch, &'a str)>,
    {
        let mut compiled = entries
            .into_iter()
            .map(|(since, template)| {
                Ok(PolicyEntry {
                    since,
                    pattern: compile_pattern(template, list)?,
                })
            })
            .collect::<ReviewResult<Vec<_>>>()?;

        if compiled.is_empty() {
            return Err(ReviewError::EmptyPolicy);
        }
        compiled.sort_by_key(|entry| entry.since);

        Ok(Self {
            entries: compiled,
            bare: compile_pattern(PATTERN_BARE, list)?,
        })
    }

    /// The openSUSE Factory policy: tagged subjects until the cutover month,
    /// untagged afterwards.
    pub fn from_config(config: &ReviewConfig) -> ReviewResult<Self> {
        Self::new(
            &config.mailing_list,
            [
                (Epoch::MIN, PATTERN_TAGGED),
                (config.migration_cutover, PATTERN_UNTAGGED),
            ],
        )
    }

    /// Pattern in force for messages that arrived in `epoch`.
    pub fn pattern_for(&self, epoch: Epoch) -> &Regex {
        let position = self
            .entries
            .partition_point(|entry| entry.since <= epoch)
            .saturating_sub(1);
        &self.entries[position].pattern
    }

    /// Release announced by `subject`, if it is an announcement for `epoch`.
    pub fn detect(&self, subject: &str, epoch: Epoch) -> Option<ReleaseToken> {
        self.pattern_for(epoch)
            .captures(subject)
            .and_then(|caps| caps.name("version"))
            .map(|version| ReleaseToken::new(version.as_str()))
    }

    /// Whether an already stripped subject is just the announcement title.
    pub fn is_bare_announcement(&self, subject: &str) -> bool {
        self.bare.is_match(subject)
    }

    /// Pattern for an announcement title without list tag or reply markers.
    pub fn bare_pattern(&self) -> &Regex {
        &self.bare
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ReleasePolicy {
        ReleasePolicy::from_config(&ReviewConfig::default()).unwrap()
    }

    #[test]
    fn test_tagged_before_cutover() {
        let policy = policy();
        let subject = "[opensuse-factory] New Tumbleweed snapshot 20200101 released!";
        assert_eq!(
            policy.detect(subject, Epoch::new(2020, 1)),
            Some(ReleaseToken::new("20200101"))
        );
        assert_eq!(policy.detect(subject, Epoch::new(2021, 1)), None);
    }

    #[test]
    fn test_untagged_from_cutover() {
        let policy = policy();
        let subject = "New Tumbleweed snapshot 20201203 released!";
        assert_eq!(
            policy.detect(subject, Epoch::new(2020, 12)),
            Some(ReleaseToken::new("20201203"))
        );
        assert_eq!(policy.detect(subject, Epoch::new(2020, 11)), None);
    }

    #[test]
    fn test_replies_are_not_announcements() {
        let policy = policy();
        assert_eq!(
            policy.detect(
                "Re: [opensuse-factory] New Tumbleweed snapshot 20200101 released!",
                Epoch::new(2020, 1)
            ),
            None
        );
    }

    #[test]
    fn test_list_name_is_escaped() {
        let policy = ReleasePolicy::new("a.b", [(Epoch::MIN, PATTERN_TAGGED)]).unwrap();
        assert!(policy
            .detect("[a.b] New Tumbleweed snapshot 1 released!", Epoch::new(2000, 1))
            .is_some());
        assert!(policy
            .detect("[axb] New Tumbleweed snapshot 1 released!", Epoch::new(2000, 1))
            .is_none());
    }

    #[test]
    fn test_empty_policy_rejected() {
        let entries: [(Epoch, &str); 0] = [];
        assert!(matches!(
            ReleasePolicy::new("list", entries),
            Err(ReviewError::EmptyPolicy)
        ));
    }

    #[test]
    fn test_bare_announcement() {
        let policy = policy();
        assert!(policy.is_bare_announcement("New Tumbleweed snapshot 20200101 released!"));
        assert!(policy.is_bare_announcement("New Tumbleweed snapshot 20200101"));
        assert!(!policy.is_bare_announcement("New Tumbleweed snapshot 20200101 broke wifi"));
    }

    #[test]
    fn test_token_ordering() {
        let mut tokens = vec![
            ReleaseToken::new("20200201"),
            ReleaseToken::new("999"),
            ReleaseToken::new("20200101"),
        ];
        tokens.sort();
        let ordered: Vec<&str> = tokens.iter().map(ReleaseToken::as_str).collect();
        assert_eq!(ordered, vec!["999", "20200101", "20200201"]);
    }
}
