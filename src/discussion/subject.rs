//! Subject reduction for discussion grouping
//!
//! Replies to the same problem arrive with slightly different subjects:
//! reply markers, the list tag, `(was: ...)` asides and phrases that only
//! restate which snapshot was installed. The reducer strips that noise with an
//! ordered list of rules so the remaining text can serve as a grouping key.
//!
//! Rule order matters and is fixed; each rule sees the previous rule's output.
//! [`SubjectReducer::rule_names`] lists the pipeline for review.

use std::borrow::Cow;

use regex::{Captures, Regex};

use crate::error::{ReviewError, ReviewResult};
use crate::threading::ReleasePolicy;

/// Topic of a bare reply to an announcement.
pub const NO_SUMMARY: &str = "no summary given";

/// Topic when nothing is left after stripping.
pub const FAILED_SUMMARY: &str = "failed to summarize";

fn compile(pattern: &str) -> ReviewResult<Regex> {
    Regex::new(pattern).map_err(|source| ReviewError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[derive(Debug, Clone)]
enum Action {
    /// Remove carriage returns and line feeds left by header folding
    CollapseLineBreaks,
    /// Remove every match
    Strip(Regex),
    /// Remove matches whose `release` group starts with the release being
    /// reduced; digits past the release are kept
    StripRelease(Regex),
    /// Remove everything up to and including the first release mention,
    /// plus a following `: ` or ` - `
    StripThroughRelease,
    /// Stop with [`NO_SUMMARY`] if the whole subject matches
    Announcement(Regex),
}

/// One named step of the reduction pipeline.
#[derive(Debug, Clone)]
pub struct SubjectRule {
    name: &'static str,
    action: Action,
}

impl SubjectRule {
    fn new(name: &'static str, action: Action) -> Self {
        SubjectRule { name, action }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

enum Outcome<'a> {
    Continue(Cow<'a, str>),
    Done(&'static str),
}

fn strip_through_release<'a>(subject: &'a str, release: &str) -> &'a str {
    if release.is_empty() {
        return subject;
    }
    let Some(start) = subject.find(release) else {
        return subject;
    };

    let rest = &subject[start + release.len()..];
    if let Some(after_colon) = rest.strip_prefix(':') {
        let mut chars = after_colon.chars();
        if chars.next().is_some_and(char::is_whitespace) {
            return chars.as_str();
        }
    }
    rest.strip_prefix(" - ").unwrap_or(rest)
}

impl Action {
    fn apply<'a>(&self, subject: &'a str, release: &str) -> Outcome<'a> {
        match self {
            Action::CollapseLineBreaks => {
                if subject.contains(['\r', '\n']) {
                    Outcome::Continue(Cow::Owned(subject.replace(['\r', '\n'], "")))
                } else {
                    Outcome::Continue(Cow::Borrowed(subject))
                }
            }
            Action::Strip(pattern) => Outcome::Continue(pattern.replace_all(subject, "")),
            Action::StripRelease(pattern) => {
                Outcome::Continue(pattern.replace_all(subject, |caps: &Captures| {
                    match caps.name("release").map(|m| m.as_str().strip_prefix(release)) {
                        Some(Some(rest)) if !release.is_empty() => rest.to_string(),
                        _ => caps[0].to_string(),
                    }
                }))
            }
            Action::StripThroughRelease => {
                Outcome::Continue(Cow::Borrowed(strip_through_release(subject, release)))
            }
            Action::Announcement(pattern) => {
                if pattern.is_match(subject) {
                    Outcome::Done(NO_SUMMARY)
                } else {
                    Outcome::Continue(Cow::Borrowed(subject))
                }
            }
        }
    }
}

/// Ordered rule pipeline mapping a subject to its canonical topic.
#[derive(Debug, Clone)]
pub struct SubjectReducer {
    rules: Vec<SubjectRule>,
}

impl SubjectReducer {
    /// Build the pipeline for `list`, using the policy's bare announcement
    /// title to recognise content-free replies.
    pub fn new(list: &str, policy: &ReleasePolicy) -> ReviewResult<Self> {
        let reply_marker = compile(r"^(?:[Rr][Ee]:\s*)+")?;
        let list_tag = compile(&format!(r"^\[{}\] ", regex::escape(list)))?;

        let rules = vec![
            SubjectRule::new("collapse line breaks", Action::CollapseLineBreaks),
            SubjectRule::new("strip reply marker", Action::Strip(reply_marker.clone())),
            SubjectRule::new("strip list tag", Action::Strip(list_tag)),
            SubjectRule::new("strip inner reply marker", Action::Strip(reply_marker)),
            SubjectRule::new(
                "bare announcement",
                Action::Announcement(policy.bare_pattern().clone()),
            ),
            SubjectRule::new(
                "strip was aside",
                Action::Strip(compile(r"\((?:was|re):[^)]+\)")?),
            ),
            SubjectRule::new(
                "strip trailing was",
                Action::Strip(compile(r",?\s?(?:was|re):.*$")?),
            ),
            SubjectRule::new(
                "strip after updating",
                Action::StripRelease(compile(
                    r"after(?: (?:updating|upgrading|latest))?(?: to)?(?: [Ss]napshot)?(?: TW)? (?P<release>\d+)",
                )?),
            ),
            SubjectRule::new(
                "strip update transition",
                Action::Strip(compile(r"update \d+ (?:->|to) \d+")?),
            ),
            SubjectRule::new(
                "strip in snapshot",
                Action::StripRelease(compile(r" (?:in|with)(?: [Ss]napshot)? (?P<release>\d+)")?),
            ),
            SubjectRule::new("strip release prefix", Action::StripThroughRelease),
        ];

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[SubjectRule] {
        &self.rules
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(SubjectRule::name).collect()
    }

    /// Reduce `subject`, a message discussing `release`, to its topic.
    pub fn reduce(&self, subject: &str, release: &str) -> String {
        let mut current = subject.to_string();

        for rule in &self.rules {
            let next = match rule.action.apply(&current, release) {
                Outcome::Continue(next) => next.into_owned(),
                Outcome::Done(topic) => return topic.to_string(),
            };
            current = next;
        }

        let topic = current.trim();
        if topic.is_empty() {
            return FAILED_SUMMARY.to_string();
        }
        topic.to_string()
    }
}
