//! Input data shared by the threading and discussion stages.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ReviewError, ReviewResult};

/// Arrival bucket of a message: the month its archive covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch {
    pub year: i32,
    pub month: u32,
}

impl Epoch {
    pub const fn new(year: i32, month: u32) -> Self {
        Epoch { year, month }
    }

    /// Earliest representable epoch, used as the first policy boundary.
    pub const MIN: Epoch = Epoch::new(i32::MIN, 1);
}

impl FromStr for Epoch {
    type Err = ReviewError;

    fn from_str(value: &str) -> ReviewResult<Self> {
        let trimmed = value.trim();
        let date = NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map_err(|_| ReviewError::InvalidEpoch(value.to_string()))?;
        Ok(Epoch::new(date.year(), date.month()))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A single archived email, reduced to the headers threading needs.
///
/// Identifiers are kept as they appeared in the archive; normalization
/// happens at lookup time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Message-ID header value
    pub message_id: Option<String>,

    /// Subject header value
    pub subject: Option<String>,

    /// In-Reply-To header value
    pub in_reply_to: Option<String>,

    /// References header, oldest first
    pub references: Vec<String>,

    /// Body text, carried for consumers
    pub body: String,
}

impl Message {
    pub fn new(message_id: impl Into<String>, subject: impl Into<String>) -> Self {
        Message {
            message_id: Some(message_id.into()),
            subject: Some(subject.into()),
            ..Default::default()
        }
    }

    pub fn in_reply_to(mut self, parent: impl Into<String>) -> Self {
        self.in_reply_to = Some(parent.into());
        self
    }

    pub fn references<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references = references.into_iter().map(Into::into).collect();
        self
    }
}

/// One month of messages in archive order.
///
/// A message's index within `messages` is its archive key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBatch {
    pub epoch: Epoch,
    pub messages: Vec<Message>,
}

impl MessageBatch {
    pub fn new(epoch: Epoch, messages: Vec<Message>) -> Self {
        MessageBatch { epoch, messages }
    }
}
