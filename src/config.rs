use std::env;

use crate::error::ReviewResult;
use crate::models::Epoch;

/// Mailing list whose archives are reviewed by default.
pub const DEFAULT_MAILING_LIST: &str = "opensuse-factory";

/// First month in which announcements dropped the list tag.
///
/// The list migrated platforms in November 2020, but the first archive
/// fully on the new subject convention is December.
pub const DEFAULT_MIGRATION_CUTOVER: Epoch = Epoch::new(2020, 12);

fn lookup_string<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn lookup_epoch<F>(lookup: &F, key: &str) -> ReviewResult<Option<Epoch>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .map(|value| value.parse::<Epoch>())
        .transpose()
}

/// Runtime configuration for a review run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewConfig {
    pub mailing_list: String,
    pub migration_cutover: Epoch,
    pub start_month: Option<Epoch>,
}

impl ReviewConfig {
    pub fn from_env() -> ReviewResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ReviewResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mailing_list = lookup_string(&lookup, "REVIEW_MAILING_LIST", DEFAULT_MAILING_LIST);
        let migration_cutover = lookup_epoch(&lookup, "REVIEW_MIGRATION_CUTOVER")?
            .unwrap_or(DEFAULT_MIGRATION_CUTOVER);
        let start_month = lookup_epoch(&lookup, "REVIEW_START_MONTH")?;

        Ok(Self {
            mailing_list,
            migration_cutover,
            start_month,
        })
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            mailing_list: DEFAULT_MAILING_LIST.to_string(),
            migration_cutover: DEFAULT_MIGRATION_CUTOVER,
            start_month: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReviewError;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ReviewConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ReviewConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ReviewConfig::from_lookup(lookup_from(&[
            ("REVIEW_MAILING_LIST", "factory"),
            ("REVIEW_MIGRATION_CUTOVER", "2021-03"),
            ("REVIEW_START_MONTH", "2019-06"),
        ]))
        .unwrap();

        assert_eq!(config.mailing_list, "factory");
        assert_eq!(config.migration_cutover, Epoch::new(2021, 3));
        assert_eq!(config.start_month, Some(Epoch::new(2019, 6)));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = ReviewConfig::from_lookup(lookup_from(&[
            ("REVIEW_MAILING_LIST", "  "),
            ("REVIEW_START_MONTH", ""),
        ]))
        .unwrap();
        assert_eq!(config.mailing_list, DEFAULT_MAILING_LIST);
        assert_eq!(config.start_month, None);
    }

    #[test]
    fn test_invalid_cutover_is_an_error() {
        let err = ReviewConfig::from_lookup(lookup_from(&[("REVIEW_MIGRATION_CUTOVER", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ReviewError::InvalidEpoch(_)));
    }
}
