use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Options ────────────────────────────────────────────────────────────────

/// User-facing toggles that shape one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    #[serde(alias = "splitTable")]
    pub split_table: bool,
    #[serde(alias = "submittedStrike")]
    pub submitted_strike: bool,
    #[serde(alias = "showExpiredUnsubmitted")]
    pub show_expired_unsubmitted: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            split_table: true,
            submitted_strike: true,
            show_expired_unsubmitted: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterKind {
    Split,
    InPlace,
}

impl PresenterKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Split => "split tables",
            Self::InPlace => "in place",
        }
    }
}

impl Options {
    pub fn presenter(&self) -> PresenterKind {
        if self.split_table {
            PresenterKind::Split
        } else {
            PresenterKind::InPlace
        }
    }

    /// Returns a new value with every key the update carries replaced.
    pub fn apply(self, update: &OptionsUpdate) -> Options {
        Options {
            split_table: update.split_table.unwrap_or(self.split_table),
            submitted_strike: update.submitted_strike.unwrap_or(self.submitted_strike),
            show_expired_unsubmitted: update
                .show_expired_unsubmitted
                .unwrap_or(self.show_expired_unsubmitted),
        }
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "splitTable={} submittedStrike={} showExpiredUnsubmitted={}",
            self.split_table, self.submitted_strike, self.show_expired_unsubmitted
        )
    }
}

// ─── Updates ────────────────────────────────────────────────────────────────

/// Partial options payload, as stored on disk or delivered by a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_table: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_strike: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_expired_unsubmitted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("expected key=value, got `{0}`")]
    MissingValue(String),
    #[error("unknown option `{0}`")]
    UnknownKey(String),
    #[error("`{key}` expects true or false, got `{value}`")]
    InvalidBool { key: String, value: String },
}

impl OptionsUpdate {
    /// Full update carrying every key of `options`.
    pub fn full(options: Options) -> Self {
        Self {
            split_table: Some(options.split_table),
            submitted_strike: Some(options.submitted_strike),
            show_expired_unsubmitted: Some(options.show_expired_unsubmitted),
        }
    }

    /// Later updates win key by key.
    pub fn merge(self, later: &OptionsUpdate) -> OptionsUpdate {
        OptionsUpdate {
            split_table: later.split_table.or(self.split_table),
            submitted_strike: later.submitted_strike.or(self.submitted_strike),
            show_expired_unsubmitted: later
                .show_expired_unsubmitted
                .or(self.show_expired_unsubmitted),
        }
    }

    /// Builds an update from `key=value` pairs.
    pub fn from_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Self, OptionsError> {
        pairs.iter().try_fold(Self::default(), |acc, pair| {
            Ok(acc.merge(&pair.as_ref().parse()?))
        })
    }
}

impl FromStr for OptionsUpdate {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| OptionsError::MissingValue(s.to_string()))?;
        let key = key.trim();
        let value = value.trim();
        let flag = match value.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => true,
            "false" | "off" | "no" | "0" => false,
            _ => {
                return Err(OptionsError::InvalidBool {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            }
        };

        let mut update = Self::default();
        match normalize_key(key).as_str() {
            "splittable" => update.split_table = Some(flag),
            "submittedstrike" => update.submitted_strike = Some(flag),
            "showexpiredunsubmitted" => update.show_expired_unsubmitted = Some(flag),
            _ => return Err(OptionsError::UnknownKey(key.to_string())),
        }
        Ok(update)
    }
}

/// Accepts `splitTable`, `split_table` and `split-table` alike.
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_all_enabled() {
        let options = Options::default();
        assert!(options.split_table);
        assert!(options.submitted_strike);
        assert!(options.show_expired_unsubmitted);
        assert_eq!(options.presenter(), PresenterKind::Split);
    }

    #[test]
    fn partial_update_merges() {
        let update = OptionsUpdate {
            split_table: Some(false),
            ..OptionsUpdate::default()
        };
        let merged = Options::default().apply(&update);
        assert!(!merged.split_table);
        assert!(merged.submitted_strike);
        assert!(merged.show_expired_unsubmitted);
        assert_eq!(merged.presenter(), PresenterKind::InPlace);
    }

    #[test]
    fn full_update_replaces_wholesale() {
        let target = Options {
            split_table: false,
            submitted_strike: false,
            show_expired_unsubmitted: false,
        };
        let merged = Options::default().apply(&OptionsUpdate::full(target));
        assert_eq!(merged, target);
    }

    #[test]
    fn apply_leaves_receiver_untouched() {
        let before = Options::default();
        let _ = before.apply(&"submittedStrike=false".parse().unwrap());
        assert!(before.submitted_strike);
    }

    #[test]
    fn pairs_accept_several_key_spellings() {
        let update = OptionsUpdate::from_pairs(&[
            "splitTable=false",
            "submitted_strike=off",
            "show-expired-unsubmitted=yes",
        ])
        .unwrap();
        assert_eq!(update.split_table, Some(false));
        assert_eq!(update.submitted_strike, Some(false));
        assert_eq!(update.show_expired_unsubmitted, Some(true));
    }

    #[test]
    fn bad_pairs_are_rejected() {
        assert_eq!(
            "splitTable".parse::<OptionsUpdate>(),
            Err(OptionsError::MissingValue("splitTable".into()))
        );
        assert_eq!(
            "colour=true".parse::<OptionsUpdate>(),
            Err(OptionsError::UnknownKey("colour".into()))
        );
        assert!(matches!(
            "splitTable=maybe".parse::<OptionsUpdate>(),
            Err(OptionsError::InvalidBool { .. })
        ));
    }

    #[test]
    fn update_json_uses_camel_case_keys() {
        let update: OptionsUpdate =
            serde_json::from_str(r#"{"showExpiredUnsubmitted":false}"#).unwrap();
        assert_eq!(update.show_expired_unsubmitted, Some(false));
        assert_eq!(update.split_table, None);
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"showExpiredUnsubmitted":false}"#
        );
    }
}
