//! Settings model
//!
//! The store holds a partial object under the `settings` key. Everything
//! downstream works on a fully populated [`Settings`], produced by merging
//! that partial value over [`Settings::DEFAULT`].

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// Error type for settings parsing.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Settings must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

// =============================================================================
// Feature Flags
// =============================================================================

bitflags::bitflags! {
    /// UI regions that can be hidden, in declaration order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Feature: u8 {
        const SHORTS = 1 << 0;
        const END_SCREEN = 1 << 1;
        const COMMENTS = 1 << 2;
        const LIVE_CHAT = 1 << 3;
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Fully populated user settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Settings {
    pub hide_shorts: bool,
    pub hide_end_screen: bool,
    pub hide_comments: bool,
    pub hide_live_chat: bool,
}

impl Settings {
    pub const DEFAULT: Settings = Settings {
        hide_shorts: true,
        hide_end_screen: true,
        hide_comments: false,
        hide_live_chat: false,
    };

    /// Set of enabled features.
    pub fn features(&self) -> Feature {
        let mut features = Feature::empty();
        features.set(Feature::SHORTS, self.hide_shorts);
        features.set(Feature::END_SCREEN, self.hide_end_screen);
        features.set(Feature::COMMENTS, self.hide_comments);
        features.set(Feature::LIVE_CHAT, self.hide_live_chat);
        features
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Settings as stored externally. Any field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSettings {
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub hide_shorts: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub hide_end_screen: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub hide_comments: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub hide_live_chat: Option<bool>,
}

impl PartialSettings {
    /// Parse a stored value. `null` means nothing is stored yet.
    pub fn from_json(text: &str) -> Result<Option<Self>, SettingsError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Option<Self>, SettingsError> {
        match value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Object(_) => Ok(Some(serde_json::from_value(value)?)),
            serde_json::Value::Bool(_) => Err(SettingsError::NotAnObject("boolean")),
            serde_json::Value::Number(_) => Err(SettingsError::NotAnObject("number")),
            serde_json::Value::String(_) => Err(SettingsError::NotAnObject("string")),
            serde_json::Value::Array(_) => Err(SettingsError::NotAnObject("array")),
        }
    }
}

/// Non-boolean values are dropped so they fall back to the default.
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool())
}

/// Overlay a partial value on top of `defaults`.
pub fn merge(defaults: &Settings, partial: Option<&PartialSettings>) -> Settings {
    let Some(partial) = partial else {
        return *defaults;
    };
    Settings {
        hide_shorts: partial.hide_shorts.unwrap_or(defaults.hide_shorts),
        hide_end_screen: partial.hide_end_screen.unwrap_or(defaults.hide_end_screen),
        hide_comments: partial.hide_comments.unwrap_or(defaults.hide_comments),
        hide_live_chat: partial.hide_live_chat.unwrap_or(defaults.hide_live_chat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_absent_is_defaults() {
        assert_eq!(merge(&Settings::DEFAULT, None), Settings::DEFAULT);
        assert_eq!(
            merge(&Settings::DEFAULT, Some(&PartialSettings::default())),
            Settings::DEFAULT
        );
    }

    #[test]
    fn test_merge_flips_only_given_field() {
        let partial = PartialSettings {
            hide_comments: Some(true),
            ..Default::default()
        };
        let merged = merge(&Settings::DEFAULT, Some(&partial));
        assert_eq!(
            merged,
            Settings {
                hide_comments: true,
                ..Settings::DEFAULT
            }
        );
    }

    #[test]
    fn test_merge_does_not_touch_defaults() {
        let defaults = Settings::DEFAULT;
        let partial = PartialSettings {
            hide_shorts: Some(false),
            ..Default::default()
        };
        let _ = merge(&defaults, Some(&partial));
        assert!(defaults.hide_shorts);
    }

    #[test]
    fn test_from_json_ignores_unknown_and_non_bool() {
        let partial = PartialSettings::from_json(
            r#"{"hideShorts": false, "hideComments": "yes", "theme": "dark"}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(partial.hide_shorts, Some(false));
        assert_eq!(partial.hide_comments, None);

        let merged = merge(&Settings::DEFAULT, Some(&partial));
        assert!(!merged.hide_shorts);
        assert!(!merged.hide_comments);
        assert!(merged.hide_end_screen);
    }

    #[test]
    fn test_from_json_null_and_errors() {
        assert!(PartialSettings::from_json("null").unwrap().is_none());
        assert!(matches!(
            PartialSettings::from_json("[1, 2]"),
            Err(SettingsError::NotAnObject("array"))
        ));
        assert!(matches!(
            PartialSettings::from_json("{"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_features() {
        let features = Settings::DEFAULT.features();
        assert_eq!(features, Feature::SHORTS | Feature::END_SCREEN);
        let all_on = Settings {
            hide_shorts: true,
            hide_end_screen: true,
            hide_comments: true,
            hide_live_chat: true,
        };
        assert_eq!(all_on.features(), Feature::all());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&Settings::DEFAULT).unwrap();
        assert_eq!(
            json,
            r#"{"hideShorts":true,"hideEndScreen":true,"hideComments":false,"hideLiveChat":false}"#
        );
    }
}
