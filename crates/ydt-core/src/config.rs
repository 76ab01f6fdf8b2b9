//! Engine tunables

use std::time::Duration;

use crate::url::extract_origin;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(600);
pub const DEFAULT_PAUSE_RETRY_INTERVAL: Duration = Duration::from_millis(200);
/// ~6s at the default retry interval.
pub const DEFAULT_PAUSE_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_REDIRECT_FLAG: &str = "ydt_pause";
pub const DEFAULT_STYLE_MARKER: &str = "data-youdefinetube";
pub const DEFAULT_STYLE_MARKER_VALUE: &str = "active";
pub const DEFAULT_SETTINGS_KEY: &str = "settings";
/// Origins the content script is registered for.
pub const DEFAULT_HOSTS: &[&str] = &["https://www.youtube.com", "https://m.youtube.com"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Navigation watcher tick.
    pub poll_interval: Duration,
    /// Spacing between post-redirect video lookups.
    pub pause_retry_interval: Duration,
    pub pause_max_attempts: u32,
    /// Query key of the one-shot pause flag.
    pub redirect_flag: String,
    /// Attribute identifying the injected style element.
    pub style_marker: String,
    pub style_marker_value: String,
    /// Store key holding the settings object.
    pub settings_key: String,
    /// Origins the engine acts on. Anything else is left untouched.
    pub hosts: Vec<String>,
}

impl EngineConfig {
    /// Whether the origin of `href` is one of [`EngineConfig::hosts`].
    pub fn covers(&self, href: &str) -> bool {
        let origin = extract_origin(href);
        !origin.is_empty() && self.hosts.iter().any(|host| host.eq_ignore_ascii_case(origin))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            pause_retry_interval: DEFAULT_PAUSE_RETRY_INTERVAL,
            pause_max_attempts: DEFAULT_PAUSE_MAX_ATTEMPTS,
            redirect_flag: DEFAULT_REDIRECT_FLAG.to_string(),
            style_marker: DEFAULT_STYLE_MARKER.to_string(),
            style_marker_value: DEFAULT_STYLE_MARKER_VALUE.to_string(),
            settings_key: DEFAULT_SETTINGS_KEY.to_string(),
            hosts: DEFAULT_HOSTS.iter().map(|host| host.to_string()).collect(),
        }
    }
}
