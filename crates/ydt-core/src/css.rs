//! Stylesheet compilation
//!
//! Every enabled feature contributes one rule: its selector list followed by
//! a `display: none !important` declaration. The stylesheet is rebuilt from
//! scratch on every call.

use std::fmt;

use crate::settings::{Feature, Settings};

const HIDE_DECLARATION: &str = " { display: none !important; }";

/// Selector lists per feature, in declaration order.
const RULE_GROUPS: &[(Feature, &[&str])] = &[
    (
        Feature::SHORTS,
        &[
            // Home and channel shelves
            "ytd-reel-shelf-renderer",
            // Watch page rows
            "ytd-reel-video-renderer",
            "a[href*=\"/shorts/\"]",
            // Rich sections in the modern home layout
            "ytd-rich-section-renderer:has(a[href*=\"/shorts/\"])",
            // Related sidebar
            "ytd-reel-item-renderer",
        ],
    ),
    (
        Feature::END_SCREEN,
        &[
            ".ytp-endscreen-content",
            ".ytp-endscreen-previous",
            ".ytp-ce-element",
            ".ytp-ce-video",
            ".ytp-ce-element-show",
        ],
    ),
    (Feature::COMMENTS, &["#comments", "ytd-comments"]),
    (
        Feature::LIVE_CHAT,
        &["#chat", "#chat-container", "ytd-live-chat-frame"],
    ),
];

/// Compiled hide rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    rules: Vec<String>,
}

impl Stylesheet {
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Text written into the style element.
    pub fn to_css(&self) -> String {
        self.rules.join("\n")
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Compile the stylesheet for `settings`.
pub fn compile(settings: &Settings) -> Stylesheet {
    let enabled = settings.features();
    let rules = RULE_GROUPS
        .iter()
        .filter(|(feature, _)| enabled.contains(*feature))
        .map(|(_, selectors)| format!("{}{}", selectors.join(", "), HIDE_DECLARATION))
        .collect();
    Stylesheet { rules }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_OFF: Settings = Settings {
        hide_shorts: false,
        hide_end_screen: false,
        hide_comments: false,
        hide_live_chat: false,
    };

    #[test]
    fn test_defaults_rules() {
        let sheet = compile(&Settings::DEFAULT);
        assert_eq!(sheet.len(), 2);
        assert_eq!(
            sheet.rules()[0],
            "ytd-reel-shelf-renderer, ytd-reel-video-renderer, a[href*=\"/shorts/\"], \
             ytd-rich-section-renderer:has(a[href*=\"/shorts/\"]), ytd-reel-item-renderer \
             { display: none !important; }"
        );
        assert!(sheet.rules()[1].starts_with(".ytp-endscreen-content, "));
    }

    #[test]
    fn test_all_disabled_is_empty() {
        let sheet = compile(&ALL_OFF);
        assert!(sheet.is_empty());
        assert_eq!(sheet.to_css(), "");
    }

    #[test]
    fn test_each_flag_contributes_exactly_one_rule() {
        for (feature, list) in RULE_GROUPS {
            let mut settings = ALL_OFF;
            match *feature {
                f if f == Feature::SHORTS => settings.hide_shorts = true,
                f if f == Feature::END_SCREEN => settings.hide_end_screen = true,
                f if f == Feature::COMMENTS => settings.hide_comments = true,
                _ => settings.hide_live_chat = true,
            }
            let sheet = compile(&settings);
            assert_eq!(sheet.len(), 1);
            assert_eq!(sheet.rules()[0], format!("{}{}", list.join(", "), HIDE_DECLARATION));
        }
    }

    #[test]
    fn test_declaration_order_and_join() {
        let settings = Settings {
            hide_shorts: false,
            hide_end_screen: false,
            hide_comments: true,
            hide_live_chat: true,
        };
        assert_eq!(
            compile(&settings).to_css(),
            "#comments, ytd-comments { display: none !important; }\n\
             #chat, #chat-container, ytd-live-chat-frame { display: none !important; }"
        );
    }

    #[test]
    fn test_compile_is_deterministic() {
        let settings = Settings {
            hide_comments: true,
            ..Settings::DEFAULT
        };
        let first = compile(&settings);
        let _ = compile(&ALL_OFF);
        assert_eq!(compile(&settings), first);
    }
}
