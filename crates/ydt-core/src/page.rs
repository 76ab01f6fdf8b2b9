//! Host page abstraction
//!
//! The engine never touches the DOM directly. A [`Page`] exposes the handful
//! of operations it needs: the current address, the two kinds of address
//! rewrite, the marker style element, and the first video element.

/// Error type for media calls. Always swallowed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Media call failed: {0}")]
pub struct MediaError(pub String);

/// Error type for DOM calls that should not fail on a live page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("DOM call failed: {0}")]
pub struct DomError(pub String);

/// A video-capable media element.
pub trait Video {
    fn set_muted(&mut self, muted: bool) -> Result<(), MediaError>;
    fn pause(&mut self) -> Result<(), MediaError>;
}

pub trait Page {
    /// Handle to the injected style element.
    type Style: Clone;
    type Video: Video;

    /// Full current address.
    fn href(&self) -> String;

    /// Replacing navigation: the current history entry is discarded.
    fn replace_location(&mut self, url: &str);

    /// In-place address rewrite without navigation.
    fn replace_history_url(&mut self, url: &str);

    /// Existing style element carrying the marker attribute.
    fn find_style(&self, marker: &str) -> Option<Self::Style>;

    /// Create a style element, tag it with `marker=value` and append it to
    /// the document root element.
    fn create_style(&mut self, marker: &str, value: &str) -> Result<Self::Style, DomError>;

    /// Overwrite the full text of a style element.
    fn set_style_text(&mut self, style: &Self::Style, css: &str);

    /// First video element on the page, if mounted.
    fn find_video(&self) -> Option<Self::Video>;
}
