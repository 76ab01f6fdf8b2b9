//! Page-state reconciliation engine
//!
//! The engine owns the current settings, the style element and the
//! navigation cursor. It performs no scheduling of its own: the host drives
//! it by calling [`Engine::poll`] on the navigation interval and by stepping
//! any [`PauseResolver`] it hands back until it stops asking for retries.
//!
//! Ordering within a reaction is fixed: styles, then the Shorts redirect,
//! then the post-redirect pause check.

use std::fmt;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::css::Stylesheet;
use crate::page::{Page, Video};
use crate::route;
use crate::settings::{merge, PartialSettings, Settings};
use crate::style::StyleInjector;
use crate::url::{extract_origin, extract_path};

// =============================================================================
// Navigation Cursor
// =============================================================================

/// Last observed address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationCursor {
    last: String,
}

impl NavigationCursor {
    pub fn new(href: impl Into<String>) -> Self {
        Self { last: href.into() }
    }

    pub fn current(&self) -> &str {
        &self.last
    }

    /// Record `href`; returns true if it differs from the previous one.
    pub fn observe(&mut self, href: &str) -> bool {
        if self.last == href {
            return false;
        }
        self.last.clear();
        self.last.push_str(href);
        true
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Why the redirector paused in place instead of redirecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The Shorts path carries no video id.
    MissingVideoId,
    /// The address already has a `v` parameter, so the target is ambiguous.
    CanonicalParamPresent,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVideoId => f.write_str("missing video id"),
            Self::CanonicalParamPresent => f.write_str("canonical parameter already present"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// The page is not on a configured host.
    OutOfScope,
    /// Hide Shorts is off.
    Disabled,
    NotShortRoute,
    /// Replacing navigation issued to `target`.
    Redirected { target: String },
    /// Paused in place; `video_found` is false when nothing was on the page.
    Fallback {
        reason: FallbackReason,
        video_found: bool,
    },
}

/// Result of one post-redirect pause attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PauseStep {
    /// Video silenced and the address rewritten to `url`.
    Resolved { url: String },
    /// Not mounted yet; try again after the delay.
    Retry { after: Duration },
    /// Attempt budget exhausted. The flag stays in the address.
    GaveUp,
}

/// Bounded retry state for the post-redirect pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauseResolver {
    attempts: u32,
    max_attempts: u32,
    interval: Duration,
}

impl PauseResolver {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            attempts: 0,
            max_attempts,
            interval,
        }
    }

    /// Failed lookups so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// Route handlers' combined result for one reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteReaction {
    pub redirect: RedirectOutcome,
    /// Armed resolver; the host must step it immediately.
    pub pause: Option<PauseResolver>,
}

impl RouteReaction {
    fn idle() -> Self {
        Self {
            redirect: RedirectOutcome::OutOfScope,
            pause: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTick {
    Unchanged,
    Changed(RouteReaction),
}

// =============================================================================
// Engine
// =============================================================================

pub struct Engine<P: Page> {
    page: P,
    config: EngineConfig,
    settings: Settings,
    styles: StyleInjector<P::Style>,
    cursor: NavigationCursor,
}

impl<P: Page> Engine<P> {
    /// Capture the current address as the cursor. Settings start at the
    /// defaults until [`Engine::boot`] runs.
    pub fn new(page: P, config: EngineConfig) -> Self {
        let cursor = NavigationCursor::new(page.href());
        let styles = StyleInjector::new(&config);
        Self {
            page,
            config,
            settings: Settings::DEFAULT,
            styles,
            cursor,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Whether the current address is on one of the configured hosts.
    pub fn is_in_scope(&self) -> bool {
        self.config.covers(&self.page.href())
    }

    /// Startup: adopt the stored settings, inject styles, evaluate the route.
    pub fn boot(&mut self, stored: Option<&PartialSettings>) -> RouteReaction {
        self.settings = merge(&Settings::DEFAULT, stored);
        if !self.is_in_scope() {
            log::debug!("Not a configured host, staying idle: {}", self.page.href());
            return RouteReaction::idle();
        }
        log::debug!("Booting with {:?}", self.settings);
        self.apply_styles();
        self.react_to_route()
    }

    /// Recompile and rewrite the style element.
    pub fn apply_styles(&mut self) -> Stylesheet {
        self.styles.apply(&mut self.page, &self.settings)
    }

    /// One navigation watcher tick.
    pub fn poll(&mut self) -> NavigationTick {
        let href = self.page.href();
        // Cursor moves before any handler can touch the address.
        if !self.cursor.observe(&href) {
            return NavigationTick::Unchanged;
        }
        log::trace!("Address changed to {}", href);
        if !self.config.covers(&href) {
            return NavigationTick::Changed(RouteReaction::idle());
        }
        self.apply_styles();
        NavigationTick::Changed(self.react_to_route())
    }

    /// Settings change notification from the store.
    ///
    /// Returns the redirect outcome when Hide Shorts was just switched on.
    pub fn on_settings_change(
        &mut self,
        old: Option<&PartialSettings>,
        new: Option<&PartialSettings>,
    ) -> Option<RedirectOutcome> {
        let previous = merge(&Settings::DEFAULT, old);
        let next = merge(&Settings::DEFAULT, new);
        self.settings = next;
        if !self.is_in_scope() {
            return None;
        }
        self.apply_styles();

        if !previous.hide_shorts && next.hide_shorts {
            log::debug!("Hide Shorts enabled, re-checking route");
            return Some(self.handle_short_route());
        }
        None
    }

    fn react_to_route(&mut self) -> RouteReaction {
        let redirect = self.handle_short_route();
        let pause = self.arm_pause();
        RouteReaction { redirect, pause }
    }

    /// Redirect a Shorts page to the watch page, or silence it in place.
    pub fn handle_short_route(&mut self) -> RedirectOutcome {
        if !self.is_in_scope() {
            return RedirectOutcome::OutOfScope;
        }
        if !self.settings.hide_shorts {
            return RedirectOutcome::Disabled;
        }

        let href = self.page.href();
        let path = extract_path(&href);
        if !route::is_short_route(path) {
            return RedirectOutcome::NotShortRoute;
        }

        let reason = match route::short_video_id(path) {
            None => FallbackReason::MissingVideoId,
            Some(_) if route::has_canonical_param(&href) => FallbackReason::CanonicalParamPresent,
            Some(id) => {
                let target = route::watch_url(extract_origin(&href), &id, &self.config.redirect_flag);
                log::info!("Redirecting Shorts {} to {}", id, target);
                self.page.replace_location(&target);
                return RedirectOutcome::Redirected { target };
            }
        };

        log::debug!("Shorts redirect not possible ({}), pausing in place", reason);
        let video_found = match self.page.find_video() {
            Some(mut video) => {
                if let Err(e) = video.pause() {
                    log::debug!("Ignoring pause failure: {}", e);
                }
                if let Err(e) = video.set_muted(true) {
                    log::debug!("Ignoring mute failure: {}", e);
                }
                true
            }
            None => false,
        };
        RedirectOutcome::Fallback {
            reason,
            video_found,
        }
    }

    /// Arm the post-redirect resolver if the flag is on the address.
    pub fn arm_pause(&self) -> Option<PauseResolver> {
        if !self.settings.hide_shorts || !self.is_in_scope() {
            return None;
        }
        if !route::has_redirect_flag(&self.page.href(), &self.config.redirect_flag) {
            return None;
        }
        Some(PauseResolver::new(
            self.config.pause_max_attempts,
            self.config.pause_retry_interval,
        ))
    }

    /// One resolver attempt.
    pub fn step_pause(&mut self, resolver: &mut PauseResolver) -> PauseStep {
        if let Some(mut video) = self.page.find_video() {
            if let Err(e) = video.set_muted(true) {
                log::debug!("Ignoring mute failure: {}", e);
            }
            if let Err(e) = video.pause() {
                log::debug!("Ignoring pause failure: {}", e);
            }

            let href = self.page.href();
            let url = route::strip_redirect_flag(&href, &self.config.redirect_flag).unwrap_or(href);
            self.page.replace_history_url(&url);
            log::info!("Paused redirected video after {} retries", resolver.attempts);
            return PauseStep::Resolved { url };
        }

        resolver.attempts += 1;
        if resolver.attempts < resolver.max_attempts {
            PauseStep::Retry {
                after: resolver.interval,
            }
        } else {
            log::debug!("No video after {} attempts, leaving flag in place", resolver.attempts);
            PauseStep::GaveUp
        }
    }
}
