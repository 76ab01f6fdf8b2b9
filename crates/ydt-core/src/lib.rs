//! YouDefineTube Core Library
//!
//! This crate provides the page-state reconciliation engine behind the
//! YouDefineTube content script. It decides which parts of the watch UI are
//! hidden, keeps a single injected style element in sync with the user's
//! settings, and turns Shorts navigations into regular watch-page loads.
//!
//! # Architecture
//!
//! The engine is host-agnostic: every DOM, address bar and media call goes
//! through the [`Page`] trait. The wasm bindings implement it over `web-sys`,
//! the CLI implements it as a dry-run simulation, and the unit tests use an
//! in-memory page.
//!
//! # Modules
//!
//! - `settings`: Feature flags, defaults, and partial-value merging
//! - `css`: Settings to stylesheet compilation
//! - `style`: Single style element ownership
//! - `url`: Allocation-light URL slicing and query helpers
//! - `route`: Shorts and watch route shapes
//! - `page`: Host abstraction for the document, address bar and media
//! - `engine`: Navigation watcher, settings sync, redirector and pause resolver
//! - `config`: Engine tunables

pub mod config;
pub mod css;
pub mod engine;
pub mod page;
pub mod route;
pub mod settings;
pub mod style;
pub mod url;

// Re-export commonly used types
pub use config::EngineConfig;
pub use css::{compile, Stylesheet};
pub use engine::{
    Engine, FallbackReason, NavigationCursor, NavigationTick, PauseResolver, PauseStep,
    RedirectOutcome, RouteReaction,
};
pub use page::{DomError, MediaError, Page, Video};
pub use settings::{merge, Feature, PartialSettings, Settings, SettingsError};
pub use style::StyleInjector;
