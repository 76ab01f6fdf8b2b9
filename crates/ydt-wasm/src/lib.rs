//! WebAssembly bindings for YouDefineTube
//!
//! The content script loads this module at `document_idle` and calls
//! [`start`] with the extension's settings store. Everything after that is
//! driven from here: the store callbacks, the navigation poll interval, and
//! the post-redirect pause retries.

mod logger;
mod page;
pub mod store;

use std::cell::RefCell;
use std::time::Duration;

use log::LevelFilter;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use ydt_core::{
    compile, merge, Engine, EngineConfig, NavigationTick, Page, PauseResolver, PauseStep, RouteReaction,
    Settings,
};

pub use page::{WebPage, WebVideo};
pub use store::SettingsStore;

thread_local! {
    static ENGINE: RefCell<Option<Engine<WebPage>>> = const { RefCell::new(None) };
}

fn with_engine<R>(f: impl FnOnce(&mut Engine<WebPage>) -> R) -> Option<R> {
    ENGINE.with(|slot| slot.borrow_mut().as_mut().map(f))
}

fn settings_to_js(settings: &Settings) -> JsValue {
    let result = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&result, &"hideShorts".into(), &JsValue::from(settings.hide_shorts));
    let _ = js_sys::Reflect::set(&result, &"hideEndScreen".into(), &JsValue::from(settings.hide_end_screen));
    let _ = js_sys::Reflect::set(&result, &"hideComments".into(), &JsValue::from(settings.hide_comments));
    let _ = js_sys::Reflect::set(&result, &"hideLiveChat".into(), &JsValue::from(settings.hide_live_chat));
    result.into()
}

// =============================================================================
// Timers
// =============================================================================

fn duration_ms(duration: Duration) -> i32 {
    i32::try_from(duration.as_millis()).unwrap_or(i32::MAX)
}

fn schedule_once(delay: Duration, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once(f);
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        duration_ms(delay),
    ) {
        Ok(_) => callback.forget(),
        Err(e) => log::debug!("setTimeout failed: {:?}", e),
    }
}

/// Step the resolver now, then keep rescheduling while it asks to.
fn drive_pause(mut resolver: PauseResolver) {
    let step = with_engine(|engine| engine.step_pause(&mut resolver));
    if let Some(PauseStep::Retry { after }) = step {
        schedule_once(after, move || drive_pause(resolver));
    }
}

fn dispatch(reaction: RouteReaction) {
    log::trace!("Route reaction: {:?}", reaction.redirect);
    if let Some(resolver) = reaction.pause {
        drive_pause(resolver);
    }
}

fn on_poll_tick() {
    if let Some(NavigationTick::Changed(reaction)) = with_engine(|engine| engine.poll()) {
        dispatch(reaction);
    }
}

/// Runs for the lifetime of the page.
fn start_navigation_watcher(interval: Duration) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let callback = Closure::<dyn FnMut()>::new(on_poll_tick);
    window.set_interval_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        duration_ms(interval),
    )?;
    callback.forget();
    Ok(())
}

// =============================================================================
// Exports
// =============================================================================

/// Boot the content script against the current page.
#[wasm_bindgen]
pub async fn start(store: SettingsStore) -> Result<(), JsValue> {
    start_with(store, EngineConfig::default()).await
}

/// [`start`] with explicit tunables.
///
/// Does nothing on a host outside [`EngineConfig::hosts`]. On failure the
/// engine is dropped again, so a later call may retry.
pub async fn start_with(store: SettingsStore, config: EngineConfig) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logger::install(LevelFilter::Info);

    if is_started() {
        return Err(JsValue::from_str("Already started. Reload the page to restart."));
    }

    let page = WebPage::from_window()?;
    if !config.covers(&page.href()) {
        log::debug!("Not a configured host, staying idle: {}", page.href());
        return Ok(());
    }

    // The navigation cursor is captured here, before the store round-trip.
    let key = config.settings_key.clone();
    let poll_interval = config.poll_interval;
    ENGINE.with(|slot| *slot.borrow_mut() = Some(Engine::new(page, config)));

    let result = run(&store, &key, poll_interval).await;
    if result.is_err() {
        ENGINE.with(|slot| *slot.borrow_mut() = None);
    }
    result
}

async fn run(store: &SettingsStore, key: &str, poll_interval: Duration) -> Result<(), JsValue> {
    let stored = store::load(store, key).await?;
    if let Some(reaction) = with_engine(|engine| engine.boot(stored.as_ref())) {
        dispatch(reaction);
    }

    store::watch_settings(store, key, |old, new| {
        let outcome = with_engine(|engine| engine.on_settings_change(old.as_ref(), new.as_ref()));
        if let Some(Some(redirect)) = outcome {
            log::debug!("Settings edge handled: {:?}", redirect);
        }
    })?;
    start_navigation_watcher(poll_interval)
}

#[wasm_bindgen]
pub fn is_started() -> bool {
    ENGINE.with(|slot| slot.borrow().is_some())
}

/// Stylesheet text for a (partial) settings object, for previews.
#[wasm_bindgen]
pub fn compile_css(settings: JsValue) -> String {
    let partial = store::partial_from_js(&settings);
    compile(&merge(&Settings::DEFAULT, partial.as_ref())).to_css()
}

/// Settings currently in effect, or the defaults before [`start`].
#[wasm_bindgen]
pub fn current_settings() -> JsValue {
    let settings = with_engine(|engine| engine.settings()).unwrap_or_default();
    settings_to_js(&settings)
}

/// Switch console logging between debug and info. Survives [`start`].
#[wasm_bindgen]
pub fn set_debug_logging(enabled: bool) {
    logger::set_level(if enabled { LevelFilter::Debug } else { LevelFilter::Info });
}
