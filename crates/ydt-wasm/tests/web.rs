//! Browser tests: `wasm-pack test --headless --chrome crates/ydt-wasm`

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

use ydt_core::{Engine, EngineConfig, Page, PartialSettings, RedirectOutcome, Settings, StyleInjector};
use ydt_wasm::store::{watch_settings, SettingsStore};
use ydt_wasm::{
    compile_css, current_settings, is_started, set_debug_logging, start_with, WebPage,
};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn compile_css_defaults_when_absent() {
    let css = compile_css(JsValue::UNDEFINED);
    assert_eq!(css, ydt_core::compile(&Settings::DEFAULT).to_css());
}

#[wasm_bindgen_test]
fn compile_css_reads_partial_object() {
    let partial = js_sys::Object::new();
    js_sys::Reflect::set(&partial, &"hideShorts".into(), &JsValue::FALSE).unwrap();
    js_sys::Reflect::set(&partial, &"hideEndScreen".into(), &JsValue::FALSE).unwrap();
    js_sys::Reflect::set(&partial, &"hideLiveChat".into(), &JsValue::TRUE).unwrap();

    let css = compile_css(partial.into());
    assert_eq!(css, "#chat, #chat-container, ytd-live-chat-frame { display: none !important; }");
}

#[wasm_bindgen_test]
fn current_settings_before_start() {
    assert!(!is_started());
    let settings = current_settings();
    let hide_shorts = js_sys::Reflect::get(&settings, &"hideShorts".into()).unwrap();
    assert_eq!(hide_shorts.as_bool(), Some(true));
}

#[wasm_bindgen_test]
fn injects_single_marked_style_element() {
    let mut page = WebPage::from_window().unwrap();
    let config = EngineConfig::default();
    let mut injector = StyleInjector::new(&config);

    injector.apply(&mut page, &Settings::DEFAULT);
    injector.apply(&mut page, &Settings::DEFAULT);

    let document = web_sys::window().unwrap().document().unwrap();
    let styles = document
        .query_selector_all("style[data-youdefinetube=\"active\"]")
        .unwrap();
    assert_eq!(styles.length(), 1);

    // A second injector adopts the existing element instead of adding one.
    let mut other = StyleInjector::new(&config);
    other.apply(&mut page, &Settings::DEFAULT);
    let styles = document.query_selector_all("style[data-youdefinetube]").unwrap();
    assert_eq!(styles.length(), 1);
}

/// Config that treats the test runner's own origin as a configured host.
fn local_config() -> EngineConfig {
    let origin = web_sys::window().unwrap().location().origin().unwrap();
    EngineConfig {
        hosts: vec![origin],
        ..Default::default()
    }
}

/// Plain object standing in for the extension store. `watch` keeps the
/// callbacks it is given on `this.callbacks`.
fn stub_store(get_body: &str, watch_body: &str) -> js_sys::Object {
    let store = js_sys::Object::new();
    let get = js_sys::Function::new_with_args("key", get_body);
    let watch = js_sys::Function::new_with_args("callbacks", watch_body);
    js_sys::Reflect::set(&store, &"get".into(), &get).unwrap();
    js_sys::Reflect::set(&store, &"watch".into(), &watch).unwrap();
    store
}

fn partial_object(pairs: &[(&str, bool)]) -> JsValue {
    let object = js_sys::Object::new();
    for (key, value) in pairs {
        js_sys::Reflect::set(&object, &(*key).into(), &JsValue::from_bool(*value)).unwrap();
    }
    object.into()
}

#[wasm_bindgen_test]
fn engine_ignores_non_shorts_page() {
    let page = WebPage::from_window().unwrap();
    let href = page.href();
    let mut engine = Engine::new(page, local_config());
    let reaction = engine.boot(None);
    assert_eq!(reaction.redirect, RedirectOutcome::NotShortRoute);
    assert!(reaction.pause.is_none());
    assert_eq!(engine.page().href(), href);
}

#[wasm_bindgen_test]
fn engine_stays_idle_off_youtube() {
    let page = WebPage::from_window().unwrap();
    let mut engine = Engine::new(page, EngineConfig::default());
    assert!(!engine.is_in_scope());
    assert_eq!(engine.boot(None).redirect, RedirectOutcome::OutOfScope);
}

#[wasm_bindgen_test]
async fn start_is_a_no_op_off_youtube() {
    // `get` throws if called, so reaching the store would fail the start.
    let store = stub_store("throw new Error('store read');", "");
    let result = start_with(store.unchecked_into::<SettingsStore>(), EngineConfig::default()).await;
    assert!(result.is_ok());
    assert!(!is_started());
}

#[wasm_bindgen_test]
async fn failed_start_leaves_engine_unset() {
    let store = stub_store(
        "return Promise.resolve(null);",
        "throw new Error('watch unavailable');",
    );
    let result = start_with(store.unchecked_into::<SettingsStore>(), local_config()).await;
    assert!(result.is_err());
    assert!(!is_started());
}

#[wasm_bindgen_test]
async fn debug_level_survives_start() {
    set_debug_logging(true);
    let store = stub_store("throw new Error('store read');", "");
    let _ = start_with(store.unchecked_into::<SettingsStore>(), local_config()).await;
    assert_eq!(log::max_level(), log::LevelFilter::Debug);

    set_debug_logging(false);
    assert_eq!(log::max_level(), log::LevelFilter::Info);
}

#[wasm_bindgen_test]
fn watch_settings_passes_old_and_new_values() {
    let store = stub_store("return Promise.resolve(null);", "this.callbacks = callbacks;");
    let seen: Rc<RefCell<Vec<(Option<PartialSettings>, Option<PartialSettings>)>>> =
        Rc::default();
    let sink = Rc::clone(&seen);
    let handle: SettingsStore = store.clone().unchecked_into();
    watch_settings(&handle, "settings", move |old, new| sink.borrow_mut().push((old, new)))
        .unwrap();

    let callbacks = js_sys::Reflect::get(&store, &"callbacks".into()).unwrap();
    let callback: js_sys::Function = js_sys::Reflect::get(&callbacks, &"settings".into())
        .unwrap()
        .dyn_into()
        .unwrap();

    let change = js_sys::Object::new();
    js_sys::Reflect::set(&change, &"oldValue".into(), &partial_object(&[("hideShorts", false)]))
        .unwrap();
    js_sys::Reflect::set(
        &change,
        &"newValue".into(),
        &partial_object(&[("hideShorts", true), ("hideComments", true)]),
    )
    .unwrap();
    callback.call1(&JsValue::NULL, &change).unwrap();

    // A cleared key arrives with no old value and an undefined new one.
    let cleared = js_sys::Object::new();
    callback.call1(&JsValue::NULL, &cleared).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    let (old, new) = &seen[0];
    assert_eq!(old.and_then(|p| p.hide_shorts), Some(false));
    assert_eq!(new.and_then(|p| p.hide_shorts), Some(true));
    assert_eq!(new.and_then(|p| p.hide_comments), Some(true));
    assert_eq!(seen[1], (None, None));
}
