//! Extension settings store
//!
//! The store is a JS object with `get(key) -> Promise` and
//! `watch({ [key]: ({ oldValue, newValue }) => void })`.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use ydt_core::PartialSettings;

#[wasm_bindgen]
extern "C" {
    /// Key-value store shared with the popup (`@plasmohq/storage` shape).
    pub type SettingsStore;

    #[wasm_bindgen(method, catch)]
    fn get(this: &SettingsStore, key: &str) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn watch(this: &SettingsStore, callbacks: &js_sys::Object) -> Result<JsValue, JsValue>;
}

/// Read a stored settings value. Anything unusable counts as "not stored".
pub(crate) fn partial_from_js(value: &JsValue) -> Option<PartialSettings> {
    if value.is_undefined() || value.is_null() {
        return None;
    }
    let text = js_sys::JSON::stringify(value).ok().map(String::from)?;
    match PartialSettings::from_json(&text) {
        Ok(partial) => partial,
        Err(e) => {
            log::debug!("Ignoring stored settings: {}", e);
            None
        }
    }
}

fn change_field(change: &JsValue, field: &str) -> Option<PartialSettings> {
    js_sys::Reflect::get(change, &JsValue::from_str(field))
        .ok()
        .and_then(|value| partial_from_js(&value))
}

/// Stored value under `key`. A rejected read falls back to "not stored";
/// only a store that throws synchronously is an error.
pub async fn load(store: &SettingsStore, key: &str) -> Result<Option<PartialSettings>, JsValue> {
    match JsFuture::from(store.get(key)?).await {
        Ok(value) => Ok(partial_from_js(&value)),
        Err(e) => {
            log::warn!("Failed to load settings, using defaults: {:?}", e);
            Ok(None)
        }
    }
}

/// Subscribe `handler` to changes of `key`. It receives the old and new
/// values, each `None` when absent or unusable.
pub fn watch_settings<F>(store: &SettingsStore, key: &str, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(Option<PartialSettings>, Option<PartialSettings>) + 'static,
{
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |change: JsValue| {
        handler(
            change_field(&change, "oldValue"),
            change_field(&change, "newValue"),
        );
    });

    let callbacks = js_sys::Object::new();
    js_sys::Reflect::set(&callbacks, &JsValue::from_str(key), callback.as_ref())?;
    store.watch(&callbacks)?;
    callback.forget();
    Ok(())
}
