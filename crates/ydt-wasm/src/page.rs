//! `Page` implementation over the live document

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlMediaElement, Window};

use ydt_core::page::{DomError, MediaError, Page, Video};

fn js_error(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// First `<video>` on the page.
pub struct WebVideo(HtmlMediaElement);

impl Video for WebVideo {
    fn set_muted(&mut self, muted: bool) -> Result<(), MediaError> {
        self.0.set_muted(muted);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        self.0.pause().map_err(|e| MediaError(js_error(e)))
    }
}

pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn from_window() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document"))?;
        Ok(Self { window, document })
    }
}

impl Page for WebPage {
    type Style = Element;
    type Video = WebVideo;

    fn href(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn replace_location(&mut self, url: &str) {
        if let Err(e) = self.window.location().replace(url) {
            log::debug!("location.replace failed: {}", js_error(e));
        }
    }

    fn replace_history_url(&mut self, url: &str) {
        let Ok(history) = self.window.history() else {
            return;
        };
        if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(url)) {
            log::debug!("history.replaceState failed: {}", js_error(e));
        }
    }

    fn find_style(&self, marker: &str) -> Option<Element> {
        self.document
            .query_selector(&format!("style[{}]", marker))
            .ok()
            .flatten()
    }

    fn create_style(&mut self, marker: &str, value: &str) -> Result<Element, DomError> {
        let root = self
            .document
            .document_element()
            .ok_or_else(|| DomError("Document has no root element".to_string()))?;
        let style = self
            .document
            .create_element("style")
            .map_err(|e| DomError(js_error(e)))?;
        style
            .set_attribute(marker, value)
            .map_err(|e| DomError(js_error(e)))?;
        root.append_child(&style).map_err(|e| DomError(js_error(e)))?;
        Ok(style)
    }

    fn set_style_text(&mut self, style: &Element, css: &str) {
        style.set_text_content(Some(css));
    }

    fn find_video(&self) -> Option<WebVideo> {
        self.document
            .query_selector("video")
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlMediaElement>().ok())
            .map(WebVideo)
    }
}
