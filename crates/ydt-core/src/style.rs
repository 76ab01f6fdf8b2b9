//! Style element ownership
//!
//! One marker-tagged `<style>` element per document. It is looked up or
//! created on first use and its text is replaced wholesale afterwards.

use crate::config::EngineConfig;
use crate::css::{compile, Stylesheet};
use crate::page::{DomError, Page};
use crate::settings::Settings;

pub struct StyleInjector<S> {
    marker: String,
    marker_value: String,
    element: Option<S>,
}

impl<S: Clone> StyleInjector<S> {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            marker: config.style_marker.clone(),
            marker_value: config.style_marker_value.clone(),
            element: None,
        }
    }

    /// The owned style element, adopting an existing marked one if present.
    pub fn ensure_element<P: Page<Style = S>>(&mut self, page: &mut P) -> Result<S, DomError> {
        if let Some(element) = &self.element {
            return Ok(element.clone());
        }

        let element = match page.find_style(&self.marker) {
            Some(existing) => existing,
            None => page.create_style(&self.marker, &self.marker_value)?,
        };
        self.element = Some(element.clone());
        Ok(element)
    }

    /// Compile `settings` and overwrite the element text.
    pub fn apply<P: Page<Style = S>>(&mut self, page: &mut P, settings: &Settings) -> Stylesheet {
        let sheet = compile(settings);
        match self.ensure_element(page) {
            Ok(element) => {
                page.set_style_text(&element, &sheet.to_css());
                log::debug!("Applied {} hide rule(s)", sheet.len());
            }
            // Retried on the next settings change or navigation.
            Err(e) => log::debug!("Style element unavailable: {}", e),
        }
        sheet
    }
}
