use std::cell::Cell;
use std::time::Duration;

use ydt_core::page::{DomError, MediaError, Page, Video};
use ydt_core::route::is_short_url;
use ydt_core::{Engine, EngineConfig, PartialSettings, PauseStep, RedirectOutcome};

pub struct RouteOptions {
    pub url: String,
    pub settings: Option<PartialSettings>,
    /// Lookups before a video shows up; `None` means never.
    pub video_after: Option<u32>,
}

/// Page double that records what the engine would do.
struct DryRunPage {
    href: String,
    video_after: Option<u32>,
    lookups: Cell<u32>,
    actions: Vec<String>,
}

struct DryRunVideo;

impl Video for DryRunVideo {
    fn set_muted(&mut self, _muted: bool) -> Result<(), MediaError> {
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        Ok(())
    }
}

impl Page for DryRunPage {
    type Style = ();
    type Video = DryRunVideo;

    fn href(&self) -> String {
        self.href.clone()
    }

    fn replace_location(&mut self, url: &str) {
        self.actions.push(format!("location.replace({})", url));
        self.href = url.to_string();
    }

    fn replace_history_url(&mut self, url: &str) {
        self.actions.push(format!("history.replaceState({})", url));
        self.href = url.to_string();
    }

    fn find_style(&self, _marker: &str) -> Option<()> {
        None
    }

    fn create_style(&mut self, marker: &str, value: &str) -> Result<(), DomError> {
        self.actions.push(format!("append <style {}=\"{}\">", marker, value));
        Ok(())
    }

    fn set_style_text(&mut self, _style: &(), css: &str) {
        self.actions.push(format!("style text: {} rule(s)", css.lines().count()));
    }

    fn find_video(&self) -> Option<DryRunVideo> {
        let lookups = self.lookups.get() + 1;
        self.lookups.set(lookups);
        match self.video_after {
            Some(after) if lookups > after => Some(DryRunVideo),
            _ => None,
        }
    }
}

pub fn run_route(opts: RouteOptions) -> Result<(), String> {
    if !opts.url.contains("://") {
        return Err(format!("Expected an absolute URL, got '{}'", opts.url));
    }

    let page = DryRunPage {
        href: opts.url.clone(),
        video_after: opts.video_after,
        lookups: Cell::new(0),
        actions: Vec::new(),
    };
    let config = EngineConfig::default();
    let in_scope = config.covers(&opts.url);
    let mut engine = Engine::new(page, config);
    let reaction = engine.boot(opts.settings.as_ref());

    println!("Route: {}", opts.url);
    println!(
        "  Host:      {}",
        if in_scope { "configured" } else { "not configured, engine idle" }
    );
    println!("  Shorts:    {}", if is_short_url(&opts.url) { "yes" } else { "no" });
    println!("  Settings:  {:?}", engine.settings());
    match &reaction.redirect {
        RedirectOutcome::OutOfScope => println!("  Redirect:  skipped (host not configured)"),
        RedirectOutcome::Disabled => println!("  Redirect:  skipped (Hide Shorts off)"),
        RedirectOutcome::NotShortRoute => println!("  Redirect:  skipped (not a Shorts route)"),
        RedirectOutcome::Redirected { target } => println!("  Redirect:  {}", target),
        RedirectOutcome::Fallback {
            reason,
            video_found,
        } => println!(
            "  Redirect:  fallback ({}), video {}",
            reason,
            if *video_found { "paused and muted" } else { "not found" }
        ),
    }

    if let Some(mut resolver) = reaction.pause {
        let mut elapsed = Duration::ZERO;
        let result = loop {
            match engine.step_pause(&mut resolver) {
                PauseStep::Retry { after } => elapsed += after,
                done => break done,
            }
        };
        match result {
            PauseStep::Resolved { url } => println!(
                "  Pause:     resolved after {}ms, address now {}",
                elapsed.as_millis(),
                url
            ),
            _ => println!(
                "  Pause:     gave up after {} attempts, flag kept",
                resolver.attempts()
            ),
        }
    } else {
        println!("  Pause:     not armed");
    }

    println!();
    println!("Actions:");
    for action in &engine.page().actions {
        println!("  {}", action);
    }

    Ok(())
}
