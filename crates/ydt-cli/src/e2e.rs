use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde_json::Value;
use thirtyfour::prelude::*;
use thirtyfour::ChromeCapabilities;

pub struct E2eOptions {
    pub chromedriver_url: String,
    pub extension_path: String,
    pub headless: bool,
    pub video_id: String,
}

const REDIRECT_TIMEOUT: Duration = Duration::from_secs(15);

pub fn run_e2e(opts: E2eOptions) -> Result<(), String> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start tokio runtime: {}", e))?;
    runtime.block_on(run_e2e_async(opts))
}

async fn run_e2e_async(opts: E2eOptions) -> Result<(), String> {
    let extension_path = canonicalize_path(&opts.extension_path)?;

    let mut caps = ChromeCapabilities::new();
    let disable_arg = format!("--disable-extensions-except={}", extension_path.display());
    caps.add_arg(&disable_arg)
        .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
    let load_arg = format!("--load-extension={}", extension_path.display());
    caps.add_arg(&load_arg)
        .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
    caps.add_arg("--no-first-run")
        .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
    caps.add_arg("--autoplay-policy=no-user-gesture-required")
        .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
    if opts.headless {
        caps.add_arg("--headless=new")
            .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
    }

    let driver = WebDriver::new(&opts.chromedriver_url, caps)
        .await
        .map_err(|e| format!("Failed to connect to chromedriver: {}", e))?;

    let mut errors = Vec::new();

    if let Err(e) = check_shorts_redirect(&driver, &opts.video_id).await {
        errors.push(format!("Shorts redirect check failed: {}", e));
    }

    if let Err(e) = check_style_injected(&driver).await {
        errors.push(format!("Style injection check failed: {}", e));
    }

    driver.quit().await.ok();

    if errors.is_empty() {
        println!("✓ E2E checks passed");
        Ok(())
    } else {
        Err(format!("E2E failed:\n- {}", errors.join("\n- ")))
    }
}

/// Shorts URL must end up on the watch page with the pause flag consumed.
async fn check_shorts_redirect(driver: &WebDriver, video_id: &str) -> Result<(), String> {
    let shorts_url = format!("https://www.youtube.com/shorts/{}", video_id);
    driver.goto(&shorts_url)
        .await
        .map_err(|e| format!("Failed to open {}: {}", shorts_url, e))?;

    let expected = format!("/watch?v={}", video_id);
    let deadline = Instant::now() + REDIRECT_TIMEOUT;
    loop {
        let href = eval_string(driver, "return window.location.href;")
            .await
            .map_err(|e| format!("Failed to read location: {}", e))?;
        if href.contains(&expected) && !href.contains("ydt_pause") {
            break;
        }
        if Instant::now() >= deadline {
            return Err(format!("Still at '{}' after {:?}", href, REDIRECT_TIMEOUT));
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    let paused = eval_bool(driver, "return document.querySelector('video')?.paused ?? false;")
        .await
        .map_err(|e| format!("Failed to read video state: {}", e))?;
    if !paused {
        return Err("Redirected video is still playing".to_string());
    }
    Ok(())
}

async fn check_style_injected(driver: &WebDriver) -> Result<(), String> {
    let count = eval_string(
        driver,
        "return String(document.querySelectorAll('style[data-youdefinetube=\"active\"]').length);",
    )
    .await
    .map_err(|e| format!("Failed to query style element: {}", e))?;
    if count != "1" {
        return Err(format!("Expected exactly one style element, found {}", count));
    }
    Ok(())
}

async fn eval_bool(driver: &WebDriver, script: &str) -> WebDriverResult<bool> {
    let result = driver.execute(script, Vec::<Value>::new()).await?;
    Ok(result.json().as_bool().unwrap_or(false))
}

async fn eval_string(driver: &WebDriver, script: &str) -> WebDriverResult<String> {
    let result = driver.execute(script, Vec::<Value>::new()).await?;
    Ok(result.json().as_str().unwrap_or_default().to_string())
}

fn canonicalize_path(path: &str) -> Result<PathBuf, String> {
    std::fs::canonicalize(path)
        .map_err(|e| format!("Failed to resolve '{}': {}", path, e))
}
