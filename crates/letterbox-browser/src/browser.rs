//! Browser lifecycle management using Chrome DevTools Protocol

use crate::driver::{ElementState, Key, PageDriver, SessionLauncher};
use crate::error::{BrowserError, Result};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use letterbox_core::SuiteConfig;
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Extra Chrome arguments
    pub args: Vec<String>,
    /// Navigation and element lookup timeout
    pub timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            args: Vec::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&SuiteConfig> for BrowserConfig {
    fn from(config: &SuiteConfig) -> Self {
        Self {
            headless: config.browser.headless,
            window_width: config.browser.window_width,
            window_height: config.browser.window_height,
            args: config.browser.launch_args(),
            timeout: config.waits.page_timeout(),
        }
    }
}

/// Active browser session with Chrome DevTools Protocol
pub struct BrowserSession {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    /// Current active tab
    tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch browser with custom configuration
    pub async fn launch_with_config(config: BrowserConfig) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            config.headless, config.window_width, config.window_height
        );

        let args: Vec<&OsStr> = config.args.iter().map(OsStr::new).collect();
        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.window_width, config.window_height)))
            .args(args)
            .build()
            .map_err(|e| BrowserError::Browser(format!("Invalid launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| BrowserError::Browser(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::Browser(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(config.timeout);

        info!("Browser launched successfully");

        Ok(Self { browser, tab })
    }

    /// Execute JavaScript in the page context
    ///
    /// Scripts must produce a primitive; structured results are
    /// `JSON.stringify`-ed by the caller.
    pub async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value> {
        debug!("Evaluating JavaScript: {}", script);

        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| BrowserError::Browser(format!("JavaScript evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// Get reference to the active tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Close the browser session
    pub async fn close(self) -> Result<()> {
        info!("Closing browser session");
        Ok(())
    }

    fn wait_until_navigated(&self, what: &str) -> Result<()> {
        self.tab
            .wait_until_navigated()
            .map_err(|e| BrowserError::Browser(format!("Navigation timeout for {}: {}", what, e)))?;
        Ok(())
    }

    fn focus(&self, selector: &str) -> Result<()> {
        let element = self
            .tab
            .find_element(selector)
            .map_err(|_| BrowserError::missing(selector, selector))?;
        element
            .focus()
            .map_err(|e| BrowserError::Browser(format!("Failed to focus {}: {}", selector, e)))?;
        Ok(())
    }
}

/// Embed a Rust string as a JavaScript string literal
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn probe_script(selector: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector({sel});
            if (!el) {{ return null; }}
            const style = window.getComputedStyle(el);
            const displayed = style.display !== 'none'
                && style.visibility !== 'hidden'
                && style.opacity !== '0'
                && el.getClientRects().length > 0;
            return JSON.stringify({{
                displayed,
                enabled: !el.disabled,
                text: (el.innerText || '').trim(),
                value: ('value' in el) ? String(el.value) : null,
                className: el.getAttribute('class') || ''
            }});
        }})()"#,
        sel = js_string(selector)
    )
}

#[async_trait]
impl PageDriver for BrowserSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| BrowserError::Browser(format!("Failed to navigate to {}: {}", url, e)))?;
        self.wait_until_navigated(url)?;

        info!("Successfully navigated to {}", url);
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        debug!("Reloading page");

        self.tab
            .reload(false, None)
            .map_err(|e| BrowserError::Browser(format!("Reload failed: {}", e)))?;
        self.wait_until_navigated("reload")
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let script = format!("document.querySelectorAll({}).length", js_string(selector));
        let result = self.evaluate_script(&script).await?;
        Ok(result.as_u64().unwrap_or(0) as usize)
    }

    async fn probe(&self, selector: &str) -> Result<Option<ElementState>> {
        let result = self.evaluate_script(&probe_script(selector)).await?;
        match result.as_str() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let script = format!(
            "document.querySelector({})?.getAttribute({}) ?? null",
            js_string(selector),
            js_string(name)
        );
        let result = self.evaluate_script(&script).await?;
        Ok(result.as_str().map(str::to_string))
    }

    async fn clear(&self, selector: &str) -> Result<()> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el) {{ return false; }}
                el.value = '';
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            js_string(selector)
        );
        match self.evaluate_script(&script).await?.as_bool() {
            Some(true) => Ok(()),
            _ => Err(BrowserError::missing(selector, selector)),
        }
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        self.focus(selector)?;
        if text.is_empty() {
            return Ok(());
        }
        self.tab
            .type_str(text)
            .map_err(|e| BrowserError::Browser(format!("Typing into {} failed: {}", selector, e)))?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        debug!("Clicking {}", selector);

        let element = self
            .tab
            .find_element(selector)
            .map_err(|_| BrowserError::missing(selector, selector))?;
        element
            .click()
            .map_err(|e| BrowserError::Browser(format!("Click on {} failed: {}", selector, e)))?;
        Ok(())
    }

    async fn press_key(&self, selector: &str, key: Key) -> Result<()> {
        self.focus(selector)?;
        self.tab.press_key(key.name()).map_err(|e| {
            BrowserError::Browser(format!("Pressing {} on {} failed: {}", key.name(), selector, e))
        })?;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| BrowserError::ScreenshotFailed(format!("CDP capture failed: {}", e)))
    }

    async fn set_document_mark(&self, mark: &str) -> Result<()> {
        let script = format!(
            "document.documentElement.dataset.letterboxHandle = {}; true",
            js_string(mark)
        );
        self.evaluate_script(&script).await?;
        Ok(())
    }

    async fn document_mark(&self) -> Result<Option<String>> {
        let result = self
            .evaluate_script("document.documentElement.dataset.letterboxHandle ?? null")
            .await?;
        Ok(result.as_str().map(str::to_string))
    }

    async fn title(&self) -> Result<String> {
        let result = self.evaluate_script("document.title").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        debug!("BrowserSession dropped, browser will be cleaned up");
    }
}

/// Launches a fresh Chrome per scenario and loads the target page
pub struct ChromeLauncher {
    target_url: String,
    config: BrowserConfig,
}

impl ChromeLauncher {
    pub fn new(target_url: impl Into<String>, config: BrowserConfig) -> Self {
        Self {
            target_url: target_url.into(),
            config,
        }
    }

    pub fn from_suite_config(config: &SuiteConfig) -> Self {
        Self::new(config.target_url.clone(), BrowserConfig::from(config))
    }
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    type Session = BrowserSession;

    async fn open(&self) -> Result<BrowserSession> {
        let session = BrowserSession::launch_with_config(self.config.clone()).await?;
        session.navigate(&self.target_url).await?;

        let ready_state = session.evaluate_script("document.readyState").await?;
        if !matches!(ready_state.as_str(), Some("complete") | Some("interactive")) {
            return Err(BrowserError::Browser(format!(
                "Page at {} did not finish loading (readyState: {})",
                self.target_url, ready_state
            )));
        }

        info!("Page loaded: {}", session.title().await?);
        Ok(session)
    }

    async fn close(&self, session: BrowserSession) -> Result<()> {
        session.close().await?;
        info!("Browser closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.window_width, 1920);
        assert_eq!(config.window_height, 1080);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_from_suite_config() {
        let mut suite = SuiteConfig::default();
        suite.browser.headless = true;
        suite.browser.extra_args.push("--lang=en-US".to_string());

        let config = BrowserConfig::from(&suite);
        assert!(config.headless);
        assert!(config.args.contains(&"--disable-gpu".to_string()));
        assert_eq!(config.args.last().map(String::as_str), Some("--lang=en-US"));
    }

    #[test]
    fn test_js_string_escapes_quotes() {
        assert_eq!(js_string("#email"), "\"#email\"");
        assert_eq!(js_string("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_probe_script_embeds_selector() {
        let script = probe_script(".error-message");
        assert!(script.contains("document.querySelector(\".error-message\")"));
        assert!(script.contains("JSON.stringify"));
    }
}
