//! Headless-browser primitives.
//!
//! A thin layer over chromiumoxide giving the session module the handful of
//! actions the marketplace flow needs: navigate, wait, fill, click, and read
//! the page back for parsing. One engine owns one browser and one page; a
//! worker owns one engine for its lifetime.

use crate::error::{MarketplaceError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use quotient_core::BrowserSettings;
use std::time::Duration;
use tokio::time::Instant;

/// Poll interval while waiting for a selector to appear.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Browser automation engine for the marketplace UI.
pub struct BrowserEngine {
    browser: Browser,
    page: Page,
    navigation_timeout: Duration,
}

impl BrowserEngine {
    /// Launch a browser and open a blank page.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(settings.window_width, settings.window_height);
        if !settings.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(MarketplaceError::Browser)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| MarketplaceError::Browser(e.to_string()))?;

        // Drive the CDP event loop for the lifetime of the browser
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| MarketplaceError::Browser(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            navigation_timeout: Duration::from_secs(settings.navigation_timeout_secs),
        })
    }

    /// Navigate the page to a URL and wait for the load to settle.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| MarketplaceError::Navigation(format!("{url}: {e}")))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| MarketplaceError::Navigation(format!("{url}: {e}")))?;
        Ok(())
    }

    /// Wait until a selector matches, up to the navigation timeout.
    pub async fn wait_for_selector(&self, selector: &str) -> Result<()> {
        self.wait_for_selector_timeout(selector, self.navigation_timeout)
            .await
    }

    /// Wait until a selector matches, up to the given timeout.
    pub async fn wait_for_selector_timeout(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(MarketplaceError::Timeout(format!(
                    "selector {selector} did not appear within {timeout:?}"
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Clear a field and type a value into it.
    pub async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| MarketplaceError::SelectorNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| MarketplaceError::Browser(e.to_string()))?;
        self.eval_bool(&format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; el.value = ''; return true; }})()",
            js_string(selector)
        ))
        .await?;
        element
            .type_str(value)
            .await
            .map_err(|e| MarketplaceError::Browser(e.to_string()))?;
        Ok(())
    }

    /// Click the element a selector matches.
    pub async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| MarketplaceError::SelectorNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| MarketplaceError::Browser(e.to_string()))?;
        Ok(())
    }

    /// Click the first anchor whose text contains the given fragment.
    ///
    /// Returns false when no such anchor exists.
    pub async fn click_link_containing(&self, text: &str) -> Result<bool> {
        self.eval_bool(&format!(
            "(() => {{ const a = Array.from(document.querySelectorAll('a')) \
                .find(x => x.textContent.includes({})); \
                if (!a) return false; a.click(); return true; }})()",
            js_string(text)
        ))
        .await
    }

    /// Press a key on the element a selector matches.
    pub async fn press_key(&self, selector: &str, key: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| MarketplaceError::SelectorNotFound(selector.to_string()))?;
        element
            .press_key(key)
            .await
            .map_err(|e| MarketplaceError::Browser(e.to_string()))?;
        Ok(())
    }

    /// Check a checkbox if it is not already checked.
    ///
    /// Returns false when the selector matches nothing.
    pub async fn ensure_checked(&self, selector: &str) -> Result<bool> {
        self.eval_bool(&format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; \
                if (!el.checked) el.click(); return true; }})()",
            js_string(selector)
        ))
        .await
    }

    /// Whether the element a selector matches exists and is not disabled.
    pub async fn is_enabled(&self, selector: &str) -> Result<bool> {
        self.eval_bool(&format!(
            "(() => {{ const el = document.querySelector({}); \
                return !!el && !el.disabled; }})()",
            js_string(selector)
        ))
        .await
    }

    /// Current page HTML.
    pub async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| MarketplaceError::Browser(e.to_string()))
    }

    /// Send Escape to the page, dismissing any open popup.
    pub async fn dismiss_popup(&self) -> Result<()> {
        self.eval_bool(
            "(() => { document.dispatchEvent(new KeyboardEvent('keydown', \
                { key: 'Escape', keyCode: 27, bubbles: true })); return true; })()",
        )
        .await?;
        Ok(())
    }

    /// Close the browser.
    pub async fn close(&mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("browser close failed: {}", e);
        }
    }

    async fn eval_bool(&self, expression: &str) -> Result<bool> {
        let result = self
            .page
            .evaluate(expression)
            .await
            .map_err(|e| MarketplaceError::Browser(e.to_string()))?;
        result
            .into_value::<bool>()
            .map_err(|e| MarketplaceError::Browser(format!("script result: {e}")))
    }
}

/// Quote a string for safe embedding in a JS expression.
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}
