//! Browser-backed marketplace implementation.
//!
//! One `BrowserMarketplace` is shared by the run; each worker opens its own
//! `BrowserSession` (own browser process, own login). The submission flow
//! mirrors the site: search the part, open the supplier popup, open the
//! e-mail RFQ form, tick the part, set the quantity, send.

use crate::client::{Marketplace, MarketplaceSession, QuoteRequest};
use crate::engine::BrowserEngine;
use crate::error::{MarketplaceError, Result};
use crate::parser::ListingParser;
use crate::selectors::SiteSelectors;
use quotient_core::{BrowserSettings, ListingRecord, MarketplaceSettings};
use std::time::Duration;

/// Settle time after an in-page action that triggers a popup or reload.
const ACTION_SETTLE: Duration = Duration::from_millis(1500);

/// Settle time after firing a search; results render incrementally.
const SEARCH_SETTLE: Duration = Duration::from_secs(3);

/// Marketplace backed by browser automation.
pub struct BrowserMarketplace {
    marketplace: MarketplaceSettings,
    browser: BrowserSettings,
    selectors: SiteSelectors,
}

impl BrowserMarketplace {
    /// Create a marketplace with the default site selectors.
    #[must_use]
    pub fn new(marketplace: MarketplaceSettings, browser: BrowserSettings) -> Self {
        Self {
            marketplace,
            browser,
            selectors: SiteSelectors::default(),
        }
    }

    /// Override the site selectors.
    #[must_use]
    pub fn with_selectors(mut self, selectors: SiteSelectors) -> Self {
        self.selectors = selectors;
        self
    }
}

#[async_trait::async_trait]
impl Marketplace for BrowserMarketplace {
    async fn open_session(&self, worker_id: usize) -> Result<Box<dyn MarketplaceSession>> {
        if !self.marketplace.has_credentials() {
            return Err(MarketplaceError::Auth(
                "marketplace credentials not configured".to_string(),
            ));
        }

        tracing::info!(worker_id, "opening marketplace session");
        let engine = BrowserEngine::launch(&self.browser).await?;
        let mut session = BrowserSession {
            engine,
            marketplace: self.marketplace.clone(),
            selectors: self.selectors.clone(),
            parser: ListingParser::new(&self.selectors)?,
            worker_id,
        };

        if let Err(e) = session.login().await {
            session.close().await;
            return Err(e);
        }
        tracing::info!(worker_id, "marketplace session ready");
        Ok(Box::new(session))
    }
}

/// One authenticated browser session, owned by one worker.
pub struct BrowserSession {
    engine: BrowserEngine,
    marketplace: MarketplaceSettings,
    selectors: SiteSelectors,
    parser: ListingParser,
    worker_id: usize,
}

impl BrowserSession {
    /// Log in and wait until the search form is usable.
    async fn login(&self) -> Result<()> {
        let sel = &self.selectors;

        self.engine.goto(&self.marketplace.base_url).await?;
        if !self.engine.click_link_containing(&sel.login_link_text).await? {
            return Err(MarketplaceError::Auth(
                "login link not found on landing page".to_string(),
            ));
        }
        self.engine.wait_for_selector(&sel.account_input).await.map_err(|_| {
            MarketplaceError::Auth("login form did not appear".to_string())
        })?;

        self.engine
            .fill(&sel.account_input, &self.marketplace.account)
            .await?;
        self.engine
            .fill(&sel.username_input, &self.marketplace.username)
            .await?;
        self.engine
            .fill(&sel.password_input, &self.marketplace.password)
            .await?;
        self.engine.press_key(&sel.password_input, "Enter").await?;
        tokio::time::sleep(ACTION_SETTLE).await;

        // The search form only renders for an authenticated account
        self.engine.goto(&self.marketplace.base_url).await?;
        self.engine
            .wait_for_selector(&sel.search_input)
            .await
            .map_err(|_| {
                MarketplaceError::Auth(
                    "search form not reachable after login, check credentials".to_string(),
                )
            })?;
        Ok(())
    }

    /// Run a part search and leave the results page loaded.
    async fn search(&self, part_number: &str) -> Result<()> {
        let sel = &self.selectors;
        self.engine.goto(&self.marketplace.base_url).await?;
        self.engine.wait_for_selector(&sel.search_input).await?;
        self.engine.fill(&sel.search_input, part_number).await?;
        self.engine.click(&sel.search_button).await?;
        tokio::time::sleep(SEARCH_SETTLE).await;
        Ok(())
    }
}

#[async_trait::async_trait]
impl MarketplaceSession for BrowserSession {
    async fn fetch_listings(&mut self, part_number: &str) -> Result<Vec<ListingRecord>> {
        tracing::debug!(worker_id = self.worker_id, part = part_number, "searching");
        self.search(part_number).await?;

        if self
            .engine
            .wait_for_selector_timeout(&self.selectors.results_rows, Duration::from_secs(10))
            .await
            .is_err()
        {
            // No results table means no offers for the part
            return Ok(Vec::new());
        }

        let html = self.engine.content().await?;
        Ok(self.parser.parse(&html, part_number))
    }

    async fn submit_request(&mut self, request: &QuoteRequest) -> Result<()> {
        let sel = &self.selectors;
        tracing::debug!(
            worker_id = self.worker_id,
            part = %request.part_number,
            supplier = %request.supplier,
            quantity = request.quantity,
            "submitting quote request"
        );

        // Fresh search so the supplier link is on the page
        self.search(&request.part_number).await?;

        if !self.engine.click_link_containing(&request.supplier).await? {
            return Err(MarketplaceError::SelectorNotFound(format!(
                "supplier link for {}",
                request.supplier
            )));
        }
        tokio::time::sleep(ACTION_SETTLE).await;

        if !self.engine.click_link_containing(&sel.rfq_link_text).await? {
            self.engine.dismiss_popup().await?;
            return Err(MarketplaceError::SubmissionRejected(format!(
                "{} does not accept e-mail requests",
                request.supplier
            )));
        }
        self.engine.wait_for_selector(&sel.quantity_input).await?;

        self.engine.ensure_checked(&sel.part_checkbox).await?;
        self.engine
            .fill(&sel.quantity_input, &request.quantity.to_string())
            .await?;

        if let Some(message) = &request.message {
            self.engine.fill(&sel.comments_input, message).await?;
        }

        if !self.engine.is_enabled(&sel.send_button).await? {
            self.engine.dismiss_popup().await?;
            return Err(MarketplaceError::SubmissionRejected(
                "send button missing or disabled".to_string(),
            ));
        }
        self.engine.click(&sel.send_button).await?;
        tokio::time::sleep(ACTION_SETTLE).await;
        self.engine.dismiss_popup().await?;

        Ok(())
    }

    async fn close(&mut self) {
        tracing::debug!(worker_id = self.worker_id, "closing marketplace session");
        self.engine.close().await;
    }
}
