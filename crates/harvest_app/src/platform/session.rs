//! Browser attachment: connect to (or launch) Chrome and pick the tab to drive.

use std::time::Duration;

use anyhow::{anyhow, Context};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use harvest_logging::{harvest_debug, harvest_info, harvest_warn, Phase};
use tokio::task::JoinHandle;

/// How the session reaches a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTarget {
    Connect(String),
    Launch,
}

/// Which tab to drive once attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageChoice {
    pub page_match: Option<String>,
    pub url: Option<String>,
}

pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
    launched: bool,
}

impl BrowserSession {
    pub async fn open(target: SessionTarget, choice: &PageChoice) -> anyhow::Result<Self> {
        let launched = target == SessionTarget::Launch;
        let (mut browser, mut handler) = match target {
            SessionTarget::Connect(ws) => {
                harvest_info!(Phase::Startup, "Connecting to browser at {}", ws);
                Browser::connect(ws)
                    .await
                    .context("failed to connect to the browser")?
            }
            SessionTarget::Launch => {
                harvest_info!(Phase::Startup, "Launching browser");
                let config = BrowserConfig::builder()
                    .with_head()
                    .build()
                    .map_err(|err| anyhow!(err))?;
                Browser::launch(config)
                    .await
                    .context("failed to launch the browser")?
            }
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    harvest_debug!(Phase::Startup, "Browser event error: {}", err);
                }
            }
        });

        if !launched {
            if let Err(err) = browser.fetch_targets().await {
                harvest_warn!(Phase::Startup, "Could not list open tabs: {}", err);
            }
            // Attached targets show up asynchronously.
            tokio::time::sleep(Duration::from_millis(500)).await;
        }

        let page = select_page(&browser, choice).await?;
        if let Ok(Some(url)) = page.url().await {
            harvest_info!(Phase::Startup, "Driving tab {}", url);
        }

        Ok(Self {
            browser,
            handler,
            page,
            launched,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Closes a launched browser; an attached one is left running.
    pub async fn close(mut self) {
        if self.launched {
            if let Err(err) = self.browser.close().await {
                harvest_warn!(Phase::Summary, "Failed to close the browser: {}", err);
            }
        }
        self.handler.abort();
    }
}

async fn select_page(browser: &Browser, choice: &PageChoice) -> anyhow::Result<Page> {
    let pages = browser.pages().await.context("failed to list tabs")?;

    if let Some(needle) = choice.page_match.as_deref() {
        for page in &pages {
            if let Ok(Some(url)) = page.url().await {
                if url_matches(&url, needle) {
                    return Ok(page.clone());
                }
            }
        }
        harvest_warn!(Phase::Startup, "No open tab matches {:?}", needle);
    }

    if let Some(url) = choice.url.as_deref() {
        let page = browser
            .new_page(url)
            .await
            .with_context(|| format!("failed to open {url}"))?;
        page.wait_for_navigation()
            .await
            .with_context(|| format!("failed to load {url}"))?;
        return Ok(page);
    }

    if choice.page_match.is_none() {
        if let Some(page) = pages.into_iter().next() {
            return Ok(page);
        }
    }
    Err(anyhow!(
        "no tab to drive; pass --url or a --page-match that fits an open tab"
    ))
}

fn url_matches(url: &str, needle: &str) -> bool {
    url.contains(needle)
}
