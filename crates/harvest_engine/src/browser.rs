//! Chrome DevTools binding: the live page as a [`HostDocument`] and an
//! in-page asset fetcher.

use base64::Engine as _;
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{
    Activation, ActiveSnapshot, AssetFetcher, DocumentError, FailureKind, FetchError,
    FetchMetadata, FetchOutput, FetchSettings, HostDocument, Locators, TitleSources,
};

const SCROLL_INTO_VIEW_FN: &str = "function() { this.scrollIntoView({ block: 'center' }); }";
const CLICK_FN: &str = "function() { this.click(); }";
const TEXT_CONTENT_FN: &str = "function() { return this.textContent; }";

/// A browser tab driven over the DevTools protocol.
pub struct CdpDocument {
    page: Page,
    locators: Locators,
}

impl CdpDocument {
    pub fn new(page: Page, locators: Locators) -> Self {
        Self { page, locators }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T, DocumentError> {
        let result = self.page.evaluate(script).await.map_err(browser_error)?;
        result
            .into_value::<T>()
            .map_err(|err| DocumentError::Script(err.to_string()))
    }

    fn container_literal(&self) -> String {
        js_string(&self.locators.container)
    }

    async fn first_within(
        &self,
        item: &Element,
        selector: &str,
    ) -> Result<Option<Element>, DocumentError> {
        let mut found = item
            .find_elements(selector.to_string())
            .await
            .map_err(browser_error)?;
        if found.is_empty() {
            Ok(None)
        } else {
            Ok(Some(found.swap_remove(0)))
        }
    }
}

#[async_trait::async_trait]
impl HostDocument for CdpDocument {
    type Item = Element;

    async fn container_present(&self) -> Result<bool, DocumentError> {
        self.eval(format!(
            "document.querySelector({}) !== null",
            self.container_literal()
        ))
        .await
    }

    async fn scroll_to_end(&self) -> Result<(), DocumentError> {
        let scrolled: bool = self
            .eval(format!(
                "(() => {{ const c = document.querySelector({}); if (!c) return false; c.scrollTop = c.scrollHeight; return true; }})()",
                self.container_literal()
            ))
            .await?;
        if scrolled {
            Ok(())
        } else {
            Err(DocumentError::NotFound(self.locators.container.clone()))
        }
    }

    async fn count_items(&self) -> Result<usize, DocumentError> {
        self.eval(format!(
            "(() => {{ const c = document.querySelector({}); return c ? c.querySelectorAll({}).length : 0; }})()",
            self.container_literal(),
            js_string(&self.locators.item)
        ))
        .await
    }

    async fn list_items(&self) -> Result<Vec<Element>, DocumentError> {
        let container = self
            .page
            .find_element(self.locators.container.clone())
            .await
            .map_err(|_| DocumentError::NotFound(self.locators.container.clone()))?;
        container
            .find_elements(self.locators.item.clone())
            .await
            .map_err(browser_error)
    }

    async fn item_id(&self, item: &Element) -> Result<Option<String>, DocumentError> {
        item.attribute(self.locators.item_id_attribute.as_str())
            .await
            .map_err(browser_error)
    }

    async fn reveal(&self, item: &Element) -> Result<(), DocumentError> {
        item.call_js_fn(SCROLL_INTO_VIEW_FN, false)
            .await
            .map_err(browser_error)?;
        Ok(())
    }

    async fn activate(&self, item: &Element) -> Result<Activation, DocumentError> {
        let Some(handle) = self
            .first_within(item, &self.locators.activation_handle)
            .await?
        else {
            return Ok(Activation::HandleMissing);
        };
        handle
            .call_js_fn(CLICK_FN, false)
            .await
            .map_err(browser_error)?;
        Ok(Activation::Triggered)
    }

    async fn item_title(&self, item: &Element) -> Result<TitleSources, DocumentError> {
        let attribute = match self.first_within(item, &self.locators.title).await? {
            Some(node) => node
                .attribute(self.locators.title_attribute.as_str())
                .await
                .map_err(browser_error)?,
            None => None,
        };
        let text = match self.first_within(item, &self.locators.title_fallback).await? {
            Some(node) => {
                let returned = node
                    .call_js_fn(TEXT_CONTENT_FN, false)
                    .await
                    .map_err(browser_error)?;
                string_value(returned.result.value)
            }
            None => None,
        };
        Ok(TitleSources { attribute, text })
    }

    async fn capture(&self) -> Result<ActiveSnapshot, DocumentError> {
        let html = self.page.content().await.map_err(browser_error)?;
        let page_url = self.page.url().await.map_err(browser_error)?;
        Ok(ActiveSnapshot { html, page_url })
    }
}

/// Fetches assets from inside the page, with the page's cookies and origin.
#[derive(Clone)]
pub struct PageFetcher {
    page: Page,
    settings: FetchSettings,
}

impl PageFetcher {
    pub fn new(page: Page, settings: FetchSettings) -> Self {
        Self { page, settings }
    }

    fn script(&self, url: &str) -> String {
        format!(
            r#"(async () => {{
  try {{
    const response = await fetch({url}, {{ mode: 'cors' }});
    if (!response.ok) {{
      return {{ ok: false, status: response.status, finalUrl: response.url }};
    }}
    const buffer = await response.arrayBuffer();
    if (buffer.byteLength > {max}) {{
      return {{ ok: false, status: response.status, byteLen: buffer.byteLength }};
    }}
    const bytes = new Uint8Array(buffer);
    let binary = '';
    for (let i = 0; i < bytes.length; i += 0x8000) {{
      binary += String.fromCharCode.apply(null, bytes.subarray(i, i + 0x8000));
    }}
    return {{
      ok: true,
      status: response.status,
      body: btoa(binary),
      contentType: response.headers.get('content-type'),
      finalUrl: response.url,
      byteLen: buffer.byteLength,
    }};
  }} catch (e) {{
    return {{ ok: false, status: 0, error: String(e) }};
  }}
}})()"#,
            url = js_string(url),
            max = self.settings.max_bytes,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageFetchResult {
    ok: bool,
    status: u16,
    body: Option<String>,
    content_type: Option<String>,
    final_url: Option<String>,
    byte_len: Option<u64>,
    error: Option<String>,
}

#[async_trait::async_trait]
impl AssetFetcher for PageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let evaluation = tokio::time::timeout(
            self.settings.request_timeout,
            self.page.evaluate(self.script(url)),
        )
        .await
        .map_err(|_| FetchError::new(FailureKind::Timeout, "in-page fetch timed out"))?
        .map_err(|err| FetchError::new(FailureKind::Script, err.to_string()))?;

        let result: PageFetchResult = evaluation
            .into_value()
            .map_err(|err| FetchError::new(FailureKind::Script, err.to_string()))?;

        if let Some(error) = result.error {
            return Err(FetchError::new(FailureKind::Network, error));
        }
        if !result.ok {
            if let Some(actual) = result.byte_len {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(actual),
                    },
                    "response too large",
                ));
            }
            return Err(FetchError::new(
                FailureKind::HttpStatus(result.status),
                format!("HTTP error! Status: {}", result.status),
            ));
        }

        let encoded = result.body.unwrap_or_default();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|err| FetchError::new(FailureKind::Script, err.to_string()))?;

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url: result.final_url.unwrap_or_else(|| url.to_string()),
            redirect_count: 0,
            content_type: result.content_type,
            byte_len: bytes.len() as u64,
        };
        Ok(FetchOutput { bytes, metadata })
    }
}

fn browser_error(err: CdpError) -> DocumentError {
    DocumentError::Browser(err.to_string())
}

/// `textContent` of an element comes back as a string, or null for documents.
fn string_value(value: Option<serde_json::Value>) -> Option<String> {
    match value {
        Some(serde_json::Value::String(text)) => Some(text),
        _ => None,
    }
}

/// Quotes `raw` as a JavaScript string literal.
fn js_string(raw: &str) -> String {
    serde_json::Value::String(raw.to_string()).to_string()
}
