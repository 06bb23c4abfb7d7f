use std::sync::Arc;

use harvest_core::image_extension;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{ActiveSnapshot, AssetFetcher, FetchError, ImageAsset};

/// Where images are looked up in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageScope {
    /// Every matching image in the document, including leftovers from earlier items.
    #[default]
    Document,
    /// Only images inside the first element matching this selector.
    Region(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Finds embedded images in a snapshot and fetches their bytes.
pub struct AssetExtractor {
    fetcher: Arc<dyn AssetFetcher>,
    image: Selector,
    region: Option<Selector>,
}

impl AssetExtractor {
    pub fn new(
        fetcher: Arc<dyn AssetFetcher>,
        image_selector: &str,
        scope: &ImageScope,
    ) -> Result<Self, ExtractError> {
        let image = parse_selector(image_selector)?;
        let region = match scope {
            ImageScope::Document => None,
            ImageScope::Region(selector) => Some(parse_selector(selector)?),
        };
        Ok(Self {
            fetcher,
            image,
            region,
        })
    }

    /// Images in document order. Sources are resolved against the page location.
    pub fn locate(&self, snapshot: &ActiveSnapshot) -> Vec<ImageAsset> {
        let doc = Html::parse_document(&snapshot.html);
        let base = snapshot
            .page_url
            .as_deref()
            .and_then(|url| Url::parse(url).ok());

        let root = match &self.region {
            Some(region) => match doc.select(region).next() {
                Some(node) => node,
                None => return Vec::new(),
            },
            None => doc.root_element(),
        };

        root.select(&self.image)
            .filter_map(|img| source_of(img, base.as_ref()))
            .map(|src| ImageAsset {
                extension: image_extension(&src),
                src,
            })
            .collect()
    }

    pub async fn fetch(&self, asset: &ImageAsset) -> Result<Vec<u8>, FetchError> {
        let output = self.fetcher.fetch(&asset.src).await?;
        Ok(output.bytes)
    }
}

fn source_of(img: ElementRef<'_>, base: Option<&Url>) -> Option<String> {
    let raw = img.value().attr("src")?.trim();
    if raw.is_empty() {
        return None;
    }
    let resolved = match base {
        Some(base) => base.join(raw).map(|url| url.to_string()).ok(),
        None => None,
    };
    Some(resolved.unwrap_or_else(|| raw.to_string()))
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|err| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}
