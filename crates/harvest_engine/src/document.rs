use crate::{Activation, ActiveSnapshot, DocumentError, TitleSources};

/// CSS selectors that bind the harvester to one page layout.
///
/// Defaults target the chat history sidebar of chatgpt.com.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locators {
    /// The scrollable list region.
    pub container: String,
    /// Items, relative to the container.
    pub item: String,
    /// Clickable element inside an item.
    pub activation_handle: String,
    /// Element inside an item carrying the title attribute.
    pub title: String,
    pub title_attribute: String,
    /// Element inside an item whose text is used when the attribute is absent.
    pub title_fallback: String,
    /// Attribute logged as the item identifier.
    pub item_id_attribute: String,
    /// Embedded images worth saving.
    pub image: String,
    /// Restricts image lookup to this region; `None` searches the whole document.
    pub image_region: Option<String>,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            container: r#"nav[aria-label="Chat history"].flex.h-full.w-full.flex-col.px-3 .overflow-y-auto"#
                .to_string(),
            item: r#"li[data-testid^="history-item-"]"#.to_string(),
            activation_handle: "a[href], button".to_string(),
            title: "div[title]".to_string(),
            title_attribute: "title".to_string(),
            title_fallback: ".relative.grow".to_string(),
            item_id_attribute: "data-testid".to_string(),
            image: r#"img[alt="Uploaded image"]"#.to_string(),
            image_region: None,
        }
    }
}

/// The live page the harvester drives.
///
/// The document is shared mutable state: the harvester calls these methods
/// strictly one at a time and never activates an item before the previous
/// capture is persisted.
#[async_trait::async_trait]
pub trait HostDocument: Send + Sync {
    /// Handle to one rendered list item.
    type Item: Send + Sync;

    async fn container_present(&self) -> Result<bool, DocumentError>;

    /// Scrolls the container to its maximum extent.
    async fn scroll_to_end(&self) -> Result<(), DocumentError>;

    async fn count_items(&self) -> Result<usize, DocumentError>;

    /// Items in render order.
    async fn list_items(&self) -> Result<Vec<Self::Item>, DocumentError>;

    async fn item_id(&self, item: &Self::Item) -> Result<Option<String>, DocumentError>;

    /// Brings the item into view. Presentation only.
    async fn reveal(&self, item: &Self::Item) -> Result<(), DocumentError>;

    async fn activate(&self, item: &Self::Item) -> Result<Activation, DocumentError>;

    async fn item_title(&self, item: &Self::Item) -> Result<TitleSources, DocumentError>;

    async fn capture(&self) -> Result<ActiveSnapshot, DocumentError>;
}
