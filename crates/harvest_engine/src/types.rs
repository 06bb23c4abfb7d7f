use std::fmt;

use crate::persist::PersistError;

/// Document state captured right after an item was activated and the page settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSnapshot {
    /// Full `outerHTML` of the document element.
    pub html: String,
    /// Location of the page at capture time; used to resolve relative image sources.
    pub page_url: Option<String>,
}

/// One embedded image found in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Absolute source locator when it could be resolved, raw attribute otherwise.
    pub src: String,
    /// File extension including the leading dot.
    pub extension: String,
}

/// Raw title candidates read from an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleSources {
    pub attribute: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Triggered,
    HandleMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// The in-page fetch script failed or returned garbage.
    Script,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Script => write!(f, "page script error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Failure talking to the host document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("element not found: {0}")]
    NotFound(String),
    #[error("browser error: {0}")]
    Browser(String),
    #[error("unexpected script result: {0}")]
    Script(String),
}

/// Failure while visiting a single item. Never aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("no activation handle in item")]
    ActivationHandleMissing,
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Failure that ends the whole run.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("container not found after {attempts} attempts")]
    ContainerNotFound { attempts: u32 },
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
}
