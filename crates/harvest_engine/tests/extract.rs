use std::sync::Arc;

use harvest_engine::{
    ActiveSnapshot, AssetExtractor, AssetFetcher, ExtractError, FailureKind, FetchError,
    FetchMetadata, FetchOutput, ImageAsset, ImageScope, Locators,
};
use pretty_assertions::assert_eq;

struct EchoFetcher;

#[async_trait::async_trait]
impl AssetFetcher for EchoFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        if url.ends_with("missing.png") {
            return Err(FetchError {
                kind: FailureKind::HttpStatus(404),
                message: "404 Not Found".to_string(),
            });
        }
        Ok(FetchOutput {
            bytes: url.as_bytes().to_vec(),
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: url.to_string(),
                redirect_count: 0,
                content_type: None,
                byte_len: url.len() as u64,
            },
        })
    }
}

const PAGE: &str = r#"
<html><body>
  <nav><img alt="Uploaded image" src="/sidebar/avatar.png"></nav>
  <main>
    <img alt="Uploaded image" src="/files/one.png">
    <img alt="Something else" src="/files/ignored.png">
    <img alt="Uploaded image" src="https://cdn.example.com/two.jpeg?w=800">
    <img alt="Uploaded image">
  </main>
</body></html>
"#;

fn snapshot() -> ActiveSnapshot {
    ActiveSnapshot {
        html: PAGE.to_string(),
        page_url: Some("https://chat.example.com/c/123".to_string()),
    }
}

fn extractor(scope: ImageScope) -> AssetExtractor {
    AssetExtractor::new(Arc::new(EchoFetcher), &Locators::default().image, &scope).unwrap()
}

#[test]
fn document_scope_finds_every_marked_image() {
    let assets = extractor(ImageScope::Document).locate(&snapshot());
    assert_eq!(
        assets,
        vec![
            ImageAsset {
                src: "https://chat.example.com/sidebar/avatar.png".to_string(),
                extension: ".png".to_string(),
            },
            ImageAsset {
                src: "https://chat.example.com/files/one.png".to_string(),
                extension: ".png".to_string(),
            },
            ImageAsset {
                src: "https://cdn.example.com/two.jpeg?w=800".to_string(),
                extension: ".jpg".to_string(),
            },
        ]
    );
}

#[test]
fn region_scope_ignores_images_outside_the_region() {
    let assets = extractor(ImageScope::Region("main".to_string())).locate(&snapshot());
    let sources: Vec<&str> = assets.iter().map(|a| a.src.as_str()).collect();
    assert_eq!(
        sources,
        vec![
            "https://chat.example.com/files/one.png",
            "https://cdn.example.com/two.jpeg?w=800",
        ]
    );
}

#[test]
fn missing_region_yields_no_images() {
    let assets = extractor(ImageScope::Region("article".to_string())).locate(&snapshot());
    assert!(assets.is_empty());
}

#[test]
fn relative_sources_are_kept_without_a_page_url() {
    let snapshot = ActiveSnapshot {
        html: r#"<img alt="Uploaded image" src="files/a.gif">"#.to_string(),
        page_url: None,
    };
    let assets = extractor(ImageScope::Document).locate(&snapshot);
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].src, "files/a.gif");
    assert_eq!(assets[0].extension, ".gif");
}

#[test]
fn invalid_selector_is_reported() {
    let err = AssetExtractor::new(Arc::new(EchoFetcher), "img[", &ImageScope::Document)
        .err()
        .unwrap();
    assert!(matches!(err, ExtractError::InvalidSelector { .. }));
}

#[tokio::test]
async fn fetch_returns_payload_or_error() {
    let extractor = extractor(ImageScope::Document);
    let ok = ImageAsset {
        src: "https://x.example.com/a.png".to_string(),
        extension: ".png".to_string(),
    };
    assert_eq!(
        extractor.fetch(&ok).await.unwrap(),
        b"https://x.example.com/a.png".to_vec()
    );

    let missing = ImageAsset {
        src: "https://x.example.com/missing.png".to_string(),
        extension: ".png".to_string(),
    };
    let err = extractor.fetch(&missing).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}
