//! Image reference resolution

use crate::types::{AnalysisRequest, ImageType};
use serde::{Deserialize, Serialize};

/// Format assumed for bare base64 payloads
pub const DEFAULT_IMAGE_FORMAT: &str = "jpeg";

/// A resolved image reference, ready to be placed in a model message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ImageRef {
    /// Remote URL passed through unchanged
    Url(String),
    /// `data:` URI carrying an inline payload
    DataUri(String),
}

impl ImageRef {
    /// Resolve a raw image field
    ///
    /// An HTTP(S) URL, or any value explicitly tagged as a URL, passes through.
    /// Everything else is base64: a value that already carries a `data:`
    /// prefix is kept, otherwise it is wrapped as
    /// `data:image/{format};base64,{payload}`.
    pub fn resolve(image: &str, image_type: Option<ImageType>, format: Option<&str>) -> Self {
        let image = image.trim();
        if image_type == Some(ImageType::Url) || is_http_url(image) {
            return ImageRef::Url(image.to_string());
        }
        if image.starts_with("data:") {
            return ImageRef::DataUri(image.to_string());
        }

        let format = format
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_IMAGE_FORMAT)
            .to_ascii_lowercase();
        ImageRef::DataUri(format!("data:image/{};base64,{}", format, image))
    }

    /// Resolve the image carried by a request
    pub fn from_request(request: &AnalysisRequest) -> Self {
        Self::resolve(&request.image, request.image_type, request.image_format.as_deref())
    }

    /// The URL to place in the `image_url` content part
    pub fn as_url(&self) -> &str {
        match self {
            ImageRef::Url(url) | ImageRef::DataUri(url) => url,
        }
    }

    /// Short description safe to log (never includes the payload)
    pub fn describe(&self) -> String {
        match self {
            ImageRef::Url(url) => format!("url({})", url),
            ImageRef::DataUri(uri) => {
                let header = uri.split(',').next().unwrap_or("data:");
                format!("{} ({} bytes)", header, uri.len())
            }
        }
    }
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_url_passes_through() {
        let image = ImageRef::resolve("https://cdn.example.com/a.png", None, None);
        assert_eq!(image, ImageRef::Url("https://cdn.example.com/a.png".to_string()));
    }

    #[test]
    fn test_explicit_url_tag_passes_through() {
        let image = ImageRef::resolve("s3://bucket/a.png", Some(ImageType::Url), None);
        assert_eq!(image.as_url(), "s3://bucket/a.png");
    }

    #[test]
    fn test_bare_base64_is_wrapped_with_default_format() {
        let image = ImageRef::resolve("iVBORw0KGgo=", None, None);
        assert_eq!(image.as_url(), "data:image/jpeg;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_bare_base64_uses_supplied_format() {
        let image = ImageRef::resolve("iVBORw0KGgo=", Some(ImageType::Base64), Some("PNG"));
        assert_eq!(image.as_url(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_existing_data_uri_is_kept() {
        let uri = "data:image/webp;base64,UklGRg==";
        assert_eq!(ImageRef::resolve(uri, None, Some("png")).as_url(), uri);
    }

    #[test]
    fn test_describe_hides_payload() {
        let image = ImageRef::resolve("QUJDRA==", None, None);
        let description = image.describe();
        assert!(description.starts_with("data:image/jpeg;base64"));
        assert!(!description.contains("QUJDRA"));
    }
}
