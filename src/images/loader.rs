//! HTTP image loader backed by reqwest.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::{ImageLoader, LoadedImage};
use crate::error::ImageError;

/// Loads images over HTTP. Relative sources are resolved against `base_url`.
#[derive(Debug, Clone)]
pub struct HttpImageLoader {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpImageLoader {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: Some(base_url.into()),
        }
    }

    fn resolve(&self, src: &str) -> Result<String, ImageError> {
        if src.trim().is_empty() {
            return Err(ImageError::InvalidSource("empty source".to_string()));
        }
        if src.starts_with("http://") || src.starts_with("https://") {
            return Ok(src.to_string());
        }
        match &self.base_url {
            Some(base) => Ok(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                src.trim_start_matches('/')
            )),
            None => Err(ImageError::InvalidSource(src.to_string())),
        }
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, src: &str) -> Result<LoadedImage, ImageError> {
        let url = self.resolve(src)?;
        let failed = |reason: String| ImageError::LoadFailed {
            src: src.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status())));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;

        Ok(LoadedImage {
            src: src.to_string(),
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::header, routing::get, Router};

    async fn serve_images() -> String {
        let app = Router::new().route(
            "/img/logo.png",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], vec![0x89u8, b'P', b'N', b'G']) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_resolve_relative_against_base() {
        let loader = HttpImageLoader::with_base_url(reqwest::Client::new(), "https://cdn.example.com/");
        assert_eq!(
            loader.resolve("/img/a.png").unwrap(),
            "https://cdn.example.com/img/a.png"
        );
    }

    #[test]
    fn test_resolve_rejects_relative_without_base() {
        let loader = HttpImageLoader::new(reqwest::Client::new());
        assert!(matches!(
            loader.resolve("img/a.png"),
            Err(ImageError::InvalidSource(_))
        ));
        assert!(loader.resolve("  ").is_err());
    }

    #[tokio::test]
    async fn test_load_over_http() {
        let base = serve_images().await;
        let loader = HttpImageLoader::with_base_url(reqwest::Client::new(), base);

        let image = loader.load("/img/logo.png").await.unwrap();

        assert_eq!(image.bytes, vec![0x89, b'P', b'N', b'G']);
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_load_missing_image_fails() {
        let base = serve_images().await;
        let loader = HttpImageLoader::with_base_url(reqwest::Client::new(), base);

        let result = loader.load("/img/missing.png").await;

        assert!(matches!(result, Err(ImageError::LoadFailed { .. })));
    }
}
