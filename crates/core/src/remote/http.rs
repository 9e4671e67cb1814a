//! HTTP client for the remote conversion service.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{multipart, Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use super::error::RemoteError;
use super::traits::{ConversionService, RemoteOutput};
use crate::config::RemoteConfig;
use crate::converter::SourceItem;
use crate::format::{resolve, ImageFormat};

/// Talks to a conversion service over multipart HTTP.
pub struct HttpConversionService {
    client: Client,
    config: RemoteConfig,
}

impl HttpConversionService {
    /// Create a new client with the given configuration.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }

    fn build_form(
        item: &SourceItem,
        format: ImageFormat,
        quality: Option<f32>,
        max_width: Option<u32>,
    ) -> Result<multipart::Form, RemoteError> {
        let mime = item
            .format
            .map(|f| f.mime_type())
            .unwrap_or("application/octet-stream");

        let file_part = multipart::Part::bytes(item.data.to_vec())
            .file_name(item.name.clone())
            .mime_str(mime)
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        let mut form = multipart::Form::new()
            .part("file", file_part)
            .text("format", format.as_str());

        if let Some(q) = quality {
            form = form.text("quality", q.to_string());
        }
        if let Some(width) = max_width {
            form = form.text("maxWidth", width.to_string());
        }

        Ok(form)
    }
}

#[async_trait]
impl ConversionService for HttpConversionService {
    fn name(&self) -> &str {
        "http"
    }

    async fn convert(
        &self,
        item: &SourceItem,
        format: ImageFormat,
        quality: Option<f32>,
        max_width: Option<u32>,
    ) -> Result<RemoteOutput, RemoteError> {
        let form = Self::build_form(item, format, quality, max_width)?;
        let url = self.endpoint("/convert");
        debug!(item = %item.name, %format, url = %url, "Submitting remote conversion");

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_IMPLEMENTED {
            return Err(RemoteError::UnsupportedFormat { format });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Trust the service's content type over what we asked for.
        let output_format = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(resolve)
            .unwrap_or(format);

        let data = response.bytes().await?;
        if data.is_empty() {
            return Err(RemoteError::InvalidResponse("empty body".to_string()));
        }

        Ok(RemoteOutput {
            data,
            format: output_format,
        })
    }

    async fn health(&self) -> Result<(), RemoteError> {
        let response = self.client.get(self.endpoint("/health")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: String::new(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> RemoteConfig {
        RemoteConfig {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let service = HttpConversionService::new(config("http://localhost:3000/")).unwrap();
        assert_eq!(service.endpoint("/convert"), "http://localhost:3000/convert");
    }

    #[test]
    fn test_build_form_accepts_unknown_source_format() {
        let item = SourceItem::new("blob", None, vec![1u8, 2, 3]);
        let form = HttpConversionService::build_form(&item, ImageFormat::Webp, Some(0.5), Some(640));
        assert!(form.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_connection_failure() {
        // Port 9 (discard) is closed on test machines.
        let service = HttpConversionService::new(config("http://127.0.0.1:9")).unwrap();
        let item = SourceItem::new("a.png", Some(ImageFormat::Png), vec![0u8; 4]);
        let err = service
            .convert(&item, ImageFormat::Jpeg, Some(0.8), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RemoteError::ConnectionFailed(_) | RemoteError::Request(_)
        ));
    }
}
