//! `POST /convert`: single-image conversion over multipart.
//!
//! Fields: `file` (required), `format` (short name or MIME type), `quality`
//! (0–1), `maxWidth` (pixels). Formats that cannot be produced here answer
//! 501 so clients can fall back to converting locally.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info, warn};

use pixup_core::format::{resolve, resolve_extension};
use pixup_core::{ImageFormat, RasterError, SourceItem};

use crate::metrics::CONVERSIONS_TOTAL;
use crate::state::AppState;

/// Quality used when the form carries none, on the encoder's 1–100 scale.
const DEFAULT_QUALITY_PERCENT: u8 = 80;

/// Errors answered by the convert endpoint, as plain-text bodies.
#[derive(Debug, thiserror::Error)]
pub enum ConvertApiError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Invalid multipart body: {message}")]
    Multipart { status: StatusCode, message: String },

    #[error("Requested output format is not supported by the server. Supported: {supported}")]
    Unsupported { supported: String },

    #[error("Conversion failed: {0}")]
    Failed(String),
}

impl From<MultipartError> for ConvertApiError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<RasterError> for ConvertApiError {
    fn from(err: RasterError) -> Self {
        Self::Failed(err.to_string())
    }
}

impl IntoResponse for ConvertApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingFile => StatusCode::BAD_REQUEST,
            Self::Multipart { status, .. } => *status,
            Self::Unsupported { .. } => StatusCode::NOT_IMPLEMENTED,
            Self::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

struct UploadedFile {
    name: String,
    content_type: Option<String>,
    data: Bytes,
}

/// The multipart fields this endpoint understands.
#[derive(Default)]
struct ConvertForm {
    file: Option<UploadedFile>,
    format: Option<String>,
    quality: Option<String>,
    max_width: Option<String>,
}

impl ConvertForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, ConvertApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match name.as_str() {
                "file" => {
                    let file_name = field.file_name().unwrap_or("upload").to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await?;
                    form.file = Some(UploadedFile {
                        name: file_name,
                        content_type,
                        data,
                    });
                }
                "format" => form.format = Some(field.text().await?),
                "quality" => form.quality = Some(field.text().await?),
                "maxWidth" => form.max_width = Some(field.text().await?),
                other => debug!(field = other, "Ignoring unknown multipart field"),
            }
        }
        Ok(form)
    }
}

/// Rescales a 0–1 quality onto 1–100; missing or unparseable input uses 80.
fn quality_percent(raw: Option<&str>) -> u8 {
    raw.and_then(|q| q.trim().parse::<f64>().ok())
        .filter(|q| q.is_finite())
        .map(|q| (q * 100.0).round().clamp(1.0, 100.0) as u8)
        .unwrap_or(DEFAULT_QUALITY_PERCENT)
}

/// Parses a positive width; anything else disables resizing.
fn max_width(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|w| w.trim().parse::<u32>().ok())
        .filter(|w| *w > 0)
}

fn content_disposition(stem: &str, format: ImageFormat) -> HeaderValue {
    let safe: String = stem
        .chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect();
    HeaderValue::from_str(&format!(
        "attachment; filename=\"converted_{}.{}\"",
        safe,
        format.as_str()
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

pub async fn convert(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ConvertApiError> {
    let form = ConvertForm::read(&mut multipart).await?;
    let file = form.file.ok_or(ConvertApiError::MissingFile)?;
    let rasterizer = state.rasterizer();

    let Some(format) = form
        .format
        .as_deref()
        .and_then(resolve)
        .filter(|f| rasterizer.can_encode(*f))
    else {
        let requested = form.format.unwrap_or_default();
        CONVERSIONS_TOTAL
            .with_label_values(&["none", "unsupported"])
            .inc();
        debug!(requested = %requested, "Rejected unsupported output format");
        let supported = state
            .supported_formats()
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(",");
        return Err(ConvertApiError::Unsupported { supported });
    };

    let quality = quality_percent(form.quality.as_deref());
    let max_width = max_width(form.max_width.as_deref());
    let source_format = file
        .content_type
        .as_deref()
        .and_then(resolve)
        .or_else(|| resolve_extension(&file.name));
    let item = SourceItem::new(file.name, source_format, file.data);

    let result = async {
        let mut surface = rasterizer.decode(item.data.clone(), item.format).await?;
        if let Some(width) = max_width {
            surface = rasterizer.resize(surface, width).await?;
        }
        let quality = format.is_lossy().then_some(quality as f32 / 100.0);
        rasterizer.encode(surface, format, quality).await
    }
    .await;

    let data = match result {
        Ok(data) => data,
        Err(e) => {
            CONVERSIONS_TOTAL
                .with_label_values(&[format.as_str(), "failed"])
                .inc();
            warn!(file = %item.name, %format, error = %e, "Conversion error");
            return Err(e.into());
        }
    };

    CONVERSIONS_TOTAL
        .with_label_values(&[format.as_str(), "success"])
        .inc();
    info!(
        file = %item.name,
        %format,
        quality,
        ?max_width,
        input_bytes = item.size(),
        output_bytes = data.len(),
        "Converted upload"
    );

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(format.mime_type()),
            ),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(item.stem(), format),
            ),
        ],
        data,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_percent() {
        assert_eq!(quality_percent(None), 80);
        assert_eq!(quality_percent(Some("0.75")), 75);
        assert_eq!(quality_percent(Some("0")), 1);
        assert_eq!(quality_percent(Some("3")), 100);
        assert_eq!(quality_percent(Some("abc")), 80);
    }

    #[test]
    fn test_max_width() {
        assert_eq!(max_width(Some("640")), Some(640));
        assert_eq!(max_width(Some("0")), None);
        assert_eq!(max_width(Some("-3")), None);
        assert_eq!(max_width(None), None);
    }

    #[test]
    fn test_content_disposition() {
        let value = content_disposition("holiday photo", ImageFormat::Webp);
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"converted_holiday photo.webp\""
        );

        let value = content_disposition("we\"ird", ImageFormat::Jpeg);
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"converted_we_ird.jpeg\""
        );
    }
}
