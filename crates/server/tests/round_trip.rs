//! The HTTP conversion client against a live server on a local socket.

mod common;

use std::sync::Arc;

use pixup_core::{
    BatchConfig, BatchProcessor, ConversionPath, ConversionRequest, ConversionService, Converter,
    HttpConversionService, ImageConverter, ImageFormat, ImageRasterizer, ItemResult,
    RemoteCapabilities, RemoteConfig, RemoteError, SourceItem,
};

use common::{fixtures, spawn_server};

fn client_for(addr: std::net::SocketAddr) -> HttpConversionService {
    HttpConversionService::new(RemoteConfig {
        url: format!("http://{}", addr),
        timeout_secs: 5,
        ..Default::default()
    })
    .unwrap()
}

fn converter_for(addr: std::net::SocketAddr) -> ImageConverter {
    ImageConverter::new(Arc::new(ImageRasterizer::new())).with_remote(
        Arc::new(client_for(addr)),
        RemoteCapabilities::default(),
    )
}

#[tokio::test]
async fn test_client_health_check() {
    let (addr, server) = spawn_server().await;

    client_for(addr).health().await.unwrap();

    server.abort();
}

#[tokio::test]
async fn test_client_converts_remotely() {
    let (addr, server) = spawn_server().await;
    let client = client_for(addr);
    let item = fixtures::source_item("photo.png", ImageFormat::Png);

    let output = client
        .convert(&item, ImageFormat::Webp, Some(0.8), None)
        .await
        .unwrap();

    assert_eq!(output.format, ImageFormat::Webp);
    assert!(image::load_from_memory(&output.data).is_ok());

    server.abort();
}

#[tokio::test]
async fn test_client_reports_unsupported_format() {
    let (addr, server) = spawn_server().await;
    let client = client_for(addr);
    let item = fixtures::source_item("photo.png", ImageFormat::Png);

    let err = client
        .convert(&item, ImageFormat::Avif, None, None)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RemoteError::UnsupportedFormat {
            format: ImageFormat::Avif
        }
    );

    server.abort();
}

#[tokio::test]
async fn test_client_surfaces_server_errors() {
    let (addr, server) = spawn_server().await;
    let client = client_for(addr);
    let item = SourceItem::new("broken.png", Some(ImageFormat::Png), fixtures::corrupt_bytes());

    let err = client
        .convert(&item, ImageFormat::Jpeg, None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Status { status: 500, .. }), "{err:?}");

    server.abort();
}

#[tokio::test]
async fn test_converter_uses_remote_path() {
    let (addr, server) = spawn_server().await;
    let converter = converter_for(addr);
    let item = fixtures::source_item("photo.png", ImageFormat::Png);

    let converted = converter
        .convert(&item, &ConversionRequest::to_format(ImageFormat::Jpeg))
        .await
        .unwrap();

    assert_eq!(converted.path, ConversionPath::Remote);
    assert_eq!(converted.format, ImageFormat::Jpeg);

    server.abort();
}

#[tokio::test]
async fn test_converter_falls_back_locally_when_server_cannot_encode() {
    let (addr, server) = spawn_server().await;
    let converter = converter_for(addr);
    let item = fixtures::source_item("photo.png", ImageFormat::Png);

    let converted = converter
        .convert(&item, &ConversionRequest::to_format(ImageFormat::Avif))
        .await
        .unwrap();

    assert_eq!(converted.path, ConversionPath::Local);
    assert_eq!(converted.format, ImageFormat::Jpeg);

    server.abort();
}

#[tokio::test]
async fn test_batch_through_live_server() {
    let (addr, server) = spawn_server().await;
    let processor = BatchProcessor::new(BatchConfig::default(), converter_for(addr));
    let items = fixtures::png_items(&["a.png", "b.png", "c.png", "d.png"]);

    let outcome = processor
        .run(&items, &ConversionRequest::to_format(ImageFormat::Webp), None, None)
        .await
        .unwrap();

    assert_eq!(outcome.len(), 4);
    for (index, result) in outcome.results.iter().enumerate() {
        assert_eq!(result.name(), items[index].name);
        match result {
            ItemResult::Success { output, .. } => {
                assert_eq!(output.path, ConversionPath::Remote);
                assert_eq!(output.format, ImageFormat::Webp);
            }
            ItemResult::Failure { error, .. } => panic!("item {index} failed: {error}"),
        }
    }

    server.abort();
}
