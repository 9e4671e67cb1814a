//! End-to-end batch conversion with the native rasterizer.

use std::sync::Arc;

use pixup_core::{
    converter::{ConversionPath, ConversionRequest, ImageConverter, SourceItem},
    format::ImageFormat,
    processor::{BatchConfig, BatchProcessor},
    rasterizer::ImageRasterizer,
    testing::fixtures,
};

fn processor() -> BatchProcessor<ImageConverter> {
    BatchProcessor::new(
        BatchConfig::default(),
        ImageConverter::new(Arc::new(ImageRasterizer::new())),
    )
}

fn dimensions(data: &[u8]) -> (u32, u32) {
    let image = image::load_from_memory(data).expect("output decodes");
    (image.width(), image.height())
}

#[tokio::test]
async fn test_mixed_batch_with_native_codecs() {
    let items = vec![
        SourceItem::from_file_name("photo.png", fixtures::png_bytes(120, 60)),
        SourceItem::from_file_name("anim.gif", fixtures::gif_bytes(30, 30)),
        SourceItem::from_file_name("broken.png", fixtures::corrupt_bytes()),
        SourceItem::with_mime("logo.svg", "image/svg+xml", fixtures::svg_bytes()),
    ];
    let request = ConversionRequest::to_format(ImageFormat::Webp)
        .with_quality(0.6)
        .with_max_width(50);

    let outcome = processor()
        .run(&items, &request, Some(2), None)
        .await
        .unwrap();

    let photo = outcome.results[0].output().expect("photo converts");
    assert_eq!(photo.format, ImageFormat::Webp);
    assert_eq!(photo.path, ConversionPath::Local);
    assert_eq!(&photo.data[8..12], b"WEBP");
    assert_eq!(dimensions(&photo.data), (50, 25));

    let gif = outcome.results[1].output().expect("gif converts");
    assert_eq!(gif.format, ImageFormat::Webp);
    assert_eq!(dimensions(&gif.data), (30, 30));

    assert!(outcome.results[2].error().is_some());

    let svg = outcome.results[3].output().expect("svg rasterizes");
    assert_eq!(dimensions(&svg.data), (40, 20));

    assert_eq!(outcome.summary().succeeded, 3);
}

#[tokio::test]
async fn test_keep_format_round_trips_source_format() {
    let items = vec![
        SourceItem::from_file_name("a.png", fixtures::png_bytes(16, 16)),
        SourceItem::from_file_name("b.gif", fixtures::gif_bytes(16, 16)),
    ];

    let outcome = processor()
        .run_with_defaults(&items, &ConversionRequest::keep_format())
        .await
        .unwrap();

    let png = outcome.results[0].output().unwrap();
    assert_eq!(png.format, ImageFormat::Png);
    assert!(png.data.starts_with(b"\x89PNG"));

    let gif = outcome.results[1].output().unwrap();
    assert_eq!(gif.format, ImageFormat::Gif);
    assert!(gif.data.starts_with(b"GIF8"));
}

#[tokio::test]
async fn test_unencodable_targets_use_fallback_formats() {
    let items = vec![SourceItem::from_file_name("a.png", fixtures::png_bytes(16, 16))];

    let heif = processor()
        .run_with_defaults(&items, &ConversionRequest::to_format(ImageFormat::Heif))
        .await
        .unwrap();
    let output = heif.first_success().unwrap();
    assert_eq!(output.format, ImageFormat::LOSSY_DEFAULT);
    assert!(output.data.starts_with(&[0xFF, 0xD8]));
}

#[tokio::test]
async fn test_svg_passthrough_is_minified_copy() {
    let items = vec![SourceItem::from_file_name("logo.svg", fixtures::svg_bytes())];

    let outcome = processor()
        .run_with_defaults(&items, &ConversionRequest::keep_format())
        .await
        .unwrap();

    let output = outcome.first_success().unwrap();
    assert_eq!(output.path, ConversionPath::Passthrough);
    let text = std::str::from_utf8(&output.data).unwrap();
    assert!(text.starts_with("<svg"));
    assert!(text.ends_with("</svg>"));
    assert!(text.contains("/><circle"));
    assert!(outcome.summary().saved_percent > 0);
}
