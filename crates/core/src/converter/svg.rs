//! Lossless SVG normalization.

use bytes::Bytes;
use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::error::ConvertError;

static TAG_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s+<").expect("static regex is valid"));

/// Collapses whitespace between tags and trims the document.
pub fn minify_svg(data: &[u8]) -> Result<Bytes, ConvertError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| ConvertError::decode(format!("SVG is not valid UTF-8: {}", e)))?;
    let minified = TAG_GAP.replace_all(text, "><");
    Ok(Bytes::from(minified.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_collapses_tag_gaps() {
        let input = b"  <svg>\n  <rect width=\"1\"/>\n\t<g> text </g>\n</svg>\n";
        let out = minify_svg(input).unwrap();
        assert_eq!(&out[..], b"<svg><rect width=\"1\"/><g> text </g></svg>");
    }

    #[test]
    fn test_minify_rejects_invalid_utf8() {
        let err = minify_svg(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ConvertError::DecodeFailure { .. }));
    }
}
