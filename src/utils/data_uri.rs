use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Inline an SVG document as a `data:` URI
pub fn svg_data_uri(svg: &[u8]) -> String {
    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg))
}
