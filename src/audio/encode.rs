use base64::Engine;

/// Encode audio bytes as a self-contained `data:` URI the browser can play directly
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
