//! Page chrome shared by every route.
//!
//! The shell is plain server-rendered HTML: fixed metadata, a single header
//! bar carrying the product name, and a `<main>` slot holding the page
//! content verbatim.

use std::borrow::Cow;

/// Product name shown in the header and the document title.
pub const PRODUCT_NAME: &str = "OFITEC";

/// Document description metadata.
pub const PRODUCT_DESCRIPTION: &str = "Presupuestos & Mediciones";

/// Locally served HTMX bundle (no CDN).
pub const HTMX_SCRIPT: &str = "/static/vendor/htmx-2.0.8.min.js";

// 204 leaves the page untouched; error dialogs (4xx/5xx) are swapped in
// like successful ones.
const HTMX_CONFIG: &str = r#"{"responseHandling":[{"code":"204","swap":false},{"code":"[23]..","swap":true},{"code":"[45]..","swap":true,"error":true}]}"#;

/// Render a complete HTML document wrapping `content`.
///
/// `content` is trusted markup produced by this crate and is embedded
/// without escaping, after the header.
pub fn render_page(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="{description}">
    <meta name="htmx-config" content='{HTMX_CONFIG}'>
    <title>{title}</title>
    <script src="{HTMX_SCRIPT}"></script>
</head>
<body style="font-family:sans-serif;margin:0">
    <header style="padding:10px 20px;background:#111;color:#fff">{title}</header>
    <main style="padding:20px">
        {content}
    </main>
</body>
</html>"#,
        title = escape_html(PRODUCT_NAME),
        description = escape_html(PRODUCT_DESCRIPTION),
    )
}

/// Escape text for inclusion in HTML element content or quoted attributes.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}
