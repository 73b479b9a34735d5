//! Dashboard front-end, compiled into the binary.

pub const INDEX_HTML: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/web/assets/index.html"
));

const STYLES_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/web/assets/styles.css"
));

const DASHBOARD_JS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/web/assets/dashboard.js"
));

pub struct StaticAsset {
    pub content_type: &'static str,
    pub body: &'static str,
}

/// Look up a file served under `/assets/`.
pub fn lookup(name: &str) -> Option<StaticAsset> {
    match name {
        "styles.css" => Some(StaticAsset {
            content_type: "text/css; charset=utf-8",
            body: STYLES_CSS,
        }),
        "dashboard.js" => Some(StaticAsset {
            content_type: "application/javascript; charset=utf-8",
            body: DASHBOARD_JS,
        }),
        _ => None,
    }
}
