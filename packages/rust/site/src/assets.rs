//! Static files compiled into the binary and written at the site root.

/// `(file name, contents)` of every embedded asset.
pub const STATIC_FILES: &[(&str, &str)] = &[
    ("styles.css", include_str!("../static/styles.css")),
    ("search.js", include_str!("../static/search.js")),
    ("logo.svg", include_str!("../static/logo.svg")),
];
