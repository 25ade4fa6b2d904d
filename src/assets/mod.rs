//! Asset transformations: source discovery, stylesheet and script builds.
//!
//! Everything here is pure with respect to the project tree except reading
//! sources; writing results is left to [`resources::output`](crate::resources::output).
pub mod scripts;
pub mod sources;
pub mod styles;

/// Prepend `banner` to `body`, making sure the result ends with a newline.
#[must_use]
pub fn with_banner(banner: &str, body: &str) -> String {
    let mut out = String::with_capacity(banner.len() + body.len() + 1);
    out.push_str(banner);
    out.push_str(body);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
