//! JavaScript minification.
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, CompressOptionsUnused, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::error::AssetError;

/// Minify a script.
///
/// Sources are parsed as classic scripts, not modules.  Top-level
/// declarations keep their names and are never dropped as unused, so they
/// stay reachable from inline handlers and other scripts.
///
/// # Errors
///
/// Returns [`AssetError::Minify`] if `source` is not valid UTF-8 or not
/// valid JavaScript, or if the minifier gives up on it.
pub fn minify_script(path: &Path, source: &[u8]) -> Result<String, AssetError> {
    let error = |message: String| AssetError::Minify {
        path: path.to_path_buf(),
        message,
    };
    let text = std::str::from_utf8(source).map_err(|e| error(e.to_string()))?;
    catch_unwind(AssertUnwindSafe(|| minify_text(text)))
        .map_err(|panic| error(panic_message(panic.as_ref())))?
        .map_err(error)
}

fn minify_text(text: &str) -> Result<String, String> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, text, SourceType::cjs()).parse();
    if let Some(first) = parsed.errors.first() {
        return Err(first.to_string());
    }
    if parsed.panicked {
        return Err("parser could not recover".to_string());
    }

    let mut program = parsed.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions {
            top_level: false,
            ..MangleOptions::default()
        }),
        compress: Some(CompressOptions {
            unused: CompressOptionsUnused::Keep,
            ..CompressOptions::smallest()
        }),
    };
    let minified = Minifier::new(options).minify(&allocator, &mut program);
    Ok(Codegen::new()
        .with_options(CodegenOptions::minify())
        .with_scoping(minified.scoping)
        .with_private_member_mappings(minified.class_private_mappings)
        .build(&program)
        .code)
}

/// Text of a caught panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("minifier crashed: {detail}")
}

/// `true` for files this build produces (`*.min.js`).
#[must_use]
pub fn is_generated(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".min.js"))
}
