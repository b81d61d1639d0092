//! Shell quoting for the rendered scss-lint command line.

use std::borrow::Cow;
use std::path::Path;

/// Wraps a literal value in single quotes, whatever it contains.
///
/// `it's` becomes `'it'\''s'`.
pub fn quote_arg(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

pub fn quote_path_arg(path: &Path) -> String {
    quote_arg(&path.to_string_lossy())
}

/// Escapes an executable name; plain names such as `bundle` stay bare.
pub fn quote_command(token: &str) -> String {
    shell_escape::unix::escape(Cow::Borrowed(token)).into_owned()
}
