//! Writing the formatted quote to disk.
use quote_common::{Quote, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Create (or truncate) `path` and write `Dólar: <bid>` with no trailing newline.
/// Returns the written text.
pub fn write_quote(path: &Path, quote: &Quote) -> Result<String> {
    let text = quote.display_line();
    let mut file = File::create(path)?;
    file.write_all(text.as_bytes())?;
    Ok(text)
}
