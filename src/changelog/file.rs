use crate::error::Result;
use log::info;
use std::fs;
use std::path::Path;

/// Prepend a rendered section to a changelog file, creating it if needed.
///
/// The new text goes first, separated from the previous content by a blank
/// line; the file always ends with exactly one newline.
pub fn prepend_to_file(path: &Path, section: &str) -> Result<()> {
    let previous = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let combined = format!("{}\n\n{}", section.trim_end(), previous);
    fs::write(path, format!("{}\n", combined.trim_end()))?;
    info!("prepended changelog section to {}", path.display());
    Ok(())
}
