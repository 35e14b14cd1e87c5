pub mod ascii;
pub mod session;

use anyhow::{Context, Result};
use glyph_shared::RunSettings;
use std::path::Path;

pub use ascii::AsciiSurface;
pub use session::{Session, SessionOptions};

/// Load settings from a JSON file. Missing fields keep their defaults.
pub fn load_settings(path: &Path) -> Result<RunSettings> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    RunSettings::from_json(&json)
        .with_context(|| format!("Invalid settings in {}", path.display()))
}
