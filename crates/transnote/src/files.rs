//! File glue: reading the transcript and jargon file, writing the notes.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{NotesError, Result};
use crate::text::JargonMap;

/// Jargon file used when the flag is given without a path.
pub const DEFAULT_JARGON_FILE: &str = "jargon.txt";

/// Suffix replacing the input's extension in the default output name.
pub const OUTPUT_SUFFIX: &str = "_output.txt";

/// Read the whole transcript.
pub fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| NotesError::io(path, e))
}

/// Write the final document, replacing any existing file.
pub fn write_output(path: &Path, document: &str) -> Result<()> {
    fs::write(path, document).map_err(|e| NotesError::io(path, e))?;
    info!("Wrote {} bytes to {}", document.len(), path.display());
    Ok(())
}

/// `talks/standup.vtt` → `talks/standup_output.txt`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}"))
}

/// Load a jargon file.
///
/// A missing file is not an error: substitution is skipped with a warning.
/// An unreadable or malformed file is.
pub fn load_jargon(path: &Path) -> Result<Option<JargonMap>> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let map = JargonMap::parse(&contents)?;
            info!("Loaded {} jargon term(s) from {}", map.len(), path.display());
            Ok(Some(map))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "Jargon file {} not found; skipping jargon substitution",
                path.display()
            );
            Ok(None)
        }
        Err(e) => Err(NotesError::io(path, e)),
    }
}
