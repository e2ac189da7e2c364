use std::fs;
use std::io;
use std::path::Path;

use tracing::trace;

use crate::error::ScanError;

/// Vendor prefix rewritten to `3` during WWID normalization.
const NAA_PREFIX: &str = "naa.";

/// Reads the first line of a small identity file, trailing whitespace
/// stripped.
///
/// Returns `Ok(None)` when the file does not exist: device directories
/// carry identity attributes only for populated slots, so absence is an
/// ordinary outcome. Any other read failure is fatal.
pub fn read_first_line(path: &Path) -> Result<Option<String>, ScanError> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let line = text.lines().next().unwrap_or("").trim_end().to_string();
            Ok(Some(line))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            trace!("identity file {} absent", path.display());
            Ok(None)
        }
        Err(source) => Err(ScanError::IdentityRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Rewrites a leading `naa.` prefix to the digit `3`, the form multipath
/// configuration expects. Identities without the prefix pass through
/// unchanged, which also makes the rewrite idempotent.
pub fn normalize_wwid(raw: &str) -> String {
    match raw.strip_prefix(NAA_PREFIX) {
        Some(rest) => format!("3{rest}"),
        None => raw.to_string(),
    }
}
