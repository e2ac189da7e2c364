use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions that abort a topology scan.
///
/// Absence is deliberately not represented here: a missing directory or
/// identity file means "this slot is empty" and the scan continues past it.
#[derive(Debug, Error)]
pub enum ScanError {
    /// An identity file exists but could not be read (permissions, device
    /// I/O). The scan aborts rather than return a half-built topology.
    #[error("failed to read identity file {}", path.display())]
    IdentityRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A match pattern segment did not compile to a valid glob.
    #[error("invalid match pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Only one of the expected primary/secondary identities was supplied.
    #[error("primary and secondary enclosure identities must be supplied together")]
    UnpairedRoles,
}
