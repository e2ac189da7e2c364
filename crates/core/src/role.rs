use std::collections::BTreeMap;

use crate::error::ScanError;
use crate::model::{Enclosure, Role};

/// The pair of normalized enclosure identities the caller expects to find.
/// The pair is all-or-nothing; a lone identity is rejected before any
/// scanning starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedRoles {
    pub primary: String,
    pub secondary: String,
}

impl ExpectedRoles {
    pub fn from_options(
        primary: Option<String>,
        secondary: Option<String>,
    ) -> Result<Option<Self>, ScanError> {
        match (primary, secondary) {
            (Some(primary), Some(secondary)) => Ok(Some(Self { primary, secondary })),
            (None, None) => Ok(None),
            _ => Err(ScanError::UnpairedRoles),
        }
    }
}

/// Classifies one normalized identity against the expected pair. The
/// comparison is exact and case sensitive; without expectations every
/// enclosure is unknown.
pub fn role_for(wwid: &str, expected: Option<&ExpectedRoles>) -> Role {
    match expected {
        Some(expected) if wwid == expected.primary => Role::Primary,
        Some(expected) if wwid == expected.secondary => Role::Secondary,
        _ => Role::Unknown,
    }
}

pub fn assign_roles(enclosures: &mut BTreeMap<String, Enclosure>, expected: Option<&ExpectedRoles>) {
    for (wwid, enclosure) in enclosures.iter_mut() {
        enclosure.role = role_for(wwid, expected);
    }
}
