//! File identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a file held by the relay.
///
/// UUID v4, assigned by the server on creation and rendered in its
/// hyphenated text form in URLs and JSON.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(uuid::Uuid);

impl FileId {
    /// Create a new random FileId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for FileId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_id_unique() {
        assert_ne!(FileId::new(), FileId::new());
    }

    #[test]
    fn file_id_parse_display_roundtrip() {
        let id = FileId::new();
        let parsed: FileId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn file_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<FileId>().is_err());
        assert!("".parse::<FileId>().is_err());
    }

    #[test]
    fn file_id_json_is_plain_string() {
        let id: FileId = "6f1c0a57-2b43-4f0e-9d3c-0d8a1c5e7b21".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"6f1c0a57-2b43-4f0e-9d3c-0d8a1c5e7b21\"");
    }
}
