use crate::extract::ExtractError;
use serde::{Deserialize, Serialize};

/// Flat text record of one crawled page, stored as the `.json` sidecar
///
/// Every text field has already been passed through [`crate::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub title: String,
    pub body: String,
    pub h1: String,
    pub h2: String,
    pub h3: String,
    pub h4: String,
    pub h5: String,
    pub h6: String,
}

impl Document {
    /// Heading text for a level in `1..=6`
    pub fn heading(&self, level: usize) -> Option<&str> {
        match level {
            1 => Some(&self.h1),
            2 => Some(&self.h2),
            3 => Some(&self.h3),
            4 => Some(&self.h4),
            5 => Some(&self.h5),
            6 => Some(&self.h6),
            _ => None,
        }
    }

    /// Serializes the record as pretty-printed UTF-8 JSON
    pub fn to_json(&self) -> Result<Vec<u8>, ExtractError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Parses a sidecar written by [`Document::to_json`]
    pub fn from_json(bytes: &[u8]) -> Result<Self, ExtractError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
