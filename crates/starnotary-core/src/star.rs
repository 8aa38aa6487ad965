//! Star payloads: the boundary request and the stored record.
//!
//! Submissions arrive as a [`StarRequest`] with a plain-text story. They are
//! checked once, at the boundary, and turned into a [`Star`] whose story is
//! hex-encoded. Nothing malformed reaches the chain.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Maximum story length in bytes (before hex encoding).
pub const MAX_STORY_BYTES: usize = 500;

/// A star as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRequest {
    /// Right ascension.
    pub ra: String,
    /// Declination.
    pub dec: String,
    /// Magnitude.
    #[serde(default)]
    pub mag: Option<String>,
    /// Constellation.
    #[serde(default)]
    pub cen: Option<String>,
    /// Plain-text story.
    pub story: String,
}

impl StarRequest {
    /// Parse a JSON star object.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::MalformedRequest(e.to_string()))
    }

    /// Validate the request and hex-encode the story.
    pub fn into_star(self) -> Result<Star> {
        if self.ra.trim().is_empty() {
            return Err(CoreError::MalformedRequest("star.ra is required".into()));
        }
        if self.dec.trim().is_empty() {
            return Err(CoreError::MalformedRequest("star.dec is required".into()));
        }
        if self.story.is_empty() {
            return Err(CoreError::MalformedRequest("star.story is required".into()));
        }
        if !self.story.is_ascii() {
            return Err(CoreError::MalformedRequest(
                "star.story must be ASCII text".into(),
            ));
        }
        if self.story.len() > MAX_STORY_BYTES {
            return Err(CoreError::MalformedRequest(format!(
                "star.story is {} bytes, limit is {}",
                self.story.len(),
                MAX_STORY_BYTES
            )));
        }

        Ok(Star {
            ra: self.ra,
            dec: self.dec,
            mag: self.mag,
            cen: self.cen,
            story: hex::encode(self.story.as_bytes()),
        })
    }
}

/// A validated star, as stored in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    pub ra: String,
    pub dec: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cen: Option<String>,
    /// Hex-encoded story.
    pub story: String,
}

impl Star {
    /// The story as plain text.
    pub fn decoded_story(&self) -> Result<String> {
        let bytes = hex::decode(&self.story)
            .map_err(|e| CoreError::MalformedRequest(format!("story is not hex: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| CoreError::MalformedRequest(format!("story is not UTF-8: {}", e)))
    }
}

/// A star together with the wallet address that registered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRecord {
    pub address: String,
    pub star: Star,
}
