//! Responsive image DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Descriptor unit of a srcset candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SrcsetDescriptor {
    /// Width descriptor (`640w`).
    #[serde(rename = "w")]
    Width,
    /// Pixel density descriptor (`2x`).
    #[serde(rename = "x")]
    Density,
}

/// One candidate of a responsive image `srcset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrcsetSource {
    /// Candidate URL.
    pub url: String,
    /// Descriptor unit.
    pub descriptor: SrcsetDescriptor,
    /// Descriptor value as given (`300`, `1.5`).
    pub value: Number,
}

impl SrcsetSource {
    /// Creates a width-described candidate.
    #[must_use]
    pub fn width(url: impl Into<String>, value: u32) -> Self {
        Self {
            url: url.into(),
            descriptor: SrcsetDescriptor::Width,
            value: value.into(),
        }
    }
}

/// Attachment image source: URL and intrinsic size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    /// Image URL.
    pub url: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}
