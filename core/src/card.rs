use alloc::string::String;
use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of the image shown on a card's face.
///
/// The core never looks inside it; shells usually store a file path here.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardFace(String);

impl CardFace {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short human label, at most `width` characters.
    ///
    /// Path-like identifiers are reduced to their file stem first.
    pub fn label(&self, width: usize) -> String {
        let name = self.0.rsplit(['/', '\\']).next().unwrap_or(&self.0);
        let stem = match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        };
        stem.chars().take(width).collect()
    }
}

impl From<&str> for CardFace {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CardFace {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for CardFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the player currently sees at a position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    #[default]
    Hidden,
    /// Face-up but not part of a settled pair.
    Open,
    /// Face-up and locked as part of a matched pair.
    Matched,
}

impl CardState {
    pub const fn is_face_up(self) -> bool {
        matches!(self, Self::Open | Self::Matched)
    }
}
