use serde::{Deserialize, Serialize};

use crate::DEFAULT_MAX_SIZE;

/// Caller policy for a [`JsonCodec`][crate::JsonCodec].
///
/// Can be embedded in a larger configuration file; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Largest decompressed payload, in bytes, that unmarshaling will accept.
    pub max_decompressed_size: usize,
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the maximum decompressed payload size.
    pub fn max_decompressed_size(mut self, max: usize) -> Self {
        self.max_decompressed_size = max;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: DEFAULT_MAX_SIZE,
        }
    }
}
