use serde::{Deserialize, Serialize};

/// Configuration applied to every recognition session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Keep listening after the first final result
    /// Default: true
    pub continuous: bool,

    /// Deliver provisional (interim) results while speech is ongoing
    /// Default: true
    pub interim_results: bool,

    /// BCP 47 language tag passed to the recognizer
    /// Default: "zh-CN"
    pub language: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            continuous: true,
            interim_results: true,
            language: "zh-CN".to_string(),
        }
    }
}
