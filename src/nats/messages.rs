use serde::{Deserialize, Serialize};

/// Session control message published to the STT service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionControlMessage {
    pub session_id: String,
    pub language: String,
    pub continuous: bool,
    pub interim_results: bool,
    pub timestamp: String,  // RFC3339 timestamp
}

/// Transcript message received from STT service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub session_id: String,
    pub text: String,
    pub partial: bool,
    pub timestamp: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Recognition failure reported by the STT service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionErrorMessage {
    pub session_id: String,
    pub error: String,
    #[serde(default)]
    pub message: Option<String>,
}
