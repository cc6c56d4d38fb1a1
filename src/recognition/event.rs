use super::capability::SessionId;
use serde::{Deserialize, Serialize};

/// One candidate transcription for a result slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionAlternative {
    /// Recognized text
    pub transcript: String,

    /// Confidence score (0.0 to 1.0), if the engine reports one
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// A single result slot as reported by the recognizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Candidate transcriptions, best first
    pub alternatives: Vec<RecognitionAlternative>,

    /// Whether the engine will never revise this slot again
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn final_text(text: impl Into<String>) -> Self {
        Self::single(text, true)
    }

    pub fn interim_text(text: impl Into<String>) -> Self {
        Self::single(text, false)
    }

    fn single(text: impl Into<String>, is_final: bool) -> Self {
        Self {
            alternatives: vec![RecognitionAlternative {
                transcript: text.into(),
                confidence: None,
            }],
            is_final,
        }
    }

    /// Text of the best candidate (empty when the slot has none)
    pub fn transcript(&self) -> &str {
        self.alternatives
            .first()
            .map(|alt| alt.transcript.as_str())
            .unwrap_or("")
    }
}

/// Incremental result delivery
///
/// `results` is a window of result slots; the slots from `result_index`
/// onward changed since the previous event, the ones before it were already
/// delivered. Browser-style hosts resend every slot from the first one,
/// streaming hosts may send only the slots that changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEvent {
    pub result_index: usize,
    pub results: Vec<RecognitionResult>,
}

/// Failure reported by the recognizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Machine-readable code (e.g. "network", "no-speech", "aborted")
    pub error: String,

    /// Optional human-readable detail, logged but not classified
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEvent {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Everything a recognizer stream can report
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Result(ResultEvent),
    Error(ErrorEvent),
    /// The stream terminated; no further events follow for this session
    End,
}

/// A recognition event tagged with the session that raised it
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub session: SessionId,
    pub event: RecognitionEvent,
}
