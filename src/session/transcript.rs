use crate::recognition::ResultEvent;

/// Merges final and interim result slots into one displayable transcript
///
/// `finalized` only grows while a session runs; `displayed` is `finalized`
/// plus whatever interim text the latest event carried. Interim text is never
/// carried from one event to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptAccumulator {
    finalized: String,
    displayed: String,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text the recognizer will no longer revise
    pub fn finalized(&self) -> &str {
        &self.finalized
    }

    /// Text to show: finalized text followed by the current interim fragment
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    /// Prepare for a new session, keeping whatever is on screen
    ///
    /// An interim fragment left over from a stopped session is promoted to
    /// finalized text so restarting never drops what the user already saw.
    pub fn seed_from_displayed(&mut self) {
        self.finalized.clone_from(&self.displayed);
    }

    /// Apply one incremental result event and return the new displayed text
    pub fn apply(&mut self, event: &ResultEvent) -> &str {
        let mut interim = String::new();

        for result in event.results.iter().skip(event.result_index) {
            if result.is_final {
                self.finalized.push_str(result.transcript());
            } else {
                interim.push_str(result.transcript());
            }
        }

        self.displayed = format!("{}{}", self.finalized, interim);
        &self.displayed
    }

    pub fn clear(&mut self) {
        self.finalized.clear();
        self.displayed.clear();
    }
}
