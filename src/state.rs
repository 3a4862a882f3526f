use serde::{Deserialize, Serialize};

/// Per-session conversational memory. One instance per session; only the
/// orchestrator mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Previous user utterance, kept as the topic for follow-ups.
    pub last_input: Option<String>,
    /// Consecutive turns classified as frustration.
    pub frustration_streak: u32,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_topic(&self) -> Option<&str> {
        self.last_input.as_deref().filter(|s| !s.is_empty())
    }

    pub fn remember(&mut self, input: &str) {
        self.last_input = Some(input.to_string());
    }

    pub fn bump_frustration(&mut self) -> u32 {
        self.frustration_streak += 1;
        self.frustration_streak
    }

    pub fn clear_frustration(&mut self) {
        self.frustration_streak = 0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_everything() {
        let mut state = ConversationState::new();
        state.remember("octopus");
        state.bump_frustration();
        state.bump_frustration();
        assert_eq!(state.last_topic(), Some("octopus"));
        assert_eq!(state.frustration_streak, 2);

        state.reset();
        assert_eq!(state, ConversationState::default());
        assert_eq!(state.last_topic(), None);
    }

    #[test]
    fn test_empty_input_is_not_a_topic() {
        let mut state = ConversationState::new();
        state.remember("");
        assert_eq!(state.last_topic(), None);
    }
}
