use thiserror::Error;

/// Errors surfaced by the simulation engine.
///
/// Missing ratings or personnel are never errors: they fall back to neutral
/// defaults at the point of use. Only caller contract violations reach here.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid play call: {0}")]
    InvalidPlayCall(String),

    #[error("Invalid rule config: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Play loop exceeded {limit} plays without reaching a final state")]
    LoopOverrun { limit: u32 },
}

impl SimError {
    /// Stable code used by the JSON API (`"CODE: message"`).
    pub fn code(&self) -> &'static str {
        match self {
            SimError::InvalidPlayCall(_) => "E_PLAY_CALL",
            SimError::InvalidConfig(_) => "E_CONFIG",
            SimError::Serialization(_) => "E_JSON",
            SimError::LoopOverrun { .. } => "E_LOOP_OVERRUN",
        }
    }

    /// Whether a caller could reasonably retry with corrected input.
    pub fn is_caller_error(&self) -> bool {
        match self {
            SimError::InvalidPlayCall(_) => true,
            SimError::InvalidConfig(_) => true,
            SimError::Serialization(_) => true,
            SimError::LoopOverrun { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(SimError::InvalidPlayCall("x".into()).code(), "E_PLAY_CALL");
        assert_eq!(SimError::InvalidConfig("x".into()).code(), "E_CONFIG");
        assert_eq!(SimError::LoopOverrun { limit: 10 }.code(), "E_LOOP_OVERRUN");
    }

    #[test]
    fn test_display_includes_detail() {
        let err = SimError::InvalidPlayCall("hail_mary_lateral".into());
        assert_eq!(err.to_string(), "Invalid play call: hail_mary_lateral");
        assert!(err.is_caller_error());
        assert!(!SimError::LoopOverrun { limit: 1 }.is_caller_error());
    }
}
