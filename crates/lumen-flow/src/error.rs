//! Error types for the flow engine

use thiserror::Error;

use crate::destination::ViewId;

pub type Result<T> = std::result::Result<T, FlowError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("No view registered for {0}")]
    UnregisteredView(ViewId),

    #[error("Selection {index} out of range for {view} ({options} options)")]
    SelectionOutOfRange {
        view: ViewId,
        index: usize,
        options: usize,
    },

    #[error("Unexpected input for {view}: {reason}")]
    UnexpectedInput { view: ViewId, reason: String },

    #[error("Missing or invalid argument '{arg}' for {view}")]
    MissingArgument { view: ViewId, arg: &'static str },

    #[error("Missing session context for {view}: {what}")]
    MissingContext { view: ViewId, what: &'static str },

    #[error("{requested} is not the current step (current: {current})")]
    NotCurrent { requested: ViewId, current: ViewId },

    #[error(transparent)]
    Core(#[from] lumen_core::Error),

    #[error("Input source closed")]
    InputClosed,

    #[error("Frontend error: {0}")]
    Frontend(String),
}

impl FlowError {
    /// Whether this error is a broken contract between the engine and a
    /// collaborator rather than bad data supplied by the user
    ///
    /// Contract violations are returned to the caller. Everything else only
    /// terminates the current flow.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            FlowError::UnregisteredView(_)
                | FlowError::SelectionOutOfRange { .. }
                | FlowError::UnexpectedInput { .. }
                | FlowError::MissingArgument { .. }
                | FlowError::MissingContext { .. }
                | FlowError::NotCurrent { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(FlowError::UnregisteredView(ViewId::Scan).is_contract_violation());
        assert!(FlowError::SelectionOutOfRange {
            view: ViewId::MainMenu,
            index: 9,
            options: 3
        }
        .is_contract_violation());
        assert!(!FlowError::Core(lumen_core::Error::InvalidDerivationPath("x".into()))
            .is_contract_violation());
        assert!(FlowError::NotCurrent {
            requested: ViewId::SignHashShowHash,
            current: ViewId::SignHashDireWarning
        }
        .is_contract_violation());
        assert!(!FlowError::InputClosed.is_contract_violation());
    }

    #[test]
    fn test_core_error_message_passes_through() {
        let err: FlowError = lumen_core::Error::InvalidDerivationPath("bad".into()).into();
        assert_eq!(
            err.to_string(),
            "Could not parse address index from derivation path: bad"
        );
    }
}
