//! # Fulfillment Error Types
//!
//! Structured error handling for the fulfillment pipeline using thiserror.
//! Tree-walk errors ([`FulfillmentError`]) are accumulation records: they are
//! collected alongside steps and never abort the walk. Terminal errors
//! ([`PrepareError`]) are what the controller hands to callers once the walk
//! has finished and the steps-win policy has been applied.

use thiserror::Error;

/// An error record accumulated while fulfilling a questionnaire tree.
///
/// Records are carried next to the steps produced so far; a subtree can
/// contribute both. Cloneable so results can be fanned back out to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentError {
    /// A conditional display rule could not be parsed into a requirement.
    #[error("Cannot interpret conditional rule `{expression}`: {reason}")]
    RuleParse { expression: String, reason: String },

    /// A question could not be expanded into steps. The reason is the full
    /// message authored at the point of failure; the identifier is carried
    /// for logging and matching.
    #[error("{reason}")]
    Question { identifier: String, reason: String },
}

impl FulfillmentError {
    /// Create a rule parse error
    pub fn rule_parse(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RuleParse {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Create a question fulfillment error
    pub fn question(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Question {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }
}

/// Terminal error returned by `QuestionnaireController::prepare`.
#[derive(Error, Debug)]
pub enum PrepareError {
    /// Prepare was called before any questionnaire was set.
    #[error("No questionnaire is set, cannot prepare a task")]
    NoQuestionnaire,

    /// The walk produced neither steps nor error records.
    #[error("Unknown error creating a task from questionnaire")]
    UnknownFulfillment,

    /// Exactly one error record was accumulated; its message is preserved
    /// untouched.
    #[error(transparent)]
    Fulfillment(#[from] FulfillmentError),

    /// Several error records were accumulated; their messages are joined
    /// with newlines in accumulation order.
    #[error("{message}")]
    Aggregate { message: String },
}

impl PrepareError {
    /// Collapse accumulated error records into one terminal error.
    ///
    /// Zero records means the walk silently produced nothing; one record is
    /// passed through unchanged; several are joined into a newline-separated
    /// aggregate message.
    pub fn from_fulfillment_errors(mut errors: Vec<FulfillmentError>) -> Self {
        match errors.len() {
            0 => Self::UnknownFulfillment,
            1 => Self::Fulfillment(errors.remove(0)),
            _ => {
                let message = errors
                    .iter()
                    .map(|error| error.to_string())
                    .collect::<Vec<_>>()
                    .join("\n");
                Self::Aggregate { message }
            }
        }
    }
}

/// Result type alias for prepare operations
pub type PrepareResult<T> = Result<T, PrepareError>;
