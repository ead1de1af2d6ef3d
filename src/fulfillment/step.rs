//! # Task Steps
//!
//! The flat presentation units a fulfilled questionnaire is made of. A step
//! is either an instruction shown between questions or a question payload
//! produced by the leaf fulfiller. Step order in a prepared task matches the
//! declaration order of the questionnaire tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single presentation unit in a prepared task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Identifier taken from the originating node, or freshly generated when
    /// the node was authored without one.
    pub identifier: String,
    #[serde(flatten)]
    pub kind: StepKind,
}

/// What a step presents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// Introductory text for a group of questions.
    Instruction {
        title: Option<String>,
        text: Option<String>,
    },
    /// A question surface. The payload is authored by the leaf fulfiller and
    /// opaque to the pipeline.
    Question { payload: Value },
}

impl Step {
    /// Create an instruction step
    pub fn instruction(
        identifier: impl Into<String>,
        title: Option<String>,
        text: Option<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            kind: StepKind::Instruction { title, text },
        }
    }

    /// Create a question step carrying a fulfiller-authored payload
    pub fn question(identifier: impl Into<String>, payload: Value) -> Self {
        Self {
            identifier: identifier.into(),
            kind: StepKind::Question { payload },
        }
    }

    pub fn is_instruction(&self) -> bool {
        matches!(self.kind, StepKind::Instruction { .. })
    }

    pub fn is_question(&self) -> bool {
        matches!(self.kind, StepKind::Question { .. })
    }
}
