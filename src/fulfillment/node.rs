//! # Fulfillable Nodes
//!
//! The node sum type the pipeline dispatches on, plus the capability trait
//! for the leaf collaborator that expands questions into steps.

use async_trait::async_trait;

use super::requirement::Requirement;
use super::types::FulfillmentResult;
use crate::models::{Question, QuestionnaireGroup};

/// A node the pipeline can fulfill: a group, handled recursively by the
/// engine itself, or a question, delegated to the leaf collaborator.
///
/// Nodes borrow from the questionnaire tree; the tree is read-only for the
/// whole fulfillment and safely shared between concurrent siblings.
#[derive(Debug, Clone, Copy)]
pub enum FulfillableNode<'a> {
    Group(&'a QuestionnaireGroup),
    Question(&'a Question),
}

impl FulfillableNode<'_> {
    /// Authored identifier of the underlying node, when present.
    pub fn link_id(&self) -> Option<&str> {
        match self {
            Self::Group(group) => group.link_id.as_deref(),
            Self::Question(question) => question.link_id.as_deref(),
        }
    }
}

/// Question fulfiller trait for delegation
///
/// The engine handles tree traversal, requirement inheritance, fan-out and
/// ordered fan-in; fulfillers only need to expand a single question into its
/// presentation steps. A question may expand to several steps, one per
/// sub-answer, and may report errors alongside or instead of steps.
///
/// Implementations must be safe to call concurrently for sibling questions.
#[async_trait]
pub trait QuestionFulfiller: Send + Sync {
    /// Fulfiller name for logging
    fn name(&self) -> &'static str {
        "question_fulfiller"
    }

    /// Expand one question into steps, honoring the merged requirement set
    /// computed by the question's ancestors.
    async fn fulfill(&self, question: &Question, requirements: &[Requirement])
        -> FulfillmentResult;
}
