//! # Questionnaire Controller
//!
//! Facade between an embedding application and the fulfillment pipeline.
//! The controller owns at most one questionnaire at a time and prepares
//! runnable tasks from it on demand.
//!
//! ## Steps-Win Policy
//!
//! Fulfillment is best-effort: the walk returns whatever steps it could
//! produce next to whatever errors it hit. The controller is the single
//! place that collapses the two into one outcome, and it prefers usability
//! over completeness: any non-empty step run becomes a task and the error
//! detail is only logged. Callers see an error exclusively when no steps at
//! all could be produced.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::fulfillment::{FulfillmentEngine, PrepareError, PrepareResult, Step};
use crate::models::Questionnaire;

/// A runnable task assembled from a fulfilled questionnaire.
///
/// Steps appear in the declaration order of the source tree. By
/// construction a prepared task always carries at least one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedTask {
    /// The questionnaire's identifier, or a generated one when the document
    /// was authored without.
    pub identifier: String,
    pub steps: Vec<Step>,
}

/// Facade owning a questionnaire and preparing tasks from it.
pub struct QuestionnaireController {
    engine: FulfillmentEngine,
    questionnaire: Option<Questionnaire>,
}

impl QuestionnaireController {
    /// Create a controller with no questionnaire set
    pub fn new(engine: FulfillmentEngine) -> Self {
        Self {
            engine,
            questionnaire: None,
        }
    }

    /// Create a controller already holding a questionnaire
    pub fn with_questionnaire(engine: FulfillmentEngine, questionnaire: Questionnaire) -> Self {
        Self {
            engine,
            questionnaire: Some(questionnaire),
        }
    }

    /// Set or replace the questionnaire used by subsequent prepares.
    pub fn set_questionnaire(&mut self, questionnaire: Questionnaire) {
        self.questionnaire = Some(questionnaire);
    }

    pub fn questionnaire(&self) -> Option<&Questionnaire> {
        self.questionnaire.as_ref()
    }

    /// Prepare a runnable task from the current questionnaire.
    ///
    /// Fails immediately with [`PrepareError::NoQuestionnaire`] when no
    /// questionnaire is set, before any fulfillment starts. Otherwise the
    /// whole tree is fulfilled and the steps-win policy applies: non-empty
    /// steps become a task even when errors were recorded; with no steps the
    /// accumulated errors collapse into a single terminal error, or
    /// [`PrepareError::UnknownFulfillment`] when there are none of those
    /// either.
    pub async fn prepare(&self) -> PrepareResult<PreparedTask> {
        let Some(questionnaire) = &self.questionnaire else {
            return Err(PrepareError::NoQuestionnaire);
        };

        info!(
            identifier = questionnaire.identifier.as_deref().unwrap_or("<anonymous>"),
            status = ?questionnaire.status,
            date = ?questionnaire.date,
            "preparing task from questionnaire"
        );

        let result = self.engine.fulfill_group(&questionnaire.group, &[]).await;

        if !result.steps.is_empty() {
            if !result.errors.is_empty() {
                // Steps win: the task ships, the error detail is only logged.
                warn!(
                    steps = result.steps.len(),
                    errors = result.errors.len(),
                    "questionnaire fulfilled partially"
                );
            }

            let identifier = questionnaire
                .identifier
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            debug!(
                identifier = %identifier,
                steps = result.steps.len(),
                "task prepared"
            );
            return Ok(PreparedTask {
                identifier,
                steps: result.steps,
            });
        }

        Err(PrepareError::from_fulfillment_errors(result.errors))
    }
}
