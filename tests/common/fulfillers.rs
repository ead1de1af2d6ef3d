//! Scriptable stub question fulfillers.

#![allow(dead_code)] // Not every test binary uses every helper.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use questionnaire_core::fulfillment::{FulfillmentResult, QuestionFulfiller, Requirement};
use questionnaire_core::models::Question;
use questionnaire_core::{FulfillmentError, Step};

/// One recorded fulfill call.
#[derive(Debug, Clone)]
pub struct ObservedCall {
    pub link_id: String,
    pub requirements: Vec<Requirement>,
}

/// Stub fulfiller producing one step per question, with scriptable
/// per-question delays and failures. Every call is recorded together with
/// the requirement set it observed, and concurrent entries are counted so
/// tests can watch the engine's leaf bound.
pub struct StubFulfiller {
    delays: HashMap<String, Duration>,
    failures: HashMap<String, String>,
    observed: Mutex<Vec<ObservedCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubFulfiller {
    pub fn new() -> Self {
        Self {
            delays: HashMap::new(),
            failures: HashMap::new(),
            observed: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Delay fulfillment of the given question.
    pub fn with_delay(mut self, link_id: &str, delay: Duration) -> Self {
        self.delays.insert(link_id.to_string(), delay);
        self
    }

    /// Make the given question fail with the given message instead of
    /// producing a step.
    pub fn with_failure(mut self, link_id: &str, reason: &str) -> Self {
        self.failures.insert(link_id.to_string(), reason.to_string());
        self
    }

    /// Requirements observed when the given question was fulfilled.
    pub async fn observed_requirements(&self, link_id: &str) -> Option<Vec<Requirement>> {
        self.observed
            .lock()
            .await
            .iter()
            .find(|call| call.link_id == link_id)
            .map(|call| call.requirements.clone())
    }

    pub async fn observed_calls(&self) -> Vec<ObservedCall> {
        self.observed.lock().await.clone()
    }

    /// Highest number of fulfill calls seen running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for StubFulfiller {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionFulfiller for StubFulfiller {
    fn name(&self) -> &'static str {
        "stub_fulfiller"
    }

    async fn fulfill(
        &self,
        question: &Question,
        requirements: &[Requirement],
    ) -> FulfillmentResult {
        let link_id = question.link_id.clone().unwrap_or_default();

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&link_id) {
            tokio::time::sleep(*delay).await;
        }

        self.observed.lock().await.push(ObservedCall {
            link_id: link_id.clone(),
            requirements: requirements.to_vec(),
        });

        let result = match self.failures.get(&link_id) {
            Some(reason) => {
                FulfillmentResult::from_error(FulfillmentError::question(&link_id, reason))
            }
            None => FulfillmentResult::from_steps(vec![Step::question(
                link_id.clone(),
                json!({ "question": link_id }),
            )]),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
