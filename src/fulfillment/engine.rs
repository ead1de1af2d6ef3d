//! # Fulfillment Engine
//!
//! Recursive orchestrator that flattens a questionnaire group tree into an
//! ordered run of presentation steps.
//!
//! ## Architecture
//!
//! The engine walks the tree top-down. Every group contributes an optional
//! introductory instruction step, derives its own visibility requirements,
//! then fans out over its children: subgroups recurse into the engine
//! itself, questions are delegated to the injected [`QuestionFulfiller`].
//! Siblings run concurrently and are joined; their results are merged at the
//! single join-completion point, strictly in declaration order, so
//! completion timing never changes output order.
//!
//! Fulfillment is single-shot and best-effort. A malformed rule or a failing
//! question becomes an error record carried alongside whatever steps the
//! rest of the subtree produced; nothing short of the caller dropping the
//! future aborts the walk.
//!
//! ## Concurrency Model
//!
//! Sibling fan-out is not throttled; tree breadth is the natural bound. What
//! is capped is the number of in-flight question fulfillments, via a permit
//! pool sized by [`FulfillmentConfig::max_concurrent_questions`], so
//! adversarially wide questionnaires cannot exhaust resources at the
//! leaves. Group recursion never holds a permit, which keeps the cap
//! deadlock-free at any nesting depth. There is no cancellation: once
//! fan-out begins every child runs to completion, and a failing child never
//! cancels its siblings.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use tokio::sync::Semaphore;
use tracing::{debug, debug_span, error, instrument, warn, Instrument};
use uuid::Uuid;

use super::errors::FulfillmentError;
use super::node::{FulfillableNode, QuestionFulfiller};
use super::requirement::{derive_requirements, merge_requirements, Requirement};
use super::step::Step;
use super::types::FulfillmentResult;
use crate::models::{Question, QuestionnaireGroup};

/// Configuration for questionnaire fulfillment
#[derive(Debug, Clone)]
pub struct FulfillmentConfig {
    /// Maximum number of in-flight question fulfillments
    pub max_concurrent_questions: usize,
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            max_concurrent_questions: 16,
        }
    }
}

impl FulfillmentConfig {
    /// Create configuration optimized for testing: questions are fulfilled
    /// one at a time, which keeps interleavings deterministic.
    pub fn for_testing() -> Self {
        Self {
            max_concurrent_questions: 1,
        }
    }
}

/// Recursive orchestrator flattening questionnaire trees into steps.
///
/// The engine is safe to share across tasks and to call concurrently; the
/// questionnaire tree it walks is only ever read.
pub struct FulfillmentEngine {
    question_fulfiller: Arc<dyn QuestionFulfiller>,
    question_permits: Arc<Semaphore>,
    config: FulfillmentConfig,
}

impl FulfillmentEngine {
    /// Create a new engine with default configuration
    pub fn new(question_fulfiller: Arc<dyn QuestionFulfiller>) -> Self {
        Self::with_config(question_fulfiller, FulfillmentConfig::default())
    }

    /// Create a new engine with custom configuration
    pub fn with_config(
        question_fulfiller: Arc<dyn QuestionFulfiller>,
        config: FulfillmentConfig,
    ) -> Self {
        // A zero cap would park the walk forever; clamp to one.
        let question_permits = Arc::new(Semaphore::new(config.max_concurrent_questions.max(1)));

        debug!(
            fulfiller = question_fulfiller.name(),
            max_concurrent_questions = config.max_concurrent_questions,
            "fulfillment engine ready"
        );

        Self {
            question_fulfiller,
            question_permits,
            config,
        }
    }

    pub fn config(&self) -> &FulfillmentConfig {
        &self.config
    }

    /// Fulfill either node kind under the given inherited requirements.
    ///
    /// Groups recurse through the engine; questions go to the leaf
    /// collaborator. Safe to call concurrently for sibling nodes.
    pub async fn fulfill_node(
        &self,
        node: FulfillableNode<'_>,
        inherited: &[Requirement],
    ) -> FulfillmentResult {
        match node {
            FulfillableNode::Group(group) => self.fulfill_group(group, inherited).await,
            FulfillableNode::Question(question) => {
                self.fulfill_question(question, inherited).await
            }
        }
    }

    /// Recursively fulfill a group and everything beneath it.
    ///
    /// The returned result carries the group's intro step (when the group
    /// resolves any display text), then each child's steps in declaration
    /// order; errors hold the group's own rule-parse failures first, then
    /// each child's errors in the same declaration order.
    pub fn fulfill_group<'a>(
        &'a self,
        group: &'a QuestionnaireGroup,
        inherited: &'a [Requirement],
    ) -> BoxFuture<'a, FulfillmentResult> {
        let span = debug_span!(
            "fulfill_group",
            link_id = group.link_id.as_deref().unwrap_or("<anonymous>"),
            subgroups = group.groups.len(),
            questions = group.questions.len()
        );

        async move {
            let mut result = FulfillmentResult::new();

            if let Some(step) = self.instruction_step(group) {
                result.steps.push(step);
            }

            let (own_requirements, rule_errors) = derive_requirements(&group.enable_when);
            if !rule_errors.is_empty() {
                warn!(
                    count = rule_errors.len(),
                    "conditional rules could not be interpreted"
                );
            }
            result.errors.extend(rule_errors);

            let merged = merge_requirements(inherited, own_requirements);

            // TODO: expand repeating groups (`repeats`) into duplicated step runs.
            let child_results = if !group.groups.is_empty() {
                join_all(
                    group
                        .groups
                        .iter()
                        .map(|subgroup| self.fulfill_group(subgroup, &merged)),
                )
                .await
            } else if !group.questions.is_empty() {
                join_all(
                    group
                        .questions
                        .iter()
                        .map(|question| self.fulfill_question(question, &merged)),
                )
                .await
            } else {
                Vec::new()
            };

            // join_all yields results in input order, so declaration order
            // survives whatever completion order the runtime produced.
            for child in child_results {
                result.absorb(child);
            }

            debug!(
                steps = result.steps.len(),
                errors = result.errors.len(),
                "group fulfilled"
            );
            result
        }
        .instrument(span)
        .boxed()
    }

    /// Fulfill a single question through the leaf collaborator.
    ///
    /// A permit from the engine's pool is held only for the duration of the
    /// collaborator call, never across group recursion.
    #[instrument(
        level = "debug",
        skip(self, question, requirements),
        fields(link_id = question.link_id.as_deref().unwrap_or("<anonymous>"))
    )]
    async fn fulfill_question(
        &self,
        question: &Question,
        requirements: &[Requirement],
    ) -> FulfillmentResult {
        let permit = match self.question_permits.acquire().await {
            Ok(permit) => permit,
            Err(acquire_error) => {
                // The engine owns the pool and never closes it.
                error!(%acquire_error, "question permit pool closed");
                return FulfillmentResult::from_error(FulfillmentError::question(
                    question.link_id.as_deref().unwrap_or("<anonymous>"),
                    "question fulfillment pool is closed",
                ));
            }
        };

        let result = self
            .question_fulfiller
            .fulfill(question, requirements)
            .await;
        drop(permit);
        result
    }

    /// Build the group's introductory step, if the group resolves any
    /// display text at all.
    fn instruction_step(&self, group: &QuestionnaireGroup) -> Option<Step> {
        let (title, text) = group.best_title_and_text();
        let has_title = title.as_deref().map_or(false, |value| !value.is_empty());
        let has_text = text.as_deref().map_or(false, |value| !value.is_empty());
        if !has_title && !has_text {
            return None;
        }

        let identifier = group
            .link_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Some(Step::instruction(identifier, title, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticFulfiller;

    #[async_trait]
    impl QuestionFulfiller for StaticFulfiller {
        async fn fulfill(
            &self,
            question: &Question,
            _requirements: &[Requirement],
        ) -> FulfillmentResult {
            FulfillmentResult::from_steps(vec![Step::question(
                question.link_id.clone().unwrap_or_else(|| "q".to_string()),
                json!({}),
            )])
        }
    }

    fn engine() -> FulfillmentEngine {
        FulfillmentEngine::with_config(Arc::new(StaticFulfiller), FulfillmentConfig::for_testing())
    }

    #[tokio::test]
    async fn test_childless_group_with_text_yields_single_intro() {
        let group = QuestionnaireGroup {
            link_id: Some("note".to_string()),
            text: Some("Thank you for participating".to_string()),
            ..Default::default()
        };

        let result = engine().fulfill_group(&group, &[]).await;

        assert!(result.is_success());
        assert_eq!(result.steps.len(), 1);
        assert!(result.steps[0].is_instruction());
        assert_eq!(result.steps[0].identifier, "note");
    }

    #[tokio::test]
    async fn test_childless_group_without_text_yields_empty_result() {
        let group = QuestionnaireGroup::default();

        let result = engine().fulfill_group(&group, &[]).await;

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_empty_title_string_produces_no_intro() {
        let group = QuestionnaireGroup {
            title: Some(String::new()),
            ..Default::default()
        };

        let result = engine().fulfill_group(&group, &[]).await;

        assert!(result.steps.is_empty());
    }

    #[tokio::test]
    async fn test_intro_identifier_is_generated_when_unauthored() {
        let group = QuestionnaireGroup {
            title: Some("Untitled section".to_string()),
            ..Default::default()
        };

        let eng = engine();
        let first = eng.fulfill_group(&group, &[]).await;
        let second = eng.fulfill_group(&group, &[]).await;

        assert!(!first.steps[0].identifier.is_empty());
        // Identifier-less nodes get a fresh identifier per fulfillment.
        assert_ne!(first.steps[0].identifier, second.steps[0].identifier);
    }

    #[tokio::test]
    async fn test_fulfill_node_dispatches_questions_to_collaborator() {
        let question = Question {
            link_id: Some("age".to_string()),
            ..Default::default()
        };

        let result = engine()
            .fulfill_node(FulfillableNode::Question(&question), &[])
            .await;

        assert_eq!(result.steps.len(), 1);
        assert!(result.steps[0].is_question());
        assert_eq!(result.steps[0].identifier, "age");
    }

    #[tokio::test]
    async fn test_subgroups_win_when_both_child_kinds_present() {
        let group = QuestionnaireGroup {
            groups: vec![QuestionnaireGroup {
                questions: vec![Question {
                    link_id: Some("nested".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            questions: vec![Question {
                link_id: Some("ignored".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let result = engine().fulfill_group(&group, &[]).await;

        let identifiers: Vec<&str> = result.steps.iter().map(|s| s.identifier.as_str()).collect();
        assert_eq!(identifiers, vec!["nested"]);
    }

    #[tokio::test]
    async fn test_zero_concurrency_config_still_makes_progress() {
        let engine = FulfillmentEngine::with_config(
            Arc::new(StaticFulfiller),
            FulfillmentConfig {
                max_concurrent_questions: 0,
            },
        );
        let group = QuestionnaireGroup {
            questions: vec![Question {
                link_id: Some("q1".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let result = engine.fulfill_group(&group, &[]).await;

        assert_eq!(result.steps.len(), 1);
        // The authored value survives on the config; only the pool clamps.
        assert_eq!(engine.config().max_concurrent_questions, 0);
    }
}
