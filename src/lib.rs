#![allow(clippy::doc_markdown)] // Allow technical terms like FHIR, enableWhen in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Questionnaire Core
//!
//! Async Rust core for fulfilling declarative questionnaires into ordered,
//! runnable task steps.
//!
//! ## Overview
//!
//! Questionnaire documents arrive as a tree: groups nest subgroups, and the
//! leaves are questions. Presentation engines want the opposite shape, a
//! flat, ordered run of steps. This crate owns the conversion: it walks the
//! tree, fulfills sibling nodes concurrently, and reassembles the output in
//! strict declaration order, so the document author's ordering survives any
//! completion timing.
//!
//! ## Architecture
//!
//! The core implements a **delegation-based pipeline** where the
//! [`fulfillment::FulfillmentEngine`] owns recursion, requirement
//! inheritance and join semantics, while the embedding application supplies
//! a [`fulfillment::QuestionFulfiller`] that expands individual questions
//! into presentation steps. The [`controller::QuestionnaireController`]
//! facade collapses the engine's best-effort output into a single outcome
//! under a steps-win policy.
//!
//! ## Key Features
//!
//! - **Declaration-order results**: concurrent sibling fulfillment never
//!   reorders steps or errors
//! - **Best-effort error aggregation**: malformed rules and failing
//!   questions are recorded, not fatal; partial questionnaires still ship
//! - **Requirement inheritance**: visibility conditions flow parent to
//!   child, inherited entries before own
//! - **Bounded leaf concurrency**: in-flight question expansions are capped
//!   without throttling tree recursion
//!
//! ## Module Organization
//!
//! - [`models`] - Questionnaire documents as authored
//! - [`fulfillment`] - Recursive fulfillment pipeline and its result types
//! - [`controller`] - Facade preparing runnable tasks from questionnaires
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use questionnaire_core::{
//!     FulfillmentEngine, FulfillmentResult, Question, QuestionFulfiller,
//!     Questionnaire, QuestionnaireController, QuestionnaireGroup, Requirement, Step,
//! };
//!
//! struct EchoFulfiller;
//!
//! #[async_trait::async_trait]
//! impl QuestionFulfiller for EchoFulfiller {
//!     async fn fulfill(
//!         &self,
//!         question: &Question,
//!         _requirements: &[Requirement],
//!     ) -> FulfillmentResult {
//!         FulfillmentResult::from_steps(vec![Step::question(
//!             question.link_id.clone().unwrap_or_default(),
//!             serde_json::json!({ "text": question.text }),
//!         )])
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let questionnaire = Questionnaire::new(
//!     "intake",
//!     QuestionnaireGroup {
//!         title: Some("Intake".to_string()),
//!         questions: vec![Question {
//!             link_id: Some("age".to_string()),
//!             text: Some("How old are you?".to_string()),
//!             ..Default::default()
//!         }],
//!         ..Default::default()
//!     },
//! );
//!
//! let engine = FulfillmentEngine::new(Arc::new(EchoFulfiller));
//! let controller = QuestionnaireController::with_questionnaire(engine, questionnaire);
//!
//! let task = controller.prepare().await.expect("a runnable task");
//! assert_eq!(task.identifier, "intake");
//! assert_eq!(task.steps.len(), 2); // intro + one question
//! # });
//! ```

pub mod controller;
pub mod fulfillment;
pub mod logging;
pub mod models;

pub use controller::{PreparedTask, QuestionnaireController};
pub use fulfillment::{
    derive_requirements, merge_requirements, FulfillableNode, FulfillmentConfig,
    FulfillmentEngine, FulfillmentError, FulfillmentResult, PrepareError, PrepareResult,
    QuestionFulfiller, Requirement, RequirementOperator, Step, StepKind,
};
pub use models::{
    AnswerFormat, Concept, EnableWhenRule, Question, Questionnaire, QuestionnaireGroup,
    QuestionnaireStatus,
};
