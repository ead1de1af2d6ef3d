//! # Fulfillment Pipeline
//!
//! Conversion of a declarative questionnaire tree into an ordered, flat run
//! of presentation steps.
//!
//! ## Architecture
//!
//! The pipeline follows a **delegation-based architecture** where:
//! - **The engine owns the walk**: recursion, requirement inheritance,
//!   concurrent sibling fan-out and ordered fan-in
//! - **The leaf collaborator owns question expansion**: a
//!   [`QuestionFulfiller`] turns a single question into presentation steps
//! - **Errors accumulate, never abort**: a malformed rule or failing
//!   question is recorded and the rest of the tree still contributes
//!
//! ## Core Components
//!
//! - **FulfillmentEngine**: Recursive orchestrator with declaration-order
//!   merge semantics and a cap on in-flight question fulfillments
//! - **QuestionFulfiller**: Capability trait implemented by the embedding
//!   application for leaf question expansion
//! - **Requirement**: Structured visibility condition parsed from raw
//!   `enable_when` rules, inherited parent-to-child
//! - **Step / FulfillmentResult**: The flat output units and the two-phase
//!   steps-plus-errors result they travel in
//! - **FulfillmentError / PrepareError**: Accumulated walk errors and the
//!   terminal errors the controller collapses them into

pub mod engine;
pub mod errors;
pub mod node;
pub mod requirement;
pub mod step;
pub mod types;

// Re-export core types and components for easy access
pub use engine::{FulfillmentConfig, FulfillmentEngine};
pub use errors::{FulfillmentError, PrepareError, PrepareResult};
pub use node::{FulfillableNode, QuestionFulfiller};
pub use requirement::{derive_requirements, merge_requirements, Requirement, RequirementOperator};
pub use step::{Step, StepKind};
pub use types::FulfillmentResult;
