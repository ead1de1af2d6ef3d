//! # Fulfillment Results
//!
//! The two-phase output of the tree walk. Steps and errors travel together:
//! a subtree that half-works contributes both, and neither suppresses the
//! other until the controller applies its steps-win policy at the very end.

use super::errors::FulfillmentError;
use super::step::Step;

/// Output of fulfilling one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FulfillmentResult {
    /// Steps in declaration order of the originating nodes.
    pub steps: Vec<Step>,
    /// Error records in accumulation order: a node's own rule errors first,
    /// then each child's errors in child declaration order.
    pub errors: Vec<FulfillmentError>,
}

impl FulfillmentResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result carrying only steps
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self {
            steps,
            errors: Vec::new(),
        }
    }

    /// Result carrying a single error record
    pub fn from_error(error: FulfillmentError) -> Self {
        Self {
            steps: Vec::new(),
            errors: vec![error],
        }
    }

    /// True when no errors were recorded anywhere in the subtree.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when the subtree contributed nothing at all.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.errors.is_empty()
    }

    /// Append a child's output, preserving both orderings.
    pub fn absorb(&mut self, child: FulfillmentResult) {
        self.steps.extend(child.steps);
        self.errors.extend(child.errors);
    }
}
