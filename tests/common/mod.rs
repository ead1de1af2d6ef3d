pub mod builders;
pub mod fulfillers;

pub use builders::*;
pub use fulfillers::*;

/// Install the crate's tracing subscriber once per test binary.
#[allow(dead_code)]
pub fn init_test_logging() {
    questionnaire_core::logging::init_structured_logging();
}
