//! # Visibility Requirements
//!
//! Parsing of raw conditional display rules into structured [`Requirement`]
//! values, and the inheritance merge that hands a parent's requirements down
//! to every descendant. Parsing is best-effort per rule: one malformed rule
//! never blocks extraction of its siblings.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::FulfillmentError;
use crate::models::EnableWhenRule;

/// Comparison applied to a prior answer when deciding step visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementOperator {
    #[serde(rename = "exists")]
    Exists,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
}

impl RequirementOperator {
    /// Parse the comparator token used in rule expressions.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "exists" => Some(Self::Exists),
            "=" => Some(Self::Equal),
            "!=" => Some(Self::NotEqual),
            ">" => Some(Self::GreaterThan),
            ">=" => Some(Self::GreaterThanOrEqual),
            "<" => Some(Self::LessThan),
            "<=" => Some(Self::LessThanOrEqual),
            _ => None,
        }
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
        }
    }
}

impl fmt::Display for RequirementOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// A condition under which a dependent step should be shown: the prior
/// answer to `question` must satisfy `operator` against `expected`.
///
/// Immutable once constructed. A node's effective requirement set is its
/// ancestors' requirements followed by its own; see [`merge_requirements`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub question: String,
    pub operator: RequirementOperator,
    pub expected: Value,
}

impl Requirement {
    pub fn new(
        question: impl Into<String>,
        operator: RequirementOperator,
        expected: Value,
    ) -> Self {
        Self {
            question: question.into(),
            operator,
            expected,
        }
    }
}

/// Parse a node's raw rules into requirements, best-effort.
///
/// Every rule is parsed independently; malformed rules become
/// [`FulfillmentError::RuleParse`] records while the remaining rules still
/// yield requirements. Both lists preserve rule declaration order.
pub fn derive_requirements(
    rules: &[EnableWhenRule],
) -> (Vec<Requirement>, Vec<FulfillmentError>) {
    let mut requirements = Vec::new();
    let mut errors = Vec::new();

    for rule in rules {
        match requirement_from_rule(rule) {
            Ok(requirement) => requirements.push(requirement),
            Err(error) => errors.push(error),
        }
    }

    (requirements, errors)
}

/// Merge inherited requirements with a node's own.
///
/// Inherited entries come first in receipt order, own entries after in
/// declaration order. Duplicates are kept; evaluation downstream treats the
/// set as a conjunction, so repeats are harmless.
pub fn merge_requirements(inherited: &[Requirement], own: Vec<Requirement>) -> Vec<Requirement> {
    let mut merged = Vec::with_capacity(inherited.len() + own.len());
    merged.extend_from_slice(inherited);
    merged.extend(own);
    merged
}

fn requirement_from_rule(rule: &EnableWhenRule) -> Result<Requirement, FulfillmentError> {
    let question = match rule.question.as_deref() {
        Some(question) if !question.trim().is_empty() => question.trim().to_string(),
        _ => {
            return Err(FulfillmentError::rule_parse(
                describe_rule(rule),
                "missing source question identifier",
            ))
        }
    };

    let token = rule.operator.as_deref().ok_or_else(|| {
        FulfillmentError::rule_parse(describe_rule(rule), "missing comparison operator")
    })?;
    let operator = RequirementOperator::from_token(token).ok_or_else(|| {
        FulfillmentError::rule_parse(
            describe_rule(rule),
            format!("unknown operator `{}`", token.trim()),
        )
    })?;

    // Pure existence checks default to "an answer is present".
    let expected = match (&rule.answer, operator) {
        (Some(answer), _) => answer.clone(),
        (None, RequirementOperator::Exists) => Value::Bool(true),
        (None, _) => {
            return Err(FulfillmentError::rule_parse(
                describe_rule(rule),
                "missing expected answer value",
            ))
        }
    };

    Ok(Requirement::new(question, operator, expected))
}

/// Human-readable rendering of a raw rule for error messages.
fn describe_rule(rule: &EnableWhenRule) -> String {
    let question = rule.question.as_deref().unwrap_or("<no question>");
    let operator = rule.operator.as_deref().unwrap_or("<no operator>");
    match &rule.answer {
        Some(answer) => format!("{question} {operator} {answer}"),
        None => format!("{question} {operator}"),
    }
}
