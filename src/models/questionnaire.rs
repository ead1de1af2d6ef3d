//! # Questionnaire Model
//!
//! Declarative questionnaire documents as authored: a tree of groups with
//! questions at the leaves, plus the metadata the fulfillment pipeline needs
//! to turn the tree into presentable steps.
//!
//! ## Tree Shape
//!
//! A [`Questionnaire`] owns exactly one root [`QuestionnaireGroup`]. Every
//! group carries either subgroups or questions; authored documents treat the
//! two as mutually exclusive, and when both are present the subgroups win.
//! Groups and questions both carry conditional display rules
//! ([`EnableWhenRule`]) and coded concepts ([`Concept`]).
//!
//! ## Display Text
//!
//! Groups resolve their presentation text through
//! [`QuestionnaireGroup::best_title_and_text`], which backfills at most one
//! missing field per call from the group's concept labels. Display labels are
//! preferred over raw codes, and whitespace runs are collapsed so authored
//! line breaks do not leak into rendered steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a questionnaire document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionnaireStatus {
    #[default]
    Draft,
    Published,
    Retired,
}

/// A coded concept attached to a group or question.
///
/// Concepts pair a machine-readable `code` with an optional human-readable
/// `display` label. They double as the fallback source for group titles when
/// no explicit title was authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub code: Option<String>,
    pub display: Option<String>,
}

impl Concept {
    pub fn coded(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            display: None,
        }
    }

    pub fn displayed(display: impl Into<String>) -> Self {
        Self {
            code: None,
            display: Some(display.into()),
        }
    }
}

/// A raw conditional display rule as authored in the questionnaire.
///
/// Rules are uninterpreted at this layer. The fulfillment pipeline parses
/// them into structured requirements and reports the ones it cannot
/// understand; see `fulfillment::derive_requirements`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnableWhenRule {
    /// Identifier of the previously answered question the rule refers to.
    pub question: Option<String>,
    /// Comparator token: `exists`, `=`, `!=`, `>`, `>=`, `<` or `<=`.
    pub operator: Option<String>,
    /// Expected answer value, absent for pure existence checks.
    pub answer: Option<serde_json::Value>,
}

/// Expected answer shape of a question.
///
/// The pipeline never interprets this; it travels with the question so the
/// leaf fulfiller can pick an appropriate input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerFormat {
    Boolean,
    Decimal,
    Integer,
    Date,
    DateTime,
    Instant,
    Time,
    String,
    Text,
    Url,
    Choice,
    OpenChoice,
    Attachment,
    Reference,
    Quantity,
}

/// A single question leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier within the document, when authored.
    pub link_id: Option<String>,
    /// The question text shown to the respondent.
    pub text: Option<String>,
    #[serde(default)]
    pub concepts: Vec<Concept>,
    pub answer_format: Option<AnswerFormat>,
    #[serde(default)]
    pub enable_when: Vec<EnableWhenRule>,
}

/// A group node: nested subgroups or a run of questions, plus display text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireGroup {
    /// Stable identifier within the document, when authored.
    pub link_id: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub groups: Vec<QuestionnaireGroup>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub enable_when: Vec<EnableWhenRule>,
    /// Whether the group may be answered more than once.
    pub repeats: Option<bool>,
}

impl QuestionnaireGroup {
    /// Resolve the group's presentation title and text.
    ///
    /// When either field is missing, at most one of them is backfilled per
    /// call from the group's concepts: the title if it is absent, otherwise
    /// the text. The concept label prefers the first non-empty display over
    /// any code; a code is used only when no concept carries a display.
    ///
    /// Both returned values have whitespace runs collapsed to single spaces.
    /// Values are returned as-is otherwise; callers decide what emptiness
    /// means for them.
    pub fn best_title_and_text(&self) -> (Option<String>, Option<String>) {
        let mut title = self.title.clone();
        let mut text = self.text.clone();

        if title.is_none() || text.is_none() {
            let label = self.concept_label();
            if title.is_none() {
                title = label;
            } else {
                text = label;
            }
        }

        (
            title.map(|value| collapse_whitespace(&value)),
            text.map(|value| collapse_whitespace(&value)),
        )
    }

    /// First non-empty display label across all concepts, falling back to the
    /// first non-empty code when no concept has a display.
    fn concept_label(&self) -> Option<String> {
        self.concepts
            .iter()
            .find_map(|concept| non_blank(concept.display.as_deref()))
            .or_else(|| {
                self.concepts
                    .iter()
                    .find_map(|concept| non_blank(concept.code.as_deref()))
            })
    }
}

/// Top-level questionnaire document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Questionnaire {
    /// Stable document identifier; tasks prepared from this questionnaire
    /// reuse it when present.
    pub identifier: Option<String>,
    pub status: QuestionnaireStatus,
    /// Publication or revision date, when the document carries one.
    pub date: Option<DateTime<Utc>>,
    /// The root group containing the whole question tree.
    pub group: QuestionnaireGroup,
}

impl Questionnaire {
    /// A published questionnaire with the given identifier and root group.
    pub fn new(identifier: impl Into<String>, group: QuestionnaireGroup) -> Self {
        Self {
            identifier: Some(identifier.into()),
            status: QuestionnaireStatus::Published,
            date: None,
            group,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|candidate| !candidate.trim().is_empty())
        .map(str::to_string)
}

/// Collapse every run of whitespace into a single space. Does not trim.
fn collapse_whitespace(value: &str) -> String {
    let mut collapsed = String::with_capacity(value.len());
    let mut in_run = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if !in_run {
                collapsed.push(' ');
            }
            in_run = true;
        } else {
            collapsed.push(ch);
            in_run = false;
        }
    }
    collapsed
}
