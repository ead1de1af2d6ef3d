//! Test data builders for questionnaire trees.

#![allow(dead_code)] // Not every test binary uses every builder.

use questionnaire_core::models::{
    Concept, EnableWhenRule, Question, Questionnaire, QuestionnaireGroup,
};
use questionnaire_core::Step;
use serde_json::Value;

/// A question with the given identifier and a placeholder text.
pub fn question(link_id: &str) -> Question {
    Question {
        link_id: Some(link_id.to_string()),
        text: Some(format!("Question {link_id}")),
        ..Default::default()
    }
}

/// A leaf group holding a run of questions.
pub fn group_of_questions(
    link_id: &str,
    title: Option<&str>,
    questions: Vec<Question>,
) -> QuestionnaireGroup {
    QuestionnaireGroup {
        link_id: Some(link_id.to_string()),
        title: title.map(str::to_string),
        questions,
        ..Default::default()
    }
}

/// An interior group holding subgroups.
pub fn group_of_groups(
    link_id: &str,
    title: Option<&str>,
    groups: Vec<QuestionnaireGroup>,
) -> QuestionnaireGroup {
    QuestionnaireGroup {
        link_id: Some(link_id.to_string()),
        title: title.map(str::to_string),
        groups,
        ..Default::default()
    }
}

/// A raw conditional display rule.
pub fn rule(question: &str, operator: &str, answer: Value) -> EnableWhenRule {
    EnableWhenRule {
        question: Some(question.to_string()),
        operator: Some(operator.to_string()),
        answer: Some(answer),
    }
}

pub fn concept(code: Option<&str>, display: Option<&str>) -> Concept {
    Concept {
        code: code.map(str::to_string),
        display: display.map(str::to_string),
    }
}

/// Wrap a root group into a published questionnaire document.
pub fn questionnaire(identifier: &str, root: QuestionnaireGroup) -> Questionnaire {
    Questionnaire::new(identifier, root)
}

/// Step identifiers in result order.
pub fn step_identifiers(steps: &[Step]) -> Vec<String> {
    steps.iter().map(|step| step.identifier.clone()).collect()
}
