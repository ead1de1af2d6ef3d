pub mod questionnaire;

// Re-export core models for easy access
pub use questionnaire::{
    AnswerFormat, Concept, EnableWhenRule, Question, Questionnaire, QuestionnaireGroup,
    QuestionnaireStatus,
};
