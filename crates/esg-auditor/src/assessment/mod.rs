//! Diagnostic questionnaire, answer sheet and the scoring engine shared by
//! every surface that shows ESG scores.

mod answers;
mod questionnaire;
pub mod scoring;

pub use answers::{Answer, AnswerSheet, AnswerState, DiagnosticRecord, DiagnosticStep};
pub use questionnaire::{Question, Questionnaire, QuestionnaireError, Section};
pub use scoring::{
    assess, compute_completion, compute_global_score, compute_roadmap, compute_section_scores,
    percentage, Assessment, Completion, GlobalScore, MaturityLevel, Priority, RoadmapEntry,
    SectionCompletion, SectionScore,
};
