//! Digital-skills assessment for digiskill
//!
//! This crate holds the bilingual quiz bank, submission scoring and the in-memory
//! stores for user profiles, quiz results and chat history.

mod questions;
mod scoring;
mod store;


pub use questions::{
    question_bank, find_question, localized,
    Difficulty, Language, Localized, LocalizedQuestion, QuizQuestion,
    CYBERSECURITY, WEB_FUNDAMENTALS,
};
pub use scoring::{percentage, score_submission, Breakdown, QuizAnswer, QuizResult, QuizSubmission, ScoreSummary};
pub use store::{AssessmentStore, ChatExchange, UserProfile};

// Re-export core types for convenience
pub use digiskill_core::{Error, Result};
