//! Question answering pipeline
//!
//! Classifies a question, optionally grounds it on subject material,
//! generates an answer and gates it on quality before it is stored.

mod classifier;
mod generator;
mod orchestrator;
pub mod quality;
mod response;
pub mod sanitize;

pub use classifier::{
    classify, matching_rule, token_count, Classification, Condition, Rule, RULES,
};
pub use generator::{
    deep_explanation_prompt, is_terse, plan_answer, GenerationMode, Generated, Generator,
};
pub use orchestrator::{AnswerPipeline, Question};
pub use quality::{is_quality, Rejection};
pub use response::{AnswerSource, AskResponse, DEEP_EXPLANATION_ERROR, UNRELIABLE_ANSWER_ERROR};
pub use sanitize::{repair_utf8, sanitize};
