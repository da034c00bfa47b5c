pub mod config;
pub mod evaluator;
pub mod generator;
pub mod score;
pub mod session;
pub mod submit;
pub mod summary;

use config::Operation;

/// Wording placed in front of the bare expression when a question is asked.
pub const QUESTION_PREFIX: &str = "What is ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub operation: Operation,
    pub operand_a: u32,
    pub operand_b: u32,
    pub correct_answer: i64,
    /// Only filled in for multiple choice questions.
    pub choices: Option<Vec<i64>>,
}

impl Question {
    pub fn new(operation: Operation, operand_a: u32, operand_b: u32) -> Self {
        let correct_answer = match operation {
            Operation::Addition => i64::from(operand_a) + i64::from(operand_b),
            Operation::Subtraction => i64::from(operand_a) - i64::from(operand_b),
        };
        let text = format!(
            "{}{} {} {}",
            QUESTION_PREFIX,
            operand_a,
            operation.symbol(),
            operand_b
        );
        Self {
            text,
            operation,
            operand_a,
            operand_b,
            correct_answer,
            choices: None,
        }
    }

    pub fn with_choices(mut self, choices: Vec<i64>) -> Self {
        self.choices = Some(choices);
        self
    }
}

/// Strips the question wording off a prompt, leaving e.g. `12 + 7`.
pub fn bare_expression(text: &str) -> &str {
    text.trim()
        .trim_start_matches(QUESTION_PREFIX)
        .trim_end_matches('?')
        .trim()
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub question_text: String,
    pub correct_answer: i64,
    pub user_answer: Option<String>,
    pub is_correct: bool,
    pub response_time_seconds: Option<f64>,
    pub score_delta: i64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// 1-based; one past the question count once the last round is scored.
    pub current_round: usize,
    pub score: i64,
    pub correct_count: usize,
    pub history: Vec<RoundResult>,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            current_round: 1,
            score: 0,
            correct_count: 0,
            history: Vec::new(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
