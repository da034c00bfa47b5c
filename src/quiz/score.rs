use std::fmt;

use crate::quiz::config::{CorrectFeedback, GameConfig, WrongFeedback};
use crate::quiz::evaluator::{Outcome, RawAnswer};
use crate::quiz::{bare_expression, GameState, Question, RoundResult};

/// Extra line shown under the verdict, depending on the chosen feedback mode.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackDetail {
    SolvedEquation { expression: String, answer: i64 },
    ResponseTime(f64),
    CorrectAnswer(i64),
    Distance(u64),
}

impl fmt::Display for FeedbackDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackDetail::SolvedEquation { expression, answer } => {
                write!(f, "{} = {}", expression, answer)
            }
            FeedbackDetail::ResponseTime(seconds) => {
                write!(f, "You answered in {:.1} seconds.", seconds)
            }
            FeedbackDetail::CorrectAnswer(answer) => write!(f, "The correct answer is {}.", answer),
            FeedbackDetail::Distance(distance) => write!(f, "You were off by {}.", distance),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundFeedback {
    pub is_correct: bool,
    pub score_delta: i64,
    pub detail: Option<FeedbackDetail>,
}

impl RoundFeedback {
    pub fn headline(&self) -> &'static str {
        if self.is_correct {
            "That's correct!"
        } else {
            "That's incorrect!"
        }
    }

    /// `+50` / `-100` style badge; hidden when the round did not move the score.
    pub fn score_badge(&self) -> Option<String> {
        match self.score_delta {
            0 => None,
            delta if delta > 0 => Some(format!("+{}", delta)),
            delta => Some(delta.to_string()),
        }
    }
}

fn round_to_tenths(seconds: f64) -> f64 {
    (seconds * 10.0).round() / 10.0
}

/// Scores one round. Consumes the previous state and returns the next one
/// along with the feedback to show for the round.
pub fn apply_outcome(
    mut state: GameState,
    outcome: Outcome,
    config: &GameConfig,
    question: &Question,
    answer: &RawAnswer,
    elapsed_seconds: Option<f64>,
) -> (GameState, RoundFeedback) {
    let expression = bare_expression(&question.text).to_string();
    let response_time = elapsed_seconds.map(round_to_tenths);

    let (score_delta, detail) = if outcome.is_correct {
        let detail = match config.correct_feedback {
            CorrectFeedback::Nothing => None,
            CorrectFeedback::RepeatQuestion => Some(FeedbackDetail::SolvedEquation {
                expression: expression.clone(),
                answer: question.correct_answer,
            }),
            CorrectFeedback::ResponseTime => response_time.map(FeedbackDetail::ResponseTime),
        };
        (config.correct_reward.magnitude(), detail)
    } else {
        let detail = match config.wrong_feedback {
            WrongFeedback::Nothing => None,
            WrongFeedback::CorrectAnswer => {
                Some(FeedbackDetail::CorrectAnswer(question.correct_answer))
            }
            WrongFeedback::Distance => answer
                .as_number()
                .map(|given| FeedbackDetail::Distance(question.correct_answer.abs_diff(given))),
        };
        (-config.wrong_penalty.magnitude(), detail)
    };

    state.score += score_delta;
    if outcome.is_correct {
        state.correct_count += 1;
    }
    state.history.push(RoundResult {
        question_text: expression,
        correct_answer: question.correct_answer,
        user_answer: answer.recorded(),
        is_correct: outcome.is_correct,
        response_time_seconds: response_time,
        score_delta,
    });
    state.current_round += 1;

    let feedback = RoundFeedback {
        is_correct: outcome.is_correct,
        score_delta,
        detail,
    };
    (state, feedback)
}
