use log::{debug, info};
use rand::Rng;
use thiserror::Error;

use crate::quiz::config::{ConfigError, GameConfig};
use crate::quiz::evaluator::{self, RawAnswer};
use crate::quiz::generator;
use crate::quiz::score::{self, RoundFeedback};
use crate::quiz::summary::FinalSummary;
use crate::quiz::{GameState, Question};

/// Where a session is in its round loop. Round numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configuring,
    InRound(usize),
    Feedback(usize),
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot {action} while the session is in {phase:?}")]
    WrongPhase { action: &'static str, phase: Phase },
}

/// What happens after the player acknowledges a round's feedback.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    NextRound(Question),
    Finished(FinalSummary),
}

/// One game from setup to final summary. Owns every piece of game state.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    state: GameState,
    phase: Phase,
    question: Option<Question>,
    last_feedback: Option<RoundFeedback>,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            config,
            state: GameState::new(),
            phase: Phase::Configuring,
            question: None,
            last_feedback: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The open question, only while a round waits for an answer.
    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn last_feedback(&self) -> Option<&RoundFeedback> {
        self.last_feedback.as_ref()
    }

    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Question, SessionError> {
        self.expect_phase("start", |phase| phase == Phase::Configuring)?;
        info!(
            "Starting a {} question {:?} game",
            self.config.question_count, self.config.operation
        );
        Ok(self.begin_round(rng))
    }

    pub fn submit(
        &mut self,
        answer: RawAnswer,
        elapsed_seconds: Option<f64>,
    ) -> Result<&RoundFeedback, SessionError> {
        let round = match self.phase {
            Phase::InRound(round) => round,
            phase => {
                return Err(SessionError::WrongPhase {
                    action: "submit an answer",
                    phase,
                })
            }
        };
        let question = self.question.take().ok_or(SessionError::WrongPhase {
            action: "submit an answer",
            phase: self.phase,
        })?;

        let outcome = evaluator::evaluate(&question, self.config.response_type, &answer);
        let (state, feedback) = score::apply_outcome(
            std::mem::take(&mut self.state),
            outcome,
            &self.config,
            &question,
            &answer,
            elapsed_seconds,
        );
        debug!(
            "Round {} ({}): correct={} delta={} score={}",
            round, question.text, feedback.is_correct, feedback.score_delta, state.score
        );

        self.state = state;
        self.phase = Phase::Feedback(round);
        Ok(&*self.last_feedback.insert(feedback))
    }

    pub fn acknowledge<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Advance, SessionError> {
        let round = match self.phase {
            Phase::Feedback(round) => round,
            phase => {
                return Err(SessionError::WrongPhase {
                    action: "move past feedback",
                    phase,
                })
            }
        };
        self.last_feedback = None;

        if round >= self.config.question_count {
            let summary = FinalSummary::from_state(&self.state, self.config.question_count);
            info!(
                "Game finished with score {} ({} of {} correct)",
                summary.total_score, summary.correct_count, summary.total_questions
            );
            self.phase = Phase::Finished;
            return Ok(Advance::Finished(summary));
        }
        Ok(Advance::NextRound(self.begin_round(rng).clone()))
    }

    fn begin_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &Question {
        let round = self.state.current_round;
        let question = generator::generate(
            rng,
            self.config.operation,
            self.config.range.upper_bound(),
            self.config.response_type,
        );
        debug!(
            "Round {}: {} {} {} (choices {:?})",
            round,
            question.operand_a,
            question.operation.symbol(),
            question.operand_b,
            question.choices
        );
        self.phase = Phase::InRound(round);
        self.question.insert(question)
    }

    fn expect_phase(
        &self,
        action: &'static str,
        allowed: impl Fn(Phase) -> bool,
    ) -> Result<(), SessionError> {
        if allowed(self.phase) {
            Ok(())
        } else {
            Err(SessionError::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }
}
