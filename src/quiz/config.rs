use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A setup option that is chosen by pressing one of a fixed set of buttons.
pub trait Labeled: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL.iter().copied().find(|option| option.label() == text)
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|option| option.label()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Addition,
    Subtraction,
}

impl Operation {
    pub fn symbol(self) -> char {
        match self {
            Operation::Addition => '+',
            Operation::Subtraction => '-',
        }
    }
}

impl Labeled for Operation {
    const ALL: &'static [Self] = &[Operation::Addition, Operation::Subtraction];

    fn label(self) -> &'static str {
        match self {
            Operation::Addition => "Addition",
            Operation::Subtraction => "Subtraction",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberRange {
    UpToTen,
    UpToFifty,
    UpToHundred,
}

impl NumberRange {
    /// Inclusive upper bound for operand draws. The lower bound is always 1.
    pub fn upper_bound(self) -> u32 {
        match self {
            NumberRange::UpToTen => 10,
            NumberRange::UpToFifty => 50,
            NumberRange::UpToHundred => 100,
        }
    }
}

impl Labeled for NumberRange {
    const ALL: &'static [Self] = &[
        NumberRange::UpToTen,
        NumberRange::UpToFifty,
        NumberRange::UpToHundred,
    ];

    fn label(self) -> &'static str {
        match self {
            NumberRange::UpToTen => "1 - 10",
            NumberRange::UpToFifty => "1 - 50",
            NumberRange::UpToHundred => "1 - 100",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    MultipleChoice,
    FreeResponse,
    ShowWork,
}

impl ResponseType {
    pub fn needs_choices(self) -> bool {
        matches!(self, ResponseType::MultipleChoice)
    }
}

impl Labeled for ResponseType {
    const ALL: &'static [Self] = &[
        ResponseType::MultipleChoice,
        ResponseType::FreeResponse,
        ResponseType::ShowWork,
    ];

    fn label(self) -> &'static str {
        match self {
            ResponseType::MultipleChoice => "Multiple Choice",
            ResponseType::FreeResponse => "Free Response",
            ResponseType::ShowWork => "Show Your Work",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectReward {
    NoReward,
    Plus50,
    Plus100,
}

impl CorrectReward {
    pub fn magnitude(self) -> i64 {
        match self {
            CorrectReward::NoReward => 0,
            CorrectReward::Plus50 => 50,
            CorrectReward::Plus100 => 100,
        }
    }
}

impl Labeled for CorrectReward {
    const ALL: &'static [Self] = &[
        CorrectReward::NoReward,
        CorrectReward::Plus50,
        CorrectReward::Plus100,
    ];

    fn label(self) -> &'static str {
        match self {
            CorrectReward::NoReward => "No Reward",
            CorrectReward::Plus50 => "+50",
            CorrectReward::Plus100 => "+100",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrongPenalty {
    NoPenalty,
    Minus50,
    Minus100,
}

impl WrongPenalty {
    /// Points taken away, as a positive number.
    pub fn magnitude(self) -> i64 {
        match self {
            WrongPenalty::NoPenalty => 0,
            WrongPenalty::Minus50 => 50,
            WrongPenalty::Minus100 => 100,
        }
    }
}

impl Labeled for WrongPenalty {
    const ALL: &'static [Self] = &[
        WrongPenalty::NoPenalty,
        WrongPenalty::Minus50,
        WrongPenalty::Minus100,
    ];

    fn label(self) -> &'static str {
        match self {
            WrongPenalty::NoPenalty => "No Penalty",
            WrongPenalty::Minus50 => "-50",
            WrongPenalty::Minus100 => "-100",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectFeedback {
    Nothing,
    RepeatQuestion,
    ResponseTime,
}

impl Labeled for CorrectFeedback {
    const ALL: &'static [Self] = &[
        CorrectFeedback::Nothing,
        CorrectFeedback::RepeatQuestion,
        CorrectFeedback::ResponseTime,
    ];

    fn label(self) -> &'static str {
        match self {
            CorrectFeedback::Nothing => "No additional feedback",
            CorrectFeedback::RepeatQuestion => "Show me the question again",
            CorrectFeedback::ResponseTime => "Show me how quickly I answered",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrongFeedback {
    Nothing,
    CorrectAnswer,
    Distance,
}

impl Labeled for WrongFeedback {
    const ALL: &'static [Self] = &[
        WrongFeedback::Nothing,
        WrongFeedback::CorrectAnswer,
        WrongFeedback::Distance,
    ];

    fn label(self) -> &'static str {
        match self {
            WrongFeedback::Nothing => "No additional feedback",
            WrongFeedback::CorrectAnswer => "Show me the correct answer",
            WrongFeedback::Distance => "Tell me how close I was",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndSummary {
    CountOnly,
    FullBreakdown,
}

impl Labeled for EndSummary {
    const ALL: &'static [Self] = &[EndSummary::CountOnly, EndSummary::FullBreakdown];

    fn label(self) -> &'static str {
        match self {
            EndSummary::CountOnly => "How many questions I got correct",
            EndSummary::FullBreakdown => "Summarize my answers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub operation: Operation,
    pub range: NumberRange,
    pub question_count: usize,
    pub response_type: ResponseType,
    pub correct_reward: CorrectReward,
    pub correct_feedback: CorrectFeedback,
    pub wrong_penalty: WrongPenalty,
    pub wrong_feedback: WrongFeedback,
    pub end_summary: EndSummary,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.question_count == 0 {
            return Err(ConfigError::InvalidQuestionCount(
                self.question_count.to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{answer:?} is not one of the options for {step:?}")]
    UnknownOption { step: SetupStep, answer: String },
    #[error("question count must be a positive whole number, got {0:?}")]
    InvalidQuestionCount(String),
    #[error("setup is not finished, {0:?} is still unanswered")]
    Incomplete(SetupStep),
    #[error("setup is already complete")]
    AlreadyComplete,
}

/// The setup questions, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Operation,
    Range,
    QuestionCount,
    ResponseType,
    CorrectReward,
    CorrectFeedback,
    WrongPenalty,
    WrongFeedback,
    EndSummary,
}

const SUGGESTED_QUESTION_COUNTS: [&str; 3] = ["3", "4", "5"];

impl SetupStep {
    pub fn prompt(self) -> &'static str {
        match self {
            SetupStep::Operation => "What do you want to be tested on?",
            SetupStep::Range => "What number range do you want to use?",
            SetupStep::QuestionCount => "How many questions do you want to try?",
            SetupStep::ResponseType => "Select a response format.",
            SetupStep::CorrectReward => {
                "If you get a question right, what should happen to your score?"
            }
            SetupStep::CorrectFeedback => "If you get a question right, what do you want to be told?",
            SetupStep::WrongPenalty => {
                "If you get a question wrong, what should happen to your score?"
            }
            SetupStep::WrongFeedback => "If you get a question wrong, what do you want to be told?",
            SetupStep::EndSummary => "What do you want to be shown at the end of the game?",
        }
    }

    pub fn options(self) -> Vec<&'static str> {
        match self {
            SetupStep::Operation => Operation::labels(),
            SetupStep::Range => NumberRange::labels(),
            SetupStep::QuestionCount => SUGGESTED_QUESTION_COUNTS.to_vec(),
            SetupStep::ResponseType => ResponseType::labels(),
            SetupStep::CorrectReward => CorrectReward::labels(),
            SetupStep::CorrectFeedback => CorrectFeedback::labels(),
            SetupStep::WrongPenalty => WrongPenalty::labels(),
            SetupStep::WrongFeedback => WrongFeedback::labels(),
            SetupStep::EndSummary => EndSummary::labels(),
        }
    }
}

/// A game configuration that is filled in one answer at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDraft {
    operation: Option<Operation>,
    range: Option<NumberRange>,
    question_count: Option<usize>,
    response_type: Option<ResponseType>,
    correct_reward: Option<CorrectReward>,
    correct_feedback: Option<CorrectFeedback>,
    wrong_penalty: Option<WrongPenalty>,
    wrong_feedback: Option<WrongFeedback>,
    end_summary: Option<EndSummary>,
}

fn parse_option<T: Labeled>(step: SetupStep, answer: &str) -> Result<T, ConfigError> {
    T::from_label(answer).ok_or_else(|| ConfigError::UnknownOption {
        step,
        answer: answer.to_string(),
    })
}

impl ConfigDraft {
    pub fn next_step(&self) -> Option<SetupStep> {
        if self.operation.is_none() {
            Some(SetupStep::Operation)
        } else if self.range.is_none() {
            Some(SetupStep::Range)
        } else if self.question_count.is_none() {
            Some(SetupStep::QuestionCount)
        } else if self.response_type.is_none() {
            Some(SetupStep::ResponseType)
        } else if self.correct_reward.is_none() {
            Some(SetupStep::CorrectReward)
        } else if self.correct_feedback.is_none() {
            Some(SetupStep::CorrectFeedback)
        } else if self.wrong_penalty.is_none() {
            Some(SetupStep::WrongPenalty)
        } else if self.wrong_feedback.is_none() {
            Some(SetupStep::WrongFeedback)
        } else if self.end_summary.is_none() {
            Some(SetupStep::EndSummary)
        } else {
            None
        }
    }

    /// Records `answer` for the pending step and returns the step it answered.
    /// A rejected answer leaves the draft untouched.
    pub fn accept(&mut self, answer: &str) -> Result<SetupStep, ConfigError> {
        let step = self.next_step().ok_or(ConfigError::AlreadyComplete)?;
        match step {
            SetupStep::Operation => self.operation = Some(parse_option(step, answer)?),
            SetupStep::Range => self.range = Some(parse_option(step, answer)?),
            SetupStep::QuestionCount => {
                let count = answer
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|count| *count > 0)
                    .ok_or_else(|| ConfigError::InvalidQuestionCount(answer.to_string()))?;
                self.question_count = Some(count);
            }
            SetupStep::ResponseType => self.response_type = Some(parse_option(step, answer)?),
            SetupStep::CorrectReward => self.correct_reward = Some(parse_option(step, answer)?),
            SetupStep::CorrectFeedback => {
                self.correct_feedback = Some(parse_option(step, answer)?)
            }
            SetupStep::WrongPenalty => self.wrong_penalty = Some(parse_option(step, answer)?),
            SetupStep::WrongFeedback => self.wrong_feedback = Some(parse_option(step, answer)?),
            SetupStep::EndSummary => self.end_summary = Some(parse_option(step, answer)?),
        }
        Ok(step)
    }

    pub fn finish(&self) -> Result<GameConfig, ConfigError> {
        let missing = ConfigError::Incomplete;
        Ok(GameConfig {
            operation: self.operation.ok_or(missing(SetupStep::Operation))?,
            range: self.range.ok_or(missing(SetupStep::Range))?,
            question_count: self
                .question_count
                .ok_or(missing(SetupStep::QuestionCount))?,
            response_type: self
                .response_type
                .ok_or(missing(SetupStep::ResponseType))?,
            correct_reward: self
                .correct_reward
                .ok_or(missing(SetupStep::CorrectReward))?,
            correct_feedback: self
                .correct_feedback
                .ok_or(missing(SetupStep::CorrectFeedback))?,
            wrong_penalty: self
                .wrong_penalty
                .ok_or(missing(SetupStep::WrongPenalty))?,
            wrong_feedback: self
                .wrong_feedback
                .ok_or(missing(SetupStep::WrongFeedback))?,
            end_summary: self.end_summary.ok_or(missing(SetupStep::EndSummary))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_SETUP: [&str; 9] = [
        "Subtraction",
        "1 - 50",
        "4",
        "Free Response",
        "+100",
        "Show me how quickly I answered",
        "-50",
        "Tell me how close I was",
        "Summarize my answers",
    ];

    #[test]
    fn draft_walks_every_step_in_order() {
        let mut draft = ConfigDraft::default();
        let mut answered = Vec::new();
        for answer in FULL_SETUP {
            answered.push(draft.accept(answer).unwrap());
        }

        assert_eq!(
            answered,
            vec![
                SetupStep::Operation,
                SetupStep::Range,
                SetupStep::QuestionCount,
                SetupStep::ResponseType,
                SetupStep::CorrectReward,
                SetupStep::CorrectFeedback,
                SetupStep::WrongPenalty,
                SetupStep::WrongFeedback,
                SetupStep::EndSummary,
            ]
        );
        assert_eq!(draft.next_step(), None);

        let config = draft.finish().unwrap();
        assert_eq!(config.operation, Operation::Subtraction);
        assert_eq!(config.range.upper_bound(), 50);
        assert_eq!(config.question_count, 4);
        assert_eq!(config.response_type, ResponseType::FreeResponse);
        assert_eq!(config.correct_reward.magnitude(), 100);
        assert_eq!(config.correct_feedback, CorrectFeedback::ResponseTime);
        assert_eq!(config.wrong_penalty.magnitude(), 50);
        assert_eq!(config.wrong_feedback, WrongFeedback::Distance);
        assert_eq!(config.end_summary, EndSummary::FullBreakdown);
    }

    #[test]
    fn unknown_option_is_rejected_without_advancing() {
        let mut draft = ConfigDraft::default();
        let err = draft.accept("Multiplication").unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownOption {
                step: SetupStep::Operation,
                answer: "Multiplication".to_string(),
            }
        );
        assert_eq!(draft.next_step(), Some(SetupStep::Operation));
    }

    #[test]
    fn question_count_must_be_positive() {
        let mut draft = ConfigDraft::default();
        draft.accept("Addition").unwrap();
        draft.accept("1 - 10").unwrap();

        assert!(matches!(
            draft.accept("0"),
            Err(ConfigError::InvalidQuestionCount(_))
        ));
        assert!(matches!(
            draft.accept("three"),
            Err(ConfigError::InvalidQuestionCount(_))
        ));
        assert_eq!(draft.accept(" 12 ").unwrap(), SetupStep::QuestionCount);
    }

    #[test]
    fn finish_reports_first_missing_step() {
        let mut draft = ConfigDraft::default();
        draft.accept("Addition").unwrap();
        assert_eq!(
            draft.finish(),
            Err(ConfigError::Incomplete(SetupStep::Range))
        );
    }

    #[test]
    fn accept_after_completion_fails() {
        let mut draft = ConfigDraft::default();
        for answer in FULL_SETUP {
            draft.accept(answer).unwrap();
        }
        assert_eq!(draft.accept("Addition"), Err(ConfigError::AlreadyComplete));
    }

    #[test]
    fn feedback_labels_resolve_per_step() {
        // Both feedback questions offer the same "nothing" label
        assert_eq!(
            CorrectFeedback::from_label("No additional feedback"),
            Some(CorrectFeedback::Nothing)
        );
        assert_eq!(
            WrongFeedback::from_label("No additional feedback"),
            Some(WrongFeedback::Nothing)
        );
        assert_eq!(WrongPenalty::from_label("+50"), None);
    }

    #[test]
    fn options_match_labels() {
        assert_eq!(
            SetupStep::ResponseType.options(),
            vec!["Multiple Choice", "Free Response", "Show Your Work"]
        );
        assert_eq!(SetupStep::QuestionCount.options(), vec!["3", "4", "5"]);
    }

    #[test]
    fn zero_question_config_fails_validation() {
        let mut draft = ConfigDraft::default();
        for answer in FULL_SETUP {
            draft.accept(answer).unwrap();
        }
        let mut config = draft.finish().unwrap();
        assert!(config.validate().is_ok());
        config.question_count = 0;
        assert!(config.validate().is_err());
    }
}
