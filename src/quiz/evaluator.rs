use crate::quiz::config::ResponseType;
use crate::quiz::Question;

/// What the player sent back for a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAnswer {
    /// One of the offered multiple choice options.
    Choice(i64),
    /// Typed text, not yet parsed.
    Text(String),
    /// A worked solution (drawing or photo). Its content is never inspected.
    Work,
}

impl RawAnswer {
    /// The answer as a number, if it is one.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            RawAnswer::Choice(value) => Some(*value),
            RawAnswer::Text(text) => text.trim().parse().ok(),
            RawAnswer::Work => None,
        }
    }

    /// How the answer is recorded in the round history.
    pub fn recorded(&self) -> Option<String> {
        match self {
            RawAnswer::Choice(value) => Some(value.to_string()),
            RawAnswer::Text(text) => Some(text.clone()),
            RawAnswer::Work => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub is_correct: bool,
}

pub fn evaluate(question: &Question, response_type: ResponseType, answer: &RawAnswer) -> Outcome {
    let is_correct = match response_type {
        ResponseType::MultipleChoice => {
            matches!(answer, RawAnswer::Choice(value) if *value == question.correct_answer)
        }
        ResponseType::FreeResponse => answer.as_number() == Some(question.correct_answer),
        // Worked solutions are collected but not graded
        ResponseType::ShowWork => false,
    };
    Outcome { is_correct }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::config::Operation;
    use crate::quiz::generator::from_draws;

    fn seven() -> Question {
        from_draws(Operation::Addition, 3, 4)
    }

    #[test]
    fn free_response_tolerates_whitespace() {
        let outcome = evaluate(
            &seven(),
            ResponseType::FreeResponse,
            &RawAnswer::Text(" 7 ".to_string()),
        );
        assert!(outcome.is_correct);
    }

    #[test]
    fn free_response_garbage_is_incorrect() {
        for text in ["", "seven", "7.0", "7 7", "--7"] {
            let outcome = evaluate(
                &seven(),
                ResponseType::FreeResponse,
                &RawAnswer::Text(text.to_string()),
            );
            assert!(!outcome.is_correct, "{text:?} should not count");
        }
    }

    #[test]
    fn multiple_choice_compares_selected_option() {
        let question = seven();
        assert!(evaluate(&question, ResponseType::MultipleChoice, &RawAnswer::Choice(7)).is_correct);
        assert!(!evaluate(&question, ResponseType::MultipleChoice, &RawAnswer::Choice(8)).is_correct);
        assert!(
            !evaluate(
                &question,
                ResponseType::MultipleChoice,
                &RawAnswer::Text("7".to_string())
            )
            .is_correct
        );
    }

    #[test]
    fn show_work_is_never_correct() {
        let question = seven();
        for answer in [
            RawAnswer::Work,
            RawAnswer::Choice(7),
            RawAnswer::Text("7".to_string()),
        ] {
            assert!(!evaluate(&question, ResponseType::ShowWork, &answer).is_correct);
        }
    }

    #[test]
    fn evaluation_is_repeatable() {
        let question = seven();
        let answer = RawAnswer::Text("7".to_string());
        let first = evaluate(&question, ResponseType::FreeResponse, &answer);
        for _ in 0..10 {
            assert_eq!(evaluate(&question, ResponseType::FreeResponse, &answer), first);
        }
    }

    #[test]
    fn recorded_answer_keeps_raw_text() {
        assert_eq!(
            RawAnswer::Text(" 12 ".to_string()).recorded().as_deref(),
            Some(" 12 ")
        );
        assert_eq!(RawAnswer::Choice(4).recorded().as_deref(), Some("4"));
        assert_eq!(RawAnswer::Work.recorded(), None);
        assert_eq!(RawAnswer::Text("abc".to_string()).as_number(), None);
    }
}
