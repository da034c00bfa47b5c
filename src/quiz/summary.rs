use crate::quiz::config::EndSummary;
use crate::quiz::{GameState, RoundResult};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalSummary {
    pub total_score: i64,
    pub total_questions: usize,
    pub correct_count: usize,
    pub history: Vec<RoundResult>,
}

impl FinalSummary {
    pub fn from_state(state: &GameState, total_questions: usize) -> Self {
        Self {
            total_score: state.score,
            total_questions,
            correct_count: state.correct_count,
            history: state.history.clone(),
        }
    }

    pub fn correctly_answered(&self) -> impl Iterator<Item = &str> {
        self.history
            .iter()
            .filter(|round| round.is_correct)
            .map(|round| round.question_text.as_str())
    }

    pub fn incorrectly_answered(&self) -> impl Iterator<Item = &str> {
        self.history
            .iter()
            .filter(|round| !round.is_correct)
            .map(|round| round.question_text.as_str())
    }

    pub fn render(&self, mode: EndSummary) -> String {
        let mut text = format!("⭐ {}\n\n", self.total_score);
        match mode {
            EndSummary::CountOnly => {
                text.push_str(&format!(
                    "Nice Job! You got {} questions out of {} correct.",
                    self.correct_count, self.total_questions
                ));
            }
            EndSummary::FullBreakdown => {
                text.push_str("Great Job!\n");
                push_section(&mut text, "Correctly Answered", self.correctly_answered());
                push_section(&mut text, "Incorrectly Answered", self.incorrectly_answered());
            }
        }
        text
    }
}

fn push_section<'a>(text: &mut String, title: &str, expressions: impl Iterator<Item = &'a str>) {
    text.push_str(&format!("\n{}:\n", title));
    let mut empty = true;
    for expression in expressions {
        empty = false;
        text.push_str(&format!("• {}\n", expression));
    }
    if empty {
        text.push_str("(none)\n");
    }
}
