use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::quiz::config::{Operation, ResponseType};
use crate::quiz::Question;

pub const CHOICE_COUNT: usize = 4;

/// Offsets tried around the correct answer when picking distractors.
const DISTRACTOR_SPREAD: RangeInclusive<i64> = -5..=4;

/// Generates a question with both operands drawn from `1..=upper_bound`.
///
/// Multiple choice questions also get a shuffled set of four options.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    operation: Operation,
    upper_bound: u32,
    response_type: ResponseType,
) -> Question {
    let a = rng.gen_range(1..=upper_bound);
    let b = rng.gen_range(1..=upper_bound);
    let question = from_draws(operation, a, b);

    if response_type.needs_choices() {
        let choices = build_choices(rng, question.correct_answer);
        return question.with_choices(choices);
    }
    question
}

/// Builds the question for two raw draws. Subtraction puts the larger draw
/// first so the answer is never negative.
pub fn from_draws(operation: Operation, a: u32, b: u32) -> Question {
    let (a, b) = match operation {
        Operation::Subtraction if b > a => (b, a),
        _ => (a, b),
    };
    Question::new(operation, a, b)
}

/// Four distinct non-negative options, one of which is `correct_answer`.
///
/// Distractors are only kept non-negative, so they can land outside the
/// configured number range.
pub fn build_choices<R: Rng + ?Sized>(rng: &mut R, correct_answer: i64) -> Vec<i64> {
    let mut choices = vec![correct_answer];
    while choices.len() < CHOICE_COUNT {
        let fake = correct_answer + rng.gen_range(DISTRACTOR_SPREAD);
        if fake >= 0 && !choices.contains(&fake) {
            choices.push(fake);
        }
    }
    choices.shuffle(rng);
    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn operands_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for upper_bound in [1, 10, 50, 100] {
            for _ in 0..500 {
                let question = generate(
                    &mut rng,
                    Operation::Addition,
                    upper_bound,
                    ResponseType::FreeResponse,
                );
                assert!((1..=upper_bound).contains(&question.operand_a));
                assert!((1..=upper_bound).contains(&question.operand_b));
                assert_eq!(question.choices, None);
            }
        }
    }

    #[test]
    fn subtraction_never_goes_negative() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let question = generate(&mut rng, Operation::Subtraction, 10, ResponseType::ShowWork);
            assert!(question.operand_a >= question.operand_b);
            assert!(question.correct_answer >= 0);
        }
    }

    #[test]
    fn addition_from_fixed_draws() {
        let question = from_draws(Operation::Addition, 3, 4);
        assert_eq!(question.correct_answer, 7);
        assert!(question.text.contains("3 + 4"));
    }

    #[test]
    fn subtraction_swaps_smaller_first_draw() {
        let question = from_draws(Operation::Subtraction, 4, 9);
        assert_eq!((question.operand_a, question.operand_b), (9, 4));
        assert_eq!(question.correct_answer, 5);
        assert!(question.text.contains("9 - 4"));
    }

    #[test]
    fn multiple_choice_has_four_distinct_options() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let question = generate(
                &mut rng,
                Operation::Subtraction,
                10,
                ResponseType::MultipleChoice,
            );
            let choices = question.choices.expect("multiple choice needs options");
            assert_eq!(choices.len(), CHOICE_COUNT);
            assert!(choices.contains(&question.correct_answer));
            assert!(choices.iter().all(|choice| *choice >= 0));
            let mut deduped = choices.clone();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(deduped.len(), CHOICE_COUNT);
        }
    }

    #[test]
    fn zero_answer_still_gets_four_options() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let choices = build_choices(&mut rng, 0);
            let mut sorted = choices.clone();
            sorted.sort_unstable();
            assert_eq!(sorted.len(), CHOICE_COUNT);
            assert!(sorted.iter().all(|choice| (0..=4).contains(choice)));
        }
    }

    #[test]
    fn distractors_are_not_clamped_to_the_range() {
        // 10 + 10 with a 1 - 10 range: options may go up to 24
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen_above_range = false;
        for _ in 0..200 {
            let choices = build_choices(&mut rng, 20);
            assert!(choices.iter().all(|choice| (15..=24).contains(choice)));
            seen_above_range |= choices.iter().any(|choice| *choice > 10);
        }
        assert!(seen_above_range);
    }
}
