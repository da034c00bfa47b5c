//! Arithmetic quiz engine behind the Bad Math Telegram bot: question
//! generation, answer checking, scoring and the per-game round loop.

pub mod quiz;
pub mod settings;
