use std::sync::Arc;

use bad_math_bot::quiz::{
    config::{ConfigDraft, ResponseType, SetupStep},
    evaluator::RawAnswer,
    score::RoundFeedback,
    session::{Advance, GameSession, Phase},
    submit::{GameReport, HttpResultSink, LogResultSink, ResultSink},
    Question,
};
use bad_math_bot::settings::{Settings, RESULTS_ENDPOINT_VAR};
use chrono::{DateTime, Utc};
use dotenv::dotenv;
use log::{info, warn};
use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup, KeyboardRemove},
    utils::command::BotCommands,
};

type QuizDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    Configuring {
        draft: ConfigDraft,
    },
    Playing {
        session: GameSession,
        /// When the open question (or feedback) was sent.
        asked_at: DateTime<Utc>,
    },
    GameOver,
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
enum Command {
    #[command(description = "set up a new game.")]
    Start,
    #[command(description = "drop the current game and set up a new one.")]
    NewGame,
    #[command(description = "stop playing.")]
    Cancel,
    #[command(description = "show this text.")]
    Help,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting Bad Math bot...");

    let settings = Settings::from_env().expect("Invalid results settings");
    let sink: Arc<dyn ResultSink> = match settings.results_endpoint {
        Some(endpoint) => {
            info!("Finished games will be posted to {}", endpoint);
            Arc::new(
                HttpResultSink::new(endpoint, settings.results_timeout)
                    .expect("Failed to build the results HTTP client"),
            )
        }
        None => {
            info!("{} is not set, finished games are only logged", RESULTS_ENDPOINT_VAR);
            Arc::new(LogResultSink)
        }
    };

    let bot = Bot::from_env();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(teloxide::filter_command::<Command, _>().endpoint(handle_command))
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::Configuring { draft }].endpoint(receive_setup_answer))
            .branch(
                dptree::case![State::Playing { session, asked_at }].endpoint(
                    move |bot: Bot,
                          dialogue: QuizDialogue,
                          (session, asked_at): (GameSession, DateTime<Utc>),
                          msg: Message| {
                        play(sink.clone(), bot, dialogue, (session, asked_at), msg)
                    },
                ),
            )
            .branch(dptree::case![State::GameOver].endpoint(game_over)),
    )
    .dependencies(dptree::deps![InMemStorage::<State>::new()])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str = "Welcome to Bad Math Game! Answer a few sums and see how you do. First, a few questions about how you want to play.";
const PICK_AN_OPTION: &str = "Please pick one of the options";
const NEXT_QUESTION: &str = "Next Question";
const VIEW_RESULTS: &str = "View Results";
const NEW_GAME: &str = "New Game";

fn keyboard<T: ToString>(options: &[T]) -> KeyboardMarkup {
    KeyboardMarkup::new(
        options
            .iter()
            .map(|option| vec![KeyboardButton::new(option.to_string())])
            .collect::<Vec<_>>(),
    )
}

async fn handle_command(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    cmd: Command,
) -> HandlerResult {
    match cmd {
        Command::Start | Command::NewGame => {
            bot.send_message(msg.chat.id, GREETING_TEXT).await?;
            begin_setup(&bot, &dialogue, msg.chat.id).await?;
        }
        Command::Cancel => {
            bot.send_message(msg.chat.id, "Game stopped. Send /start to play again.")
                .reply_markup(KeyboardRemove::new())
                .await?;
            dialogue.exit().await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
    }
    Ok(())
}

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;
    begin_setup(&bot, &dialogue, msg.chat.id).await
}

async fn begin_setup(bot: &Bot, dialogue: &QuizDialogue, chat_id: ChatId) -> HandlerResult {
    let draft = ConfigDraft::default();
    if let Some(step) = draft.next_step() {
        ask_setup_step(bot, chat_id, step).await?;
    }
    dialogue.update(State::Configuring { draft }).await?;
    Ok(())
}

async fn ask_setup_step(bot: &Bot, chat_id: ChatId, step: SetupStep) -> HandlerResult {
    bot.send_message(chat_id, step.prompt())
        .reply_markup(keyboard(&step.options()))
        .await?;
    Ok(())
}

async fn receive_setup_answer(
    bot: Bot,
    dialogue: QuizDialogue,
    mut draft: ConfigDraft,
    msg: Message,
) -> HandlerResult {
    let answer = match msg.text() {
        Some(answer) => answer,
        None => {
            bot.send_message(msg.chat.id, PICK_AN_OPTION).await?;
            return Ok(());
        }
    };

    if let Err(err) = draft.accept(answer) {
        warn!("Rejected setup answer: {}", err);
        if let Some(step) = draft.next_step() {
            bot.send_message(msg.chat.id, format!("{}\n\n{}", PICK_AN_OPTION, step.prompt()))
                .reply_markup(keyboard(&step.options()))
                .await?;
        }
        return Ok(());
    }

    if let Some(step) = draft.next_step() {
        ask_setup_step(&bot, msg.chat.id, step).await?;
        dialogue.update(State::Configuring { draft }).await?;
        return Ok(());
    }

    let mut session = GameSession::new(draft.finish()?)?;
    let question = session.start(&mut rand::thread_rng())?.clone();

    bot.send_message(msg.chat.id, "Great! Let's start.").await?;
    send_question(&bot, msg.chat.id, &session, &question).await?;

    dialogue
        .update(State::Playing {
            session,
            asked_at: Utc::now(),
        })
        .await?;
    Ok(())
}

async fn send_question(
    bot: &Bot,
    chat_id: ChatId,
    session: &GameSession,
    question: &Question,
) -> HandlerResult {
    let config = session.config();
    let state = session.state();
    let header = format!(
        "Qn {} of {}   ⭐ {}\n\n{}",
        state.current_round, config.question_count, state.score, question.text
    );

    match (config.response_type, &question.choices) {
        (ResponseType::MultipleChoice, Some(choices)) => {
            let buttons = choices
                .iter()
                .map(|choice| KeyboardButton::new(choice.to_string()))
                .collect::<Vec<_>>();
            bot.send_message(chat_id, header)
                .reply_markup(KeyboardMarkup::new(vec![buttons]))
                .await?;
        }
        (ResponseType::ShowWork, _) => {
            bot.send_message(
                chat_id,
                format!("{}\n\nWork it out on paper and send me a photo of your working.", header),
            )
            .reply_markup(KeyboardRemove::new())
            .await?;
        }
        _ => {
            bot.send_message(chat_id, format!("{}\n\nType your answer.", header))
                .reply_markup(KeyboardRemove::new())
                .await?;
        }
    }
    Ok(())
}

/// Turns the player's message into an answer, or `None` if it should be asked again.
fn read_answer(response_type: ResponseType, question: &Question, msg: &Message) -> Option<RawAnswer> {
    match response_type {
        ResponseType::MultipleChoice => msg
            .text()
            .and_then(|text| text.trim().parse::<i64>().ok())
            .filter(|value| {
                question
                    .choices
                    .as_ref()
                    .is_some_and(|choices| choices.contains(value))
            })
            .map(RawAnswer::Choice),
        ResponseType::FreeResponse => msg
            .text()
            .filter(|text| !text.trim().is_empty())
            .map(|text| RawAnswer::Text(text.to_string())),
        ResponseType::ShowWork => {
            (msg.photo().is_some() || msg.text().is_some()).then_some(RawAnswer::Work)
        }
    }
}

fn continue_label(session: &GameSession) -> &'static str {
    match session.phase() {
        Phase::Feedback(round) if round >= session.config().question_count => VIEW_RESULTS,
        _ => NEXT_QUESTION,
    }
}

async fn play(
    sink: Arc<dyn ResultSink>,
    bot: Bot,
    dialogue: QuizDialogue,
    (session, asked_at): (GameSession, DateTime<Utc>),
    msg: Message,
) -> HandlerResult {
    match session.phase() {
        Phase::InRound(_) => receive_answer(bot, dialogue, session, asked_at, msg).await,
        Phase::Feedback(_) => receive_acknowledgement(sink, bot, dialogue, session, msg).await,
        phase => {
            warn!("Stored session is in unexpected phase {:?}, restarting setup", phase);
            begin_setup(&bot, &dialogue, msg.chat.id).await
        }
    }
}

async fn receive_answer(
    bot: Bot,
    dialogue: QuizDialogue,
    mut session: GameSession,
    asked_at: DateTime<Utc>,
    msg: Message,
) -> HandlerResult {
    let answer = session
        .question()
        .and_then(|question| read_answer(session.config().response_type, question, &msg));
    let answer = match answer {
        Some(answer) => answer,
        None => {
            let hint = match session.config().response_type {
                ResponseType::MultipleChoice => PICK_AN_OPTION,
                ResponseType::FreeResponse => "Please type your answer",
                ResponseType::ShowWork => "Please send a photo of your working",
            };
            bot.send_message(msg.chat.id, hint).await?;
            return Ok(());
        }
    };

    let elapsed = (Utc::now() - asked_at).num_milliseconds() as f64 / 1000.0;
    let feedback = session.submit(answer, Some(elapsed))?.clone();
    send_feedback(&bot, msg.chat.id, &session, &feedback).await?;

    dialogue
        .update(State::Playing {
            session,
            asked_at: Utc::now(),
        })
        .await?;
    Ok(())
}

async fn send_feedback(
    bot: &Bot,
    chat_id: ChatId,
    session: &GameSession,
    feedback: &RoundFeedback,
) -> HandlerResult {
    let mut lines = Vec::new();
    if let Some(badge) = feedback.score_badge() {
        lines.push(badge);
    }
    lines.push(feedback.headline().to_string());
    if let Some(detail) = &feedback.detail {
        lines.push(detail.to_string());
    }
    lines.push(format!("⭐ {}", session.state().score));

    bot.send_message(chat_id, lines.join("\n"))
        .reply_markup(keyboard(&[continue_label(session)]))
        .await?;
    Ok(())
}

async fn receive_acknowledgement(
    sink: Arc<dyn ResultSink>,
    bot: Bot,
    dialogue: QuizDialogue,
    mut session: GameSession,
    msg: Message,
) -> HandlerResult {
    let expected = continue_label(&session);
    if msg.text().map(str::trim) != Some(expected) {
        // Show the round's feedback again along with the button
        if let Some(feedback) = session.last_feedback() {
            send_feedback(&bot, msg.chat.id, &session, feedback).await?;
        }
        return Ok(());
    }

    let advance = session.acknowledge(&mut rand::thread_rng())?;
    match advance {
        Advance::NextRound(question) => {
            send_question(&bot, msg.chat.id, &session, &question).await?;
            dialogue
                .update(State::Playing {
                    session,
                    asked_at: Utc::now(),
                })
                .await?;
        }
        Advance::Finished(summary) => {
            let config = session.config();
            // Fire and forget: the summary is shown whatever happens to the upload
            sink.submit(GameReport::new(config.clone(), summary.clone()));

            bot.send_message(msg.chat.id, summary.render(config.end_summary))
                .reply_markup(keyboard(&[NEW_GAME]))
                .await?;
            dialogue.update(State::GameOver).await?;
        }
    }
    Ok(())
}

async fn game_over(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    if msg.text().map(str::trim) == Some(NEW_GAME) {
        return begin_setup(&bot, &dialogue, msg.chat.id).await;
    }
    bot.send_message(msg.chat.id, format!("Press \"{}\" to play again", NEW_GAME))
        .reply_markup(keyboard(&[NEW_GAME]))
        .await?;
    Ok(())
}
