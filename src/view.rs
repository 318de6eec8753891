//! Terminal rendering of the conversation
//!
//! Rendering is a pure function of the turns and the controller state; the
//! [`TerminalView`] subscribes to change notifications and redraws whatever is
//! new.

use std::io::{self, Write};

use tokio::sync::oneshot;

use crate::{
    controller::{ConversationController, ConversationState},
    models::{Recommendation, Turn, MAX_STARS},
};

pub const EMPTY_PROMPT: &str = "What kind of shows or movies are you in the mood for today?";
pub const EXAMPLE_PROMPT: &str =
    "Try something like \"I want to watch a sci-fi movie from the 80s\"";
pub const SENDING_INDICATOR: &str = "Sending...";
pub const RECOMMENDATIONS_HEADING: &str = "Recommended for you:";

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';

/// Five-star bar with `filled` stars lit
pub fn star_bar(filled: u8) -> String {
    let filled = filled.min(MAX_STARS);
    (0..MAX_STARS)
        .map(|i| if i < filled { FILLED_STAR } else { EMPTY_STAR })
        .collect()
}

pub fn render_recommendation(recommendation: &Recommendation) -> String {
    format!(
        "  {}\n    {} {}\n    {} · {}",
        recommendation.title,
        star_bar(recommendation.filled_stars()),
        recommendation.rating_label(),
        recommendation.year,
        recommendation.genre,
    )
}

fn role_label(turn: &Turn) -> &'static str {
    if turn.is_user() {
        "You"
    } else {
        "Assistant"
    }
}

/// Decodes one raw input line, replacing invalid UTF-8 and dropping the line ending
pub fn decode_input_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Renders one turn: label, one line per paragraph, then recommendation cards
pub fn render_turn(turn: &Turn) -> String {
    let mut lines = vec![format!("{}:", role_label(turn))];
    lines.extend(turn.paragraphs().map(|p| format!("  {}", p)));

    if let Some(recommendations) = turn.recommendations() {
        lines.push(String::new());
        lines.push(RECOMMENDATIONS_HEADING.to_string());
        lines.extend(recommendations.iter().map(render_recommendation));
    }

    lines.join("\n")
}

/// Renders a whole conversation, or the greeting when it is empty
pub fn render_conversation(turns: &[Turn]) -> String {
    if turns.is_empty() {
        return format!("{}\n{}", EMPTY_PROMPT, EXAMPLE_PROMPT);
    }

    turns
        .iter()
        .map(render_turn)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Writes new turns and the in-flight indicator as the conversation changes
pub struct TerminalView<W> {
    controller: ConversationController,
    out: W,
    rendered: usize,
}

impl<W: Write> TerminalView<W> {
    pub fn new(controller: ConversationController, out: W) -> Self {
        Self {
            controller,
            out,
            rendered: 0,
        }
    }

    /// Writes every turn appended since the last call
    pub async fn render_pending(&mut self) -> io::Result<()> {
        let turns = self.controller.turns_from(self.rendered).await;
        if turns.is_empty() {
            return Ok(());
        }

        for turn in &turns {
            writeln!(self.out, "{}\n", render_turn(turn))?;
        }
        self.rendered += turns.len();
        self.out.flush()
    }

    /// Redraws on every notification until `shutdown` fires, then flushes
    /// whatever is left. Hands the writer back.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> io::Result<W> {
        let mut turns_rx = self.controller.subscribe_turns().await;
        let mut state_rx = self.controller.subscribe_state();

        if self.controller.is_empty().await {
            writeln!(self.out, "{}\n", render_conversation(&[]))?;
            self.out.flush()?;
        }

        loop {
            tokio::select! {
                changed = turns_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.render_pending().await?;
                }
                changed = state_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.render_pending().await?;
                    if *state_rx.borrow_and_update() == ConversationState::Sending {
                        writeln!(self.out, "{}", SENDING_INDICATOR)?;
                        self.out.flush()?;
                    }
                }
                _ = &mut shutdown => {
                    self.render_pending().await?;
                    break;
                }
            }
        }

        Ok(self.out)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
