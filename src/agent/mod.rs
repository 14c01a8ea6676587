pub mod client;
pub mod tools;

pub use client::{AgentError, ChatProvider, HttpChatProvider};

use log::{info, warn};

use crate::game::arbiter::MoveArbiter;
use crate::game::utils::color_to_string;
use crate::models::{ChatMessage, ChatRequest, Seat};

const SYSTEM_PROMPT: &str = "You are a chess player. Use the provided tools to inspect the \
position, then play the strongest move you can find. Always finish your turn by calling \
submit_move with a legal move.";

/// How the agent's turn put its ply on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentOutcome {
    /// The model called `submit_move` with a legal move.
    Submitted(String),
    /// The round cap expired or the provider failed; the first legal move
    /// was committed instead.
    Fallback(String),
    /// No move could be committed at all. Only reachable on a dead
    /// position, which the session never opens a turn on.
    Stalled,
}

/// Drives one agent turn at a time against a [`ChatProvider`].
pub struct AgentPlayer<P> {
    provider: P,
    model: String,
}

impl<P: ChatProvider> AgentPlayer<P> {
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        AgentPlayer {
            provider,
            model: model.into(),
        }
    }

    /// Run one agent turn, bounded by `round_cap` provider rounds.
    ///
    /// Exactly one ply is committed by the time this returns: either a move
    /// the model submitted, or the deterministic fallback.
    pub fn play_turn(&self, arbiter: &mut MoveArbiter, round_cap: u32) -> AgentOutcome {
        let mut messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "You play {}. It is your turn at ply {}. Inspect the position with the \
                 tools, then submit exactly one move with {}.",
                color_to_string(arbiter.color_of(Seat::Agent)),
                arbiter.ply_count() + 1,
                tools::SUBMIT_MOVE,
            )),
        ];
        let tool_defs = tools::tool_defs();

        for round in 0..round_cap {
            let request = ChatRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                tools: tool_defs.clone(),
            };
            let assistant = match self.provider.complete(&request) {
                Ok(message) => message,
                Err(e) => {
                    warn!("agent round {} failed: {}", round + 1, e);
                    break;
                }
            };

            messages.push(ChatMessage::assistant(&assistant));
            if assistant.tool_calls.is_empty() {
                // Plain text moves no piece; point the model back at the tool.
                messages.push(ChatMessage::user(format!(
                    "Submit your move by calling the {} tool.",
                    tools::SUBMIT_MOVE
                )));
                continue;
            }

            for call in &assistant.tool_calls {
                let outcome = tools::dispatch(arbiter, &call.function.name, &call.function.arguments);
                messages.push(ChatMessage::tool(call.id.as_str(), outcome.reply.as_str()));
                if let Some(played) = outcome.committed {
                    return AgentOutcome::Submitted(played);
                }
            }
        }

        self.fallback(arbiter)
    }

    /// Round cap spent or provider down: commit the first legal move so the
    /// session always progresses.
    fn fallback(&self, arbiter: &mut MoveArbiter) -> AgentOutcome {
        let Some(fallback) = arbiter.legal_moves().into_iter().next() else {
            warn!("no legal move available for fallback");
            return AgentOutcome::Stalled;
        };
        if let Err(e) = arbiter.apply_move(Seat::Agent, &fallback) {
            warn!("fallback move {} rejected: {}", fallback, e);
            return AgentOutcome::Stalled;
        }
        info!("agent round cap spent, falling back to {}", fallback);
        AgentOutcome::Fallback(fallback)
    }
}
