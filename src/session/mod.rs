use std::io::{self, BufRead, Write};

use chess::Color;
use log::{info, warn};
use uuid::Uuid;

use crate::agent::{AgentOutcome, AgentPlayer, ChatProvider};
use crate::game::arbiter::MoveArbiter;
use crate::game::utils::{color_to_string, render_board};
use crate::models::{Seat, SessionConfig, TerminationReason};

pub const PROMPT: &str = "Input your move. Input 'help' to list legal moves. Input 'quit' to resign.";

/// One interactive game between the human and the automated agent.
///
/// Generic over input and output so whole sessions can be driven from tests.
pub struct Session<P> {
    id: String,
    config: SessionConfig,
    arbiter: MoveArbiter,
    agent: AgentPlayer<P>,
}

impl<P: ChatProvider> Session<P> {
    pub fn new(config: SessionConfig, agent: AgentPlayer<P>) -> Self {
        Session {
            id: Uuid::new_v4().to_string(),
            arbiter: MoveArbiter::new(config.agent_color),
            config,
            agent,
        }
    }

    pub fn arbiter(&self) -> &MoveArbiter {
        &self.arbiter
    }

    /// Play the game to completion and report why it ended.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<TerminationReason> {
        info!(
            "session {} started, agent plays {}",
            self.id,
            color_to_string(self.config.agent_color)
        );
        writeln!(
            output,
            "You play {}. The agent plays {}.",
            color_to_string(self.arbiter.color_of(Seat::Human)),
            color_to_string(self.config.agent_color)
        )?;
        self.render(output)?;

        // Whichever seat holds white opens the game.
        let mut turn = if self.config.agent_color == Color::White {
            Seat::Agent
        } else {
            Seat::Human
        };

        loop {
            match turn {
                Seat::Agent => {
                    match self.agent.play_turn(&mut self.arbiter, self.config.round_cap) {
                        AgentOutcome::Submitted(played) | AgentOutcome::Fallback(played) => {
                            writeln!(output, "Agent plays {}.", played)?;
                        }
                        AgentOutcome::Stalled => warn!("agent turn committed no move"),
                    }
                }
                Seat::Human => {
                    if !self.human_turn(input, output)? {
                        info!("session {} ended: user quit", self.id);
                        return Ok(TerminationReason::UserQuit);
                    }
                }
            }

            self.render(output)?;
            if let Some(reason) = self.arbiter.termination() {
                writeln!(output, "Game over: {}.", reason)?;
                info!("session {} ended: {}", self.id, reason);
                return Ok(reason);
            }
            turn = turn.opponent();
        }
    }

    /// Prompt until the human commits a ply. Returns false on quit or EOF.
    fn human_turn<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<bool> {
        loop {
            writeln!(output, "{}", PROMPT)?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // EOF counts as quitting.
                return Ok(false);
            }
            let text = line.trim();

            if text.eq_ignore_ascii_case("quit") {
                return Ok(false);
            }
            if text.eq_ignore_ascii_case("help") {
                writeln!(output, "Legal moves: {}", self.arbiter.legal_moves().join(" "))?;
                continue;
            }
            match self.arbiter.apply_move(Seat::Human, text) {
                Ok(()) => return Ok(true),
                Err(e) => writeln!(output, "{}", e)?,
            }
        }
    }

    fn render<W: Write>(&self, output: &mut W) -> io::Result<()> {
        writeln!(output, "Ply {}:", self.arbiter.ply_count())?;
        write!(
            output,
            "{}",
            render_board(
                &self.arbiter.current_position(),
                self.arbiter.color_of(Seat::Human)
            )
        )
    }
}
