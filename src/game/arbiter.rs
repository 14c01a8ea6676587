use chess::{Board, ChessMove, Color, MoveGen, Piece};
use log::debug;
use std::str::FromStr;
use thiserror::Error;

use crate::game::utils::position_termination;
use crate::models::{GameState, Seat, TerminationReason};

/// Why a submitted move was rejected. The state is untouched either way.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArbiterError {
    #[error("not your turn")]
    WrongTurn,
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

/// Sole owner of [`GameState`]. Every read and every write goes through here,
/// so a move reaches the board only if it is legal and it is the submitting
/// seat's turn.
pub struct MoveArbiter {
    state: GameState,
    agent_color: Color,
}

impl MoveArbiter {
    pub fn new(agent_color: Color) -> Self {
        MoveArbiter {
            state: GameState::new(),
            agent_color,
        }
    }

    /// Referee a game starting from an arbitrary position. The halfmove
    /// clock and repetition table start fresh, so positions are built with
    /// zeroed counters.
    #[cfg(test)]
    pub(crate) fn from_game(game: chess::Game, agent_color: Color) -> Self {
        MoveArbiter {
            state: GameState::from_game(game),
            agent_color,
        }
    }

    pub fn color_of(&self, seat: Seat) -> Color {
        match seat {
            Seat::Agent => self.agent_color,
            Seat::Human => !self.agent_color,
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.state.game.side_to_move()
    }

    /// True iff it is `seat`'s turn. Exactly one seat satisfies this.
    pub fn is_current_turn(&self, seat: Seat) -> bool {
        self.color_of(seat) == self.side_to_move()
    }

    pub fn current_position(&self) -> Board {
        self.state.game.current_position()
    }

    pub fn ply_count(&self) -> usize {
        self.state.history.len()
    }

    /// All plies played so far, in order.
    pub fn move_history(&self) -> &[String] {
        &self.state.history
    }

    /// All legal moves in the current position, in coordinate notation.
    pub fn legal_moves(&self) -> Vec<String> {
        let board = self.current_position();
        MoveGen::new_legal(&board).map(|m| m.to_string()).collect()
    }

    /// Legal moves that capture an opposing piece, en passant included.
    pub fn possible_captures(&self) -> Vec<String> {
        let board = self.current_position();
        MoveGen::new_legal(&board)
            .filter(|m| is_capture(&board, *m))
            .map(|m| m.to_string())
            .collect()
    }

    /// Legal moves that leave the opponent in check.
    pub fn possible_checks(&self) -> Vec<String> {
        let board = self.current_position();
        MoveGen::new_legal(&board)
            .filter(|m| board.make_move_new(*m).checkers().popcnt() > 0)
            .map(|m| m.to_string())
            .collect()
    }

    /// Validate and commit one ply for `seat`.
    ///
    /// `move_text` may be SAN (`Nf3`) or coordinate notation (`g1f3`).
    pub fn apply_move(&mut self, seat: Seat, move_text: &str) -> Result<(), ArbiterError> {
        if !self.is_current_turn(seat) {
            return Err(ArbiterError::WrongTurn);
        }

        let board = self.current_position();
        let chess_move = parse_move(&board, move_text)
            .ok_or_else(|| ArbiterError::IllegalMove(move_text.to_string()))?;
        if !MoveGen::new_legal(&board).any(|m| m == chess_move) {
            return Err(ArbiterError::IllegalMove(move_text.to_string()));
        }

        let resets_clock =
            is_capture(&board, chess_move) || board.piece_on(chess_move.get_source()) == Some(Piece::Pawn);

        self.state.game.make_move(chess_move);
        self.state.history.push(chess_move.to_string());
        self.state.halfmove_clock = if resets_clock {
            0
        } else {
            self.state.halfmove_clock + 1
        };
        let hash = self.state.game.current_position().get_hash();
        *self.state.repetitions.entry(hash).or_insert(0) += 1;

        debug!("committed {} for {:?}", chess_move, seat);
        Ok(())
    }

    /// Why the game is over, if it is. Recomputed after every committed ply.
    pub fn termination(&self) -> Option<TerminationReason> {
        if let Some(reason) = position_termination(&self.current_position()) {
            return Some(reason);
        }
        if self.state.halfmove_clock >= 100 {
            return Some(TerminationReason::MoveLimitDraw);
        }
        if self.state.repetitions.values().any(|&count| count >= 3) {
            return Some(TerminationReason::RepetitionDraw);
        }
        None
    }
}

/// Accept SAN first, then coordinate notation, against the given position.
fn parse_move(board: &Board, move_text: &str) -> Option<ChessMove> {
    ChessMove::from_san(board, move_text)
        .ok()
        .or_else(|| ChessMove::from_str(move_text).ok())
}

/// Destination occupied, or a pawn changing file onto an empty square.
fn is_capture(board: &Board, chess_move: ChessMove) -> bool {
    if board.piece_on(chess_move.get_dest()).is_some() {
        return true;
    }
    board.piece_on(chess_move.get_source()) == Some(Piece::Pawn)
        && chess_move.get_source().get_file() != chess_move.get_dest().get_file()
}
