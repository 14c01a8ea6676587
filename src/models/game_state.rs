use chess::Game;
use std::collections::HashMap;

/// Authoritative position plus everything the draw rules need to see.
///
/// Owned exclusively by the arbiter; nothing else holds a mutable
/// reference to it.
pub struct GameState {
    pub game: Game,
    /// Committed plies in coordinate notation, oldest first.
    pub history: Vec<String>,
    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u32,
    /// Occurrence count per position hash, for repetition detection.
    pub repetitions: HashMap<u64, u32>,
}

impl GameState {
    pub fn new() -> Self {
        Self::from_game(Game::new())
    }

    pub fn from_game(game: Game) -> Self {
        let mut repetitions = HashMap::new();
        repetitions.insert(game.current_position().get_hash(), 1);
        GameState {
            game,
            history: Vec::new(),
            halfmove_clock: 0,
            repetitions,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
