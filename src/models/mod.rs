pub mod game_state;
pub mod messages;
pub mod session;

// Re-export important types
pub use game_state::*;
pub use messages::*;
pub use session::*;
