pub mod arbiter;
pub mod utils;
