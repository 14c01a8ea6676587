pub mod agent;
pub mod game;
pub mod models;
pub mod session;
