//! Application state and core logic

pub mod screen;
pub mod state;

pub use screen::AppCoordinator;
pub use state::{GameSession, Phase};
