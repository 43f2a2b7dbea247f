//! Rules and simulation sessions.

pub mod history;
pub mod rule;
mod session;
pub mod stability;

pub use history::History;
pub use session::Session;
pub use stability::{check_stability, Stability};
