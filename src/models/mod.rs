//! Data models for the Grail item tracker.
//!
//! Wire names match what the front-end and the static catalog file already use.

mod found;
mod item;
mod leaderboard;
mod user;

pub use found::*;
pub use item::*;
pub use leaderboard::*;
pub use user::*;
