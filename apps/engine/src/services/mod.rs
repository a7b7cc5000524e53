pub mod game_flow;
pub mod scheduler;

pub use game_flow::{AdvanceOutcome, GameFlow};
pub use scheduler::{ScheduledTask, SessionDriver, TaskKind};
