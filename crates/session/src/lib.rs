//! Session layer for tui-2048.
//!
//! Drives the core engine and move projector through explicit turns and owns
//! the command queue that input producers feed.

pub mod config;
pub mod queue;
pub mod session;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

pub use config::SessionConfig;
pub use queue::{command_queue, CommandQueue, CommandSender};
pub use session::{Flow, RestoreOutcome, Session, TickOutcome, TurnPhase, TurnReport};
