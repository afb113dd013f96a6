//! TUI 2048 (workspace facade crate).
//!
//! Re-exports `tui_2048::{core,session,input,types}` while the implementation
//! lives in dedicated crates under `crates/`.

pub use tui_2048_core as core;
pub use tui_2048_input as input;
pub use tui_2048_session as session;
pub use tui_2048_types as types;
