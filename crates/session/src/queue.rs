//! Command queue between input producers and the session.
//!
//! Producers hold a cloneable [`CommandSender`] and may enqueue at any time,
//! from any task. The session owns the [`CommandQueue`] and takes at most one
//! command per turn.

use std::collections::VecDeque;

use tokio::sync::mpsc;
use tracing::debug;

use crate::types::Command;

/// Producer half of the command queue
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandSender {
    /// Enqueue a command; returns false if the queue was dropped
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }
}

/// Consumer half of the command queue
#[derive(Debug)]
pub struct CommandQueue {
    rx: mpsc::UnboundedReceiver<Command>,
    pending: VecDeque<Command>,
}

/// Create a connected sender/queue pair
pub fn command_queue() -> (CommandSender, CommandQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        CommandSender { tx },
        CommandQueue {
            rx,
            pending: VecDeque::new(),
        },
    )
}

impl CommandQueue {
    fn drain_incoming(&mut self) {
        while let Ok(cmd) = self.rx.try_recv() {
            self.pending.push_back(cmd);
        }
    }

    /// Number of commands waiting
    pub fn len(&mut self) -> usize {
        self.drain_incoming();
        self.pending.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Take the next command for the session.
    ///
    /// When `busy` (a turn is still animating) only `NewGame` or `Quit` are
    /// taken; directional commands queued ahead of one are discarded with
    /// the game they were meant for. Otherwise commands come out in order.
    pub fn next(&mut self, busy: bool) -> Option<Command> {
        self.drain_incoming();
        if !busy {
            return self.pending.pop_front();
        }

        let pos = self
            .pending
            .iter()
            .position(|c| matches!(c, Command::NewGame | Command::Quit))?;
        if pos > 0 {
            debug!(dropped = pos, "discarding inputs superseded while animating");
        }
        self.pending.drain(..pos);
        self.pending.pop_front()
    }
}
