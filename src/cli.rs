//! Top-level run commands and pause/resume semantics.
//!
//! A `Command` is produced by translating raw `InputSource` events; kept
//! separate from `renderer.rs` so the mapping from "key pressed" to
//! "action taken" can be tested without a live `InputSource`.

use crate::scheduler::Scheduler;

/// An action the run loop takes outside of normal frame advancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a fresh run from the configuration on disk.
    New,
    /// Restart the current run from its initial configuration.
    Restart,
    /// Exit the process.
    Exit,
}

/// Maps a raw key press to a `Command`, if it corresponds to one.
pub fn command_for_key(key: char) -> Option<Command> {
    match key {
        'n' | 'N' => Some(Command::New),
        'r' | 'R' => Some(Command::Restart),
        'q' | 'Q' => Some(Command::Exit),
        _ => None,
    }
}

/// Toggles pause state on a `Space` press. Resuming clears any
/// accumulated lag by handing the caller `true`, signalling it should
/// reset its frame-timing anchor rather than let a paused interval's
/// elapsed time flood in as a catch-up burst.
pub fn toggle_pause(key: char, scheduler: &mut Scheduler) -> bool {
    if key != ' ' {
        return false;
    }
    let resuming = scheduler.is_paused();
    scheduler.set_paused(!scheduler.is_paused());
    resuming
}
