//! Shared conversation state.
//!
//! One [`Session`] exists per connection, read and written by both the
//! receiver task and the command dispatcher. Every operation - including the
//! compound switch and restore rules - runs under a single interior lock, so
//! neither task ever observes a torn intermediate state. No I/O happens while
//! the lock is held.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Result of applying the target-switch rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSwitch {
    /// The target became the current conversation (displacing any previous
    /// one onto the history stack).
    Opened,

    /// The target was already the current conversation; state untouched.
    AlreadyActive,
}

/// Result of applying the target-restore rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndDisposition {
    /// The peer was the current target; the most recently displaced
    /// conversation was restored.
    ReturnedTo(String),

    /// The peer was the current target and no previous conversation existed;
    /// conversation mode ended.
    Cleared,

    /// The peer was not the current target; reported only, state untouched.
    NotCurrent,
}

/// Mutable session record guarded by the lock.
#[derive(Debug, Default)]
struct State {
    /// True from handshake acceptance until any fatal I/O event.
    alive: bool,
    /// Name accepted by the relay; set exactly once.
    display_name: Option<String>,
    /// Peer currently conversed with. `None` outside conversation mode.
    current_target: Option<String>,
    /// Displaced targets, most recent on top.
    target_history: Vec<String>,
}

/// Lock-guarded session state shared between the receiver task and the
/// command dispatcher.
///
/// Only synchronized accessors are exposed; the raw fields never leave the
/// lock. Mutations are linearizable, which is the only cross-task ordering
/// the engine relies on.
#[derive(Debug, Default)]
pub struct Session {
    state: Mutex<State>,
}

impl Session {
    /// Create a session with no conversational state, not yet alive.
    pub fn new() -> Self {
        Self::default()
    }

    /// A poisoned lock only means a panicked test thread; the state itself
    /// is always valid, so recover the guard.
    fn guard(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the accepted display name and mark the session alive.
    ///
    /// Called once, by the handshake, on acceptance.
    pub fn activate(&self, name: &str) {
        let mut state = self.guard();
        debug_assert!(state.display_name.is_none(), "display name is set exactly once");
        if state.display_name.is_none() {
            state.display_name = Some(name.to_string());
        }
        state.alive = true;
    }

    /// Whether the connection is still usable.
    pub fn is_alive(&self) -> bool {
        self.guard().alive
    }

    /// Flip to not-alive and drop all conversational state.
    ///
    /// A dead session carries no current target and no history.
    pub fn mark_dead(&self) {
        let mut state = self.guard();
        state.alive = false;
        state.current_target = None;
        state.target_history.clear();
    }

    /// Display name accepted by the relay. `None` before handshake success.
    pub fn display_name(&self) -> Option<String> {
        self.guard().display_name.clone()
    }

    /// Current conversation target. `None` outside conversation mode.
    pub fn current_target(&self) -> Option<String> {
        self.guard().current_target.clone()
    }

    /// Snapshot of the history stack, most recent last.
    pub fn target_history(&self) -> Vec<String> {
        self.guard().target_history.clone()
    }

    /// Target-switch rule: make `target` the current conversation.
    ///
    /// A different displaced target is pushed onto the history; reopening the
    /// already-active target is a state no-op. An entry equal to the new
    /// current target is therefore never pushed.
    pub fn open_target(&self, target: &str) -> TargetSwitch {
        let mut state = self.guard();
        if state.current_target.as_deref() == Some(target) {
            return TargetSwitch::AlreadyActive;
        }
        if let Some(prev) = state.current_target.replace(target.to_string()) {
            state.target_history.push(prev);
        }
        TargetSwitch::Opened
    }

    /// Target-restore rule: the conversation with `peer` is over.
    ///
    /// If `peer` is the current target, the top of the history (if any)
    /// becomes current again; otherwise conversation mode ends. If `peer` is
    /// not current, nothing changes. Used identically for peer-initiated END,
    /// unavailability errors, and locally-initiated END.
    pub fn close_target(&self, peer: &str) -> EndDisposition {
        let mut state = self.guard();
        if state.current_target.as_deref() != Some(peer) {
            return EndDisposition::NotCurrent;
        }
        match state.target_history.pop() {
            Some(back) => {
                state.current_target = Some(back.clone());
                EndDisposition::ReturnedTo(back)
            },
            None => {
                state.current_target = None;
                EndDisposition::Cleared
            },
        }
    }
}
