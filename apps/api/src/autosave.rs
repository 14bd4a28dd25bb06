//! Autosave state machine — the concurrency guard between local edits and
//! tool-driven mutations.
//!
//! Tools persist their changes directly, so an autosave computed from
//! pre-tool in-memory state would silently revert them. The guard is one
//! transition: when a turn reports any successful tool mutation, a pending
//! autosave is cancelled and the document is re-fetched before edit tracking
//! resumes. Applied once per turn, not once per tool call.
//!
//! The machine is pure: `apply` maps (state, event) to (state, effect) and
//! the host performs the effect. This is the reference implementation clients
//! are expected to mirror; the server ships it so both sides agree on the
//! exact transition table.

// Reference transition table for clients; not wired into request handling.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutosaveState {
    /// Local state matches storage; no timer pending.
    Clean,
    /// Local edits exist; a save timer is scheduled.
    Dirty,
    /// A save request is in flight.
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveEvent {
    /// The user changed the local document.
    Edit,
    /// The scheduled save timer fired.
    TimerFired,
    /// A chat turn finished with `mutated: true`.
    ToolMutationObserved,
    /// The in-flight save request finished (success or failure alike — a
    /// failed save leaves storage unchanged, so the document is re-marked
    /// dirty by the next edit, not retried blindly).
    SaveCompleted,
}

/// What the host must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Schedule (or reset) the debounce timer.
    ScheduleTimer,
    /// Push local state to storage.
    BeginSave,
    /// Drop the pending timer and re-read authoritative state from storage
    /// before tracking further edits.
    CancelTimerAndRefetch,
}

/// One step of the machine.
pub fn apply(state: AutosaveState, event: AutosaveEvent) -> (AutosaveState, Effect) {
    use AutosaveEvent::*;
    use AutosaveState::*;

    match (state, event) {
        (Clean, Edit) => (Dirty, Effect::ScheduleTimer),
        // Each edit restarts the debounce window.
        (Dirty, Edit) => (Dirty, Effect::ScheduleTimer),
        (Dirty, TimerFired) => (Saving, Effect::BeginSave),
        (Saving, SaveCompleted) => (Clean, Effect::None),
        // An edit during an in-flight save supersedes it: back to dirty with
        // a fresh timer, and the stale SaveCompleted is ignored on arrival.
        (Saving, Edit) => (Dirty, Effect::ScheduleTimer),

        // The guard: an out-of-band mutation invalidates pending local
        // state in every phase.
        (Dirty, ToolMutationObserved) => (Clean, Effect::CancelTimerAndRefetch),
        (Saving, ToolMutationObserved) => (Clean, Effect::CancelTimerAndRefetch),
        (Clean, ToolMutationObserved) => (Clean, Effect::CancelTimerAndRefetch),

        // Stale timer or save signals in other states change nothing.
        (Clean, TimerFired) | (Dirty, SaveCompleted) | (Clean, SaveCompleted) => {
            (state, Effect::None)
        }
        (Saving, TimerFired) => (Saving, Effect::None),
    }
}
