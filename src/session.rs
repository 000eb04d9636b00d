//! Engine session state.
//!
//! Exactly one session is live at a time. It is created on enable, reset on
//! disable or project switch, and written only by the lifecycle controller.
//! Its generation ticket is the staleness guard for every asynchronous
//! continuation in the enable flow.

use interstitch_common::{EntryId, Generation, ProjectId, Ticket};
use serde::{Deserialize, Serialize};

/// Lifecycle status of the interactive layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Disabled,
    Loading,
    Enabled,
    Error,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::Loading => write!(f, "loading"),
            Self::Enabled => write!(f, "enabled"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The single live session of the interactive layer.
#[derive(Debug)]
pub struct EngineSession {
    /// Project the session is for, while not disabled.
    pub project: Option<ProjectId>,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Segment order the engine currently plays, once known.
    pub current_order: Option<u32>,
    /// Entry requested by the engine before the project started.
    pub pending_target: Option<EntryId>,
    /// Whether the engine has reported `project:start`.
    pub project_started: bool,
    generation: Generation,
}

impl EngineSession {
    /// Create a fresh, disabled session.
    pub fn new() -> Self {
        Self {
            project: None,
            status: SessionStatus::Disabled,
            current_order: None,
            pending_target: None,
            project_started: false,
            generation: Generation::new(),
        }
    }

    /// Begin loading a project. Advances the generation so every in-flight
    /// continuation from a previous project goes stale.
    pub fn begin(&mut self, project: ProjectId) -> Ticket {
        self.project = Some(project);
        self.status = SessionStatus::Loading;
        self.current_order = None;
        self.pending_target = None;
        self.project_started = false;
        self.generation.advance()
    }

    /// Transition to enabled.
    pub fn mark_enabled(&mut self) {
        self.status = SessionStatus::Enabled;
    }

    /// Transition to the terminal error state.
    pub fn mark_error(&mut self) {
        self.status = SessionStatus::Error;
    }

    /// Reset to disabled, advancing the generation so continuations from
    /// the torn-down session can never mutate a fresh one.
    pub fn reset(&mut self) {
        self.project = None;
        self.status = SessionStatus::Disabled;
        self.current_order = None;
        self.pending_target = None;
        self.project_started = false;
        self.generation.advance();
    }

    /// Whether a ticket captured earlier still refers to this session.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.is_current(ticket)
    }

    /// Whether the layer is fully enabled.
    pub fn is_enabled(&self) -> bool {
        self.status == SessionStatus::Enabled
    }

    /// Whether the layer is active (loading or enabled).
    pub fn is_active(&self) -> bool {
        matches!(self.status, SessionStatus::Loading | SessionStatus::Enabled)
    }
}

impl Default for EngineSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_advances_generation() {
        let mut session = EngineSession::new();
        let first = session.begin(ProjectId::from("a"));
        assert_eq!(session.status, SessionStatus::Loading);
        assert!(session.is_current(first));

        let second = session.begin(ProjectId::from("b"));
        assert!(!session.is_current(first));
        assert!(session.is_current(second));
    }

    #[test]
    fn test_reset_invalidates_tickets_and_clears_state() {
        let mut session = EngineSession::new();
        let ticket = session.begin(ProjectId::from("a"));
        session.pending_target = Some(EntryId::from("e1"));
        session.mark_enabled();

        session.reset();
        assert_eq!(session.status, SessionStatus::Disabled);
        assert!(session.project.is_none());
        assert!(session.pending_target.is_none());
        assert!(!session.is_current(ticket));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SessionStatus::Loading.to_string(), "loading");
        assert_eq!(SessionStatus::Error.to_string(), "error");
    }
}
