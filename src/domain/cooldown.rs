// Manual charger cooldown state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownAction {
    Create,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownState {
    /// No status query has succeeded yet.
    Unknown,
    Inactive,
    Active,
    Pending(CooldownAction),
}

impl CooldownState {
    pub fn from_active(active: bool) -> Self {
        if active {
            CooldownState::Active
        } else {
            CooldownState::Inactive
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CooldownState::Pending(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CooldownState::Unknown => "unknown",
            CooldownState::Inactive => "inactive",
            CooldownState::Active => "active",
            CooldownState::Pending(CooldownAction::Create) => "pending-create",
            CooldownState::Pending(CooldownAction::Clear) => "pending-clear",
        }
    }
}

/// What the control displays: the state plus whether a round-trip is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownView {
    pub state: CooldownState,
    pub loading: bool,
}

impl CooldownView {
    pub fn unknown() -> Self {
        Self {
            state: CooldownState::Unknown,
            loading: false,
        }
    }

    /// Whether `action` may start from this view. Nothing starts while a
    /// round-trip is outstanding, and creating an active cooldown is a no-op.
    pub fn permits(&self, action: CooldownAction) -> bool {
        if self.loading || self.state.is_pending() {
            return false;
        }
        match action {
            CooldownAction::Create => self.state != CooldownState::Active,
            CooldownAction::Clear => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(state: CooldownState, loading: bool) -> CooldownView {
        CooldownView { state, loading }
    }

    #[test]
    fn test_create_is_guarded_when_active_or_busy() {
        assert!(!view(CooldownState::Active, false).permits(CooldownAction::Create));
        assert!(!view(CooldownState::Pending(CooldownAction::Create), true).permits(CooldownAction::Create));
        assert!(!view(CooldownState::Inactive, true).permits(CooldownAction::Create));
        assert!(view(CooldownState::Inactive, false).permits(CooldownAction::Create));
        assert!(view(CooldownState::Unknown, false).permits(CooldownAction::Create));
    }

    #[test]
    fn test_clear_waits_for_pending_action() {
        assert!(view(CooldownState::Active, false).permits(CooldownAction::Clear));
        assert!(!view(CooldownState::Pending(CooldownAction::Clear), true).permits(CooldownAction::Clear));
    }

    #[test]
    fn test_state_names() {
        assert_eq!(CooldownState::from_active(true).as_str(), "active");
        assert_eq!(CooldownState::from_active(false).as_str(), "inactive");
        assert_eq!(CooldownState::Pending(CooldownAction::Clear).as_str(), "pending-clear");
    }
}
