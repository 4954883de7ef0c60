//! Outcome of a duplicate-reply check.

/// Decision made by the suppressor for one candidate reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressionDecision {
    /// Send the reply; it has been remembered in the current window
    Allow,
    /// Withhold the reply; a near-duplicate was already sent
    Suppress,
}

impl SuppressionDecision {
    /// Check if this decision is Allow.
    pub fn is_allow(&self) -> bool {
        matches!(self, SuppressionDecision::Allow)
    }

    /// Check if this decision is Suppress.
    pub fn is_suppress(&self) -> bool {
        matches!(self, SuppressionDecision::Suppress)
    }
}

impl From<bool> for SuppressionDecision {
    /// `true` means "suppress", matching `should_suppress`.
    fn from(suppress: bool) -> Self {
        if suppress {
            SuppressionDecision::Suppress
        } else {
            SuppressionDecision::Allow
        }
    }
}
