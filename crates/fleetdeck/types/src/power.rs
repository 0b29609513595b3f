//! Power-state vocabulary.
//!
//! `ObservedState` is what the provider reports; `PowerTarget` is what a
//! user-requested transition is driving toward. The cached `status` on a
//! record is a belief and is only reconciled against observations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The power state the remote provider currently reports for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservedState {
    Running,
    Stopped,
    /// The provider reported something other than running/stopped, or the
    /// instance was absent from the listing. Inconclusive.
    Unknown,
}

impl ObservedState {
    /// Map a raw provider status string onto the local vocabulary.
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "running" => Self::Running,
            "stopped" => Self::Stopped,
            _ => Self::Unknown,
        }
    }

    /// Conclusive running/stopped as a boolean; `Unknown` yields `None`.
    pub fn as_running(self) -> Option<bool> {
        match self {
            Self::Running => Some(true),
            Self::Stopped => Some(false),
            Self::Unknown => None,
        }
    }

    /// Whether this observation confirms the given target state.
    ///
    /// `Unknown` confirms nothing.
    pub fn matches(self, target: PowerTarget) -> bool {
        self.as_running() == Some(target.as_running())
    }
}

impl fmt::Display for ObservedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// The state a requested power transition is driving toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerTarget {
    On,
    Off,
}

impl PowerTarget {
    /// The implicit toggle target: the inverse of the current cached status.
    pub fn from_current(running: bool) -> Self {
        if running {
            Self::Off
        } else {
            Self::On
        }
    }

    pub fn as_running(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::On => "on",
            Self::Off => "off",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_provider_mapping() {
        assert_eq!(ObservedState::from_provider("running"), ObservedState::Running);
        assert_eq!(ObservedState::from_provider("stopped"), ObservedState::Stopped);
        assert_eq!(ObservedState::from_provider("restarting"), ObservedState::Unknown);
        assert_eq!(ObservedState::from_provider(""), ObservedState::Unknown);
    }

    #[test]
    fn test_unknown_confirms_nothing() {
        assert!(!ObservedState::Unknown.matches(PowerTarget::On));
        assert!(!ObservedState::Unknown.matches(PowerTarget::Off));
        assert_eq!(ObservedState::Unknown.as_running(), None);
    }

    #[test]
    fn test_toggle_target_is_inverse() {
        assert_eq!(PowerTarget::from_current(true), PowerTarget::Off);
        assert_eq!(PowerTarget::from_current(false), PowerTarget::On);
        assert!(ObservedState::Running.matches(PowerTarget::On));
        assert!(ObservedState::Stopped.matches(PowerTarget::Off));
    }
}
