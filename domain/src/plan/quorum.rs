//! Quorum rules for plan approval
//!
//! A rule decides whether the approvals gathered during deliberation are
//! enough to unblock a plan. The denominator is always the fixed roster
//! size, never the count of non-abstaining advisors. An advisor that
//! abstains still weakens the plan's support.

use crate::core::DomainError;
use serde::{Deserialize, Serialize};

/// Rule deciding whether approvals clear the bar.
///
/// # Example
///
/// ```
/// use conclave_domain::plan::QuorumRule;
///
/// let rule = QuorumRule::Majority;
/// assert!(rule.is_satisfied(3, 5));
/// assert!(!rule.is_satisfied(2, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuorumRule {
    /// More than half of the roster must approve
    #[default]
    Majority,
    /// Every roster member must approve
    Unanimous,
    /// At least n roster members must approve
    AtLeast(usize),
}

impl QuorumRule {
    /// Check whether `approvals` out of `roster_size` satisfies the rule.
    pub fn is_satisfied(&self, approvals: usize, roster_size: usize) -> bool {
        if roster_size == 0 {
            return false;
        }
        match self {
            QuorumRule::Majority => approvals > roster_size / 2,
            QuorumRule::Unanimous => approvals == roster_size,
            QuorumRule::AtLeast(n) => approvals >= *n,
        }
    }

    /// Minimum approvals needed for a roster of the given size.
    pub fn min_approvals(&self, roster_size: usize) -> usize {
        match self {
            QuorumRule::Majority => roster_size / 2 + 1,
            QuorumRule::Unanimous => roster_size,
            QuorumRule::AtLeast(n) => *n,
        }
    }

    pub fn description(&self) -> String {
        match self {
            QuorumRule::Majority => "majority (more than half of the roster)".to_string(),
            QuorumRule::Unanimous => "unanimous (full roster)".to_string(),
            QuorumRule::AtLeast(n) => format!("at least {} approvals", n),
        }
    }
}

impl std::fmt::Display for QuorumRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for QuorumRule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "majority" => Ok(QuorumRule::Majority),
            "unanimous" => Ok(QuorumRule::Unanimous),
            lowered if lowered.starts_with("atleast:") || lowered.starts_with("at_least:") => {
                lowered
                    .split(':')
                    .nth(1)
                    .and_then(|n| n.parse().ok())
                    .map(QuorumRule::AtLeast)
                    .ok_or_else(|| DomainError::InvalidQuorumRule(s.to_string()))
            }
            _ => Err(DomainError::InvalidQuorumRule(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_boundaries() {
        let rule = QuorumRule::Majority;

        // 5-member roster: need 3
        assert!(!rule.is_satisfied(2, 5));
        assert!(rule.is_satisfied(3, 5));
        assert!(rule.is_satisfied(5, 5));

        // 4-member roster: need 3
        assert!(!rule.is_satisfied(2, 4));
        assert!(rule.is_satisfied(3, 4));
    }

    #[test]
    fn test_unanimous() {
        let rule = QuorumRule::Unanimous;
        assert!(!rule.is_satisfied(4, 5));
        assert!(rule.is_satisfied(5, 5));
    }

    #[test]
    fn test_at_least() {
        let rule = QuorumRule::AtLeast(2);
        assert!(!rule.is_satisfied(1, 5));
        assert!(rule.is_satisfied(2, 5));
    }

    #[test]
    fn test_zero_roster_never_satisfied() {
        assert!(!QuorumRule::Majority.is_satisfied(0, 0));
        assert!(!QuorumRule::Unanimous.is_satisfied(0, 0));
        assert!(!QuorumRule::AtLeast(0).is_satisfied(0, 0));
    }

    #[test]
    fn test_min_approvals() {
        assert_eq!(QuorumRule::Majority.min_approvals(5), 3);
        assert_eq!(QuorumRule::Majority.min_approvals(4), 3);
        assert_eq!(QuorumRule::Unanimous.min_approvals(5), 5);
        assert_eq!(QuorumRule::AtLeast(2).min_approvals(5), 2);
    }

    #[test]
    fn test_parse() {
        assert_eq!("majority".parse::<QuorumRule>().ok(), Some(QuorumRule::Majority));
        assert_eq!("unanimous".parse::<QuorumRule>().ok(), Some(QuorumRule::Unanimous));
        assert_eq!("atleast:4".parse::<QuorumRule>().ok(), Some(QuorumRule::AtLeast(4)));
        assert!("percentage:80".parse::<QuorumRule>().is_err());
    }
}
