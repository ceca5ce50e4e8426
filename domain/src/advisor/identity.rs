//! Advisor roster identities
//!
//! The roster is a closed, compile-time-known set: the quorum math in
//! plan merging depends on a fixed roster size, and tie-breaking during
//! action aggregation depends on a stable roster order.

use serde::{Deserialize, Serialize};

/// Identity of one advisor in the fixed deliberation roster.
///
/// Variant order is the roster order. It decides which advisor's copy of
/// a duplicated action survives merging, and it must not change between
/// releases without revisiting the merge tests.
///
/// # Example
///
/// ```
/// use conclave_domain::advisor::AdvisorId;
///
/// assert_eq!(AdvisorId::COUNT, 5);
/// assert_eq!(AdvisorId::ALL[0], AdvisorId::Logic);
/// assert_eq!(AdvisorId::Safeguard.as_str(), "Safeguard");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AdvisorId {
    /// Breaks the task into deterministic inspect/build/verify steps
    Logic,
    /// Prefers the smallest set of changes that satisfies the task
    Pragmatic,
    /// Screens for dangerous instructions; the only advisor expected to veto
    Safeguard,
    /// Batches related checks and avoids redundant work
    Efficiency,
    /// Keeps outcomes understandable for the operator
    HumanImpact,
}

impl AdvisorId {
    /// The full roster in deliberation order.
    pub const ALL: [AdvisorId; 5] = [
        AdvisorId::Logic,
        AdvisorId::Pragmatic,
        AdvisorId::Safeguard,
        AdvisorId::Efficiency,
        AdvisorId::HumanImpact,
    ];

    /// Fixed roster size, the denominator for quorum checks.
    pub const COUNT: usize = Self::ALL.len();

    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisorId::Logic => "Logic",
            AdvisorId::Pragmatic => "Pragmatic",
            AdvisorId::Safeguard => "Safeguard",
            AdvisorId::Efficiency => "Efficiency",
            AdvisorId::HumanImpact => "HumanImpact",
        }
    }

    /// Position in the roster (0-indexed), used for tie-breaking.
    pub fn roster_index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|id| id == self)
            .unwrap_or(Self::COUNT)
    }
}

impl std::fmt::Display for AdvisorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AdvisorId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Logic" => Ok(AdvisorId::Logic),
            "Pragmatic" => Ok(AdvisorId::Pragmatic),
            "Safeguard" => Ok(AdvisorId::Safeguard),
            "Efficiency" => Ok(AdvisorId::Efficiency),
            "HumanImpact" => Ok(AdvisorId::HumanImpact),
            other => Err(format!(
                "Unknown advisor: {}. Valid: Logic, Pragmatic, Safeguard, Efficiency, HumanImpact",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_order_is_stable() {
        // Merge tie-breaking depends on this exact order.
        assert_eq!(
            AdvisorId::ALL,
            [
                AdvisorId::Logic,
                AdvisorId::Pragmatic,
                AdvisorId::Safeguard,
                AdvisorId::Efficiency,
                AdvisorId::HumanImpact,
            ]
        );
    }

    #[test]
    fn test_roster_index() {
        assert_eq!(AdvisorId::Logic.roster_index(), 0);
        assert_eq!(AdvisorId::HumanImpact.roster_index(), 4);
    }

    #[test]
    fn test_parse_round_trip() {
        for id in AdvisorId::ALL {
            assert_eq!(id.as_str().parse::<AdvisorId>().unwrap(), id);
        }
        assert!("Oracle".parse::<AdvisorId>().is_err());
    }
}
