//! Elimination cascade classification.

/// What an elimination means for one participant in one league.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterOutcome {
    /// No active contestant left.
    TorchSnuffed,
    /// Exactly one active contestant left.
    LastContestant,
    /// Two or more active contestants left.
    Safe,
}

/// Classifies a roster by how many of its contestants are still active.
#[must_use]
pub fn classify(remaining_active: usize) -> RosterOutcome {
    match remaining_active {
        0 => RosterOutcome::TorchSnuffed,
        1 => RosterOutcome::LastContestant,
        _ => RosterOutcome::Safe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_tiers() {
        assert_eq!(classify(0), RosterOutcome::TorchSnuffed);
        assert_eq!(classify(1), RosterOutcome::LastContestant);
        assert_eq!(classify(2), RosterOutcome::Safe);
        assert_eq!(classify(7), RosterOutcome::Safe);
    }
}
