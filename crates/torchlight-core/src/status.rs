//! Entity status machines.
//!
//! Every status is a closed enum with an explicit transition table. A change
//! not listed in the table is rejected with
//! [`DomainError::InvalidTransition`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A status enum with an explicit transition table.
pub trait Transition: Copy + Eq + fmt::Debug + 'static {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// The stored/serialized representation of the status.
    fn as_str(self) -> &'static str;

    /// Statuses reachable from `self` in one step.
    fn successors(self) -> &'static [Self];

    /// Returns `true` if `next` is listed as a successor of `self`.
    fn can_transition_to(self, next: Self) -> bool {
        self.successors().contains(&next)
    }

    /// Validates the change from `self` to `next`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the change is not listed.
    fn transition_to(self, next: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                entity: Self::ENTITY,
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

/// Declares a status enum together with its string form and parser.
macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident : $entity:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// The stored/serialized representation.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    other => Err(DomainError::StoreUnavailable(format!(
                        "unknown {} status {other:?}",
                        $entity
                    ))),
                }
            }
        }
    };
}

status_enum! {
    /// Lifecycle of a season. At most one season is `Active`.
    SeasonStatus: "season" {
        /// Drafting has not started.
        Upcoming => "upcoming",
        /// The season currently airing.
        Active => "active",
        /// The season has ended.
        Completed => "completed",
    }
}

status_enum! {
    /// Lifecycle of a league.
    LeagueStatus: "league" {
        /// Accepting picks and scored by standings runs.
        Active => "active",
        /// Frozen; skipped by auto-fill and standings.
        Closed => "closed",
    }
}

status_enum! {
    /// Lifecycle of a contestant. Elimination is terminal.
    ContestantStatus: "contestant" {
        /// Still competing.
        Active => "active",
        /// Voted out; carries an episode and placement.
        Eliminated => "eliminated",
    }
}

status_enum! {
    /// Lifecycle of a weekly pick.
    PickStatus: "pick" {
        /// Submitted and still editable until the deadline.
        Pending => "pending",
        /// Frozen by the lock sweep.
        Locked => "locked",
        /// Assigned by the auto-fill resolver after the deadline.
        AutoPicked => "auto_picked",
    }
}

status_enum! {
    /// Lifecycle of an episode scoring session.
    SessionStatus: "scoring_session" {
        /// Scores may still be saved.
        Draft => "draft",
        /// Committed; no further changes.
        Finalized => "finalized",
    }
}

impl Transition for SeasonStatus {
    const ENTITY: &'static str = "season";

    fn as_str(self) -> &'static str {
        SeasonStatus::as_str(self)
    }

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Upcoming => &[Self::Active],
            Self::Active => &[Self::Completed],
            Self::Completed => &[],
        }
    }
}

impl Transition for LeagueStatus {
    const ENTITY: &'static str = "league";

    fn as_str(self) -> &'static str {
        LeagueStatus::as_str(self)
    }

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Closed],
            Self::Closed => &[],
        }
    }
}

impl Transition for ContestantStatus {
    const ENTITY: &'static str = "contestant";

    fn as_str(self) -> &'static str {
        ContestantStatus::as_str(self)
    }

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Eliminated],
            Self::Eliminated => &[],
        }
    }
}

impl Transition for PickStatus {
    const ENTITY: &'static str = "pick";

    fn as_str(self) -> &'static str {
        PickStatus::as_str(self)
    }

    // Pending -> Pending is a resubmission before the deadline.
    fn successors(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Pending, Self::Locked],
            Self::Locked | Self::AutoPicked => &[],
        }
    }
}

impl Transition for SessionStatus {
    const ENTITY: &'static str = "scoring_session";

    fn as_str(self) -> &'static str {
        SessionStatus::as_str(self)
    }

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Finalized],
            Self::Finalized => &[],
        }
    }
}
