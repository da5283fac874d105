//! Shared test doubles and fixtures for the Torchlight fantasy league engine.

mod clock;
mod fixture;
mod outbox;
mod store;

pub use clock::{FixedClock, ManualClock, fixed_now};
pub use fixture::SeasonFixture;
pub use outbox::{FailingOutbox, RecordingOutbox};
pub use store::{InMemoryLeagueStore, UnavailableStore};
