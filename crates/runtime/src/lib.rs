//! Provider implementations for the tabsweep engine.
//!
//! * [`SafariAutomation`]: enumerates and closes Safari tabs through `osascript`
//! * [`SafariHistory`]: reads last-visit times from Safari's `History.db`
//! * [`FixtureBrowser`] / [`FixtureHistory`]: a JSON file standing in for both,
//!   for offline runs and tests

pub mod error;
pub mod fixture;
pub mod history;
pub mod paths;
pub mod process;
pub mod safari;

pub use error::{Result, RuntimeError};
pub use fixture::{FixtureBrowser, FixtureFile, FixtureHistory};
pub use history::SafariHistory;
pub use paths::SafariEdition;
pub use safari::SafariAutomation;
