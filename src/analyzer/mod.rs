//! Tag resolution and version bump calculation

pub mod tag_resolver;
pub mod version_calculator;

pub use tag_resolver::{BaseTag, TagResolver};
pub use version_calculator::{NextVersion, VersionCalculator};
