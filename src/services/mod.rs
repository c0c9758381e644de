pub mod profile;
pub mod providers;
pub mod recommendations;
pub mod scoring;
pub mod seed_resolver;

pub use recommendations::{recommend, MIN_SCORED_MATCHES, TARGET_SIZE};
pub use seed_resolver::{resolve_seeds, SeedResolution};
