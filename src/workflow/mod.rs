pub mod harvest_loop;

pub use harvest_loop::{HarvestOutcome, Harvester, Termination};
