pub mod cutoff;
pub use cutoff::Cutoff;

pub mod purge;
pub use purge::{CollectionPurge, PurgeSummary};
