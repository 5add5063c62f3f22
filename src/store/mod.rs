pub mod overview;
pub mod storage;

pub use overview::OverviewFilter;
pub use storage::{BssidSummary, Datapoint, ScanStore, SsidOverview, StorageError};
