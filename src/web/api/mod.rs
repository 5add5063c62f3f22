pub mod error;
pub mod heatmap;
pub mod scans;
