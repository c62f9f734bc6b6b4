pub mod region_report;

pub use region_report::{count_by_region, RegionCounts, UNKNOWN_COUNTRY};
