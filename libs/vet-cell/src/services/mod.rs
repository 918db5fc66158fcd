pub mod window;
pub mod conflict;
pub mod review_stats;
pub mod enrichment;
pub mod availability;
pub mod listing;

pub use window::{compute_window, ConflictWindow};
pub use conflict::ConflictFilter;
pub use review_stats::{ReviewStatsAggregator, ReviewStatsMap};
pub use enrichment::{build_summary, build_summaries};
pub use availability::AvailabilityService;
pub use listing::ListingService;
