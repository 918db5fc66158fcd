use std::sync::Arc;

use tracing::{debug, info};

use crate::error::VetError;
use crate::models::{AvailabilityQuery, Veterinarian, VetId, VetSummary};
use crate::services::conflict::ConflictFilter;
use crate::services::enrichment::build_summaries;
use crate::services::review_stats::ReviewStatsAggregator;
use crate::services::window::compute_window;
use crate::store::{VeterinarianSource, VetStore};

/// Answers "which veterinarians are free for this date and time".
#[derive(Clone)]
pub struct AvailabilityService {
    veterinarians: Arc<dyn VeterinarianSource>,
    conflict_filter: ConflictFilter,
    review_stats: ReviewStatsAggregator,
}

impl AvailabilityService {
    pub fn new(
        veterinarians: Arc<dyn VeterinarianSource>,
        conflict_filter: ConflictFilter,
        review_stats: ReviewStatsAggregator,
    ) -> Self {
        Self {
            veterinarians,
            conflict_filter,
            review_stats,
        }
    }

    pub fn from_store<S: VetStore + 'static>(store: Arc<S>) -> Self {
        Self::new(
            store.clone(),
            ConflictFilter::new(store.clone()),
            ReviewStatsAggregator::new(store),
        )
    }

    /// Without both a date and a time the search degrades to a plain listing.
    /// An empty result is never an error here, even for an unknown
    /// specialization.
    pub async fn find_available_vets(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Vec<VetSummary>, VetError> {
        let specialization = query.specialization();

        let candidates: Vec<Veterinarian> = match (query.date, query.time) {
            (Some(date), Some(time)) => {
                let window = compute_window(time);
                debug!(
                    "Availability search on {} at {} uses window ({}, {})",
                    date, time, window.min_time, window.max_time
                );
                self.conflict_filter.find_available(date, &window, specialization).await?
            }
            _ => {
                debug!("No date/time given, listing veterinarians without a time filter");
                match specialization {
                    Some(name) => self.veterinarians.list_by_specialization(name).await?,
                    None => self.veterinarians.list_all().await?,
                }
            }
        };

        if candidates.is_empty() {
            info!("No available veterinarians for {:?}", query);
            return Ok(Vec::new());
        }

        let ids: Vec<VetId> = candidates.iter().map(|vet| vet.id).collect();
        let stats = self.review_stats.aggregate(Some(&ids)).await?;

        info!("Found {} available veterinarians", candidates.len());
        Ok(build_summaries(&candidates, &stats))
    }
}
