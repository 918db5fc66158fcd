use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::VetError;
use crate::models::{ReviewStats, ReviewStatsRow, VetId};
use crate::store::ReviewStatsSource;

/// Stats from one aggregation pass. Lives for a single request only: ratings
/// change whenever a review is written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewStatsMap {
    stats: HashMap<VetId, ReviewStats>,
}

impl ReviewStatsMap {
    /// Veterinarians without reviews read as `{0, 0.0}`.
    pub fn get_or_default(&self, vet_id: &VetId) -> ReviewStats {
        self.stats.get(vet_id).copied().unwrap_or_default()
    }

    pub fn contains(&self, vet_id: &VetId) -> bool {
        self.stats.contains_key(vet_id)
    }

    pub(crate) fn len(&self) -> usize {
        self.stats.len()
    }
}

impl FromIterator<ReviewStatsRow> for ReviewStatsMap {
    fn from_iter<I: IntoIterator<Item = ReviewStatsRow>>(rows: I) -> Self {
        let stats = rows
            .into_iter()
            .filter(|row| row.total_reviewers > 0)
            .map(|row| {
                let stats = ReviewStats {
                    total_reviewers: row.total_reviewers,
                    average_rating: row.average_rating.unwrap_or(0.0),
                };
                (row.veterinarian_id, stats)
            })
            .collect();

        Self { stats }
    }
}

#[derive(Clone)]
pub struct ReviewStatsAggregator {
    source: Arc<dyn ReviewStatsSource>,
}

impl ReviewStatsAggregator {
    pub fn new(source: Arc<dyn ReviewStatsSource>) -> Self {
        Self { source }
    }

    /// One grouped query over all reviews, or only those of `vet_ids`.
    pub async fn aggregate(&self, vet_ids: Option<&[VetId]>) -> Result<ReviewStatsMap, VetError> {
        match vet_ids {
            Some([]) => {
                debug!("No veterinarian ids to aggregate, skipping review stats query");
                return Ok(ReviewStatsMap::default());
            }
            Some(ids) => debug!("Aggregating review stats for {} veterinarians", ids.len()),
            None => debug!("Aggregating review stats for all veterinarians"),
        }

        let rows = self.source.review_stats(vet_ids).await?;
        let map: ReviewStatsMap = rows.into_iter().collect();

        debug!("Review stats present for {} veterinarians", map.len());
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_missing_id_defaults_to_zero() {
        let map = ReviewStatsMap::default();
        let stats = map.get_or_default(&Uuid::new_v4());
        assert_eq!(stats.total_reviewers, 0);
        assert_eq!(stats.average_rating, 0.0);
    }

    #[test]
    fn test_rows_without_reviews_are_dropped() {
        let reviewed = Uuid::new_v4();
        let unreviewed = Uuid::new_v4();

        let map: ReviewStatsMap = vec![
            ReviewStatsRow { veterinarian_id: reviewed, total_reviewers: 2, average_rating: Some(4.5) },
            ReviewStatsRow { veterinarian_id: unreviewed, total_reviewers: 0, average_rating: None },
        ]
        .into_iter()
        .collect();

        assert!(map.contains(&reviewed));
        assert!(!map.contains(&unreviewed));
        assert_eq!(map.get_or_default(&reviewed).average_rating, 4.5);
        assert_eq!(map.get_or_default(&unreviewed), ReviewStats::default());
    }
}
