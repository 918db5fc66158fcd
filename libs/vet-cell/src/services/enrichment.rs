use crate::models::{Veterinarian, VetSummary};
use crate::services::review_stats::ReviewStatsMap;

/// The one place a veterinarian becomes a `VetSummary`. Both the availability
/// search and the listings go through here.
pub fn build_summary(vet: &Veterinarian, stats: &ReviewStatsMap) -> VetSummary {
    let review_stats = stats.get_or_default(&vet.id);

    VetSummary {
        id: vet.id,
        first_name: vet.first_name.clone(),
        last_name: vet.last_name.clone(),
        specialization: vet.specialization.clone(),
        average_rating: review_stats.average_rating,
        total_reviewers: review_stats.total_reviewers,
        photo_id: vet.photo_id,
    }
}

pub fn build_summaries(vets: &[Veterinarian], stats: &ReviewStatsMap) -> Vec<VetSummary> {
    vets.iter().map(|vet| build_summary(vet, stats)).collect()
}
