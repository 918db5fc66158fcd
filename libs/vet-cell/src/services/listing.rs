use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::VetError;
use crate::models::{Page, PageRequest, SpecializationCount, VetId, VetSummary};
use crate::services::enrichment::{build_summaries, build_summary};
use crate::services::review_stats::ReviewStatsAggregator;
use crate::store::{VeterinarianSource, VetStore};

/// Browse views over the veterinarian population, enriched with review stats.
#[derive(Clone)]
pub struct ListingService {
    veterinarians: Arc<dyn VeterinarianSource>,
    review_stats: ReviewStatsAggregator,
    max_page_size: u32,
}

impl ListingService {
    pub fn new(
        veterinarians: Arc<dyn VeterinarianSource>,
        review_stats: ReviewStatsAggregator,
        max_page_size: u32,
    ) -> Self {
        Self {
            veterinarians,
            review_stats,
            max_page_size,
        }
    }

    pub fn from_store<S: VetStore + 'static>(store: Arc<S>, max_page_size: u32) -> Self {
        Self::new(store.clone(), ReviewStatsAggregator::new(store), max_page_size)
    }

    pub fn validate_page_request(&self, request: PageRequest) -> Result<PageRequest, VetError> {
        if request.size == 0 || request.size > self.max_page_size {
            return Err(VetError::InvalidInput(format!(
                "Page size must be between 1 and {}",
                self.max_page_size
            )));
        }
        Ok(request)
    }

    /// One page of veterinarians; stats are aggregated for that page's ids only.
    pub async fn get_all_veterinarians(
        &self,
        request: PageRequest,
    ) -> Result<Page<VetSummary>, VetError> {
        let request = self.validate_page_request(request)?;
        debug!("Listing veterinarians page {} (size {})", request.page, request.size);

        let page = self.veterinarians.list_page(request).await?;
        let ids: Vec<VetId> = page.content.iter().map(|vet| vet.id).collect();
        let stats = self.review_stats.aggregate(Some(&ids)).await?;

        Ok(page.map(|vet| build_summary(&vet, &stats)))
    }

    /// Every veterinarian, enriched from one full-population stats pass.
    pub async fn get_all_veterinarians_with_details(&self) -> Result<Vec<VetSummary>, VetError> {
        debug!("Listing all veterinarians with review stats");

        let (vets, stats) = tokio::try_join!(
            async { self.veterinarians.list_all().await.map_err(VetError::from) },
            self.review_stats.aggregate(None),
        )?;

        info!("Listed {} veterinarians", vets.len());
        Ok(build_summaries(&vets, &stats))
    }

    /// Fails with `NotFound` when no veterinarian has this specialization.
    pub async fn get_veterinarians_by_specialization(
        &self,
        specialization: &str,
    ) -> Result<Vec<VetSummary>, VetError> {
        let vets = self.veterinarians.list_by_specialization(specialization).await?;

        if vets.is_empty() {
            warn!("No veterinarians registered for specialization: {}", specialization);
            return Err(VetError::not_found(specialization));
        }

        let ids: Vec<VetId> = vets.iter().map(|vet| vet.id).collect();
        let stats = self.review_stats.aggregate(Some(&ids)).await?;

        Ok(build_summaries(&vets, &stats))
    }

    pub async fn get_specializations(&self) -> Result<Vec<String>, VetError> {
        Ok(self.veterinarians.specializations().await?)
    }

    pub async fn aggregate_vets_by_specialization(&self) -> Result<Vec<SpecializationCount>, VetError> {
        Ok(self.veterinarians.count_by_specialization().await?)
    }
}
