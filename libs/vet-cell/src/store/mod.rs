pub mod memory;
pub mod supabase;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{Page, PageRequest, ReviewStatsRow, SpecializationCount, Veterinarian, VetId};
use crate::services::window::ConflictWindow;

pub use memory::InMemoryVetStore;
pub use supabase::SupabaseVetStore;

/// Read access to veterinarian identities, owned by user management.
#[async_trait]
pub trait VeterinarianSource: Send + Sync {
    async fn list_page(&self, request: PageRequest) -> Result<Page<Veterinarian>>;

    async fn list_all(&self) -> Result<Vec<Veterinarian>>;

    async fn list_by_specialization(&self, specialization: &str) -> Result<Vec<Veterinarian>>;

    /// Distinct specialization names, sorted.
    async fn specializations(&self) -> Result<Vec<String>>;

    async fn count_by_specialization(&self) -> Result<Vec<SpecializationCount>>;
}

#[async_trait]
pub trait AppointmentConflictSource: Send + Sync {
    /// Veterinarians (optionally of one specialization) with no appointment on
    /// `date` strictly inside `window`.
    async fn find_available(
        &self,
        date: NaiveDate,
        window: &ConflictWindow,
        specialization: Option<&str>,
    ) -> Result<Vec<Veterinarian>>;
}

#[async_trait]
pub trait ReviewStatsSource: Send + Sync {
    /// One grouped row per reviewed veterinarian, for everyone or only `vet_ids`.
    async fn review_stats(&self, vet_ids: Option<&[VetId]>) -> Result<Vec<ReviewStatsRow>>;
}

/// A backend serving all three collaborator contracts.
pub trait VetStore: VeterinarianSource + AppointmentConflictSource + ReviewStatsSource {}

impl<T> VetStore for T where T: VeterinarianSource + AppointmentConflictSource + ReviewStatsSource {}
