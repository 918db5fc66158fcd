use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{
    Appointment, Page, PageRequest, ReviewStatsRow, SpecializationCount, Veterinarian, VetId,
};
use crate::services::conflict::exclude_booked;
use crate::services::window::ConflictWindow;
use crate::store::{AppointmentConflictSource, ReviewStatsSource, VeterinarianSource};

#[derive(Debug, Default)]
struct Tables {
    veterinarians: Vec<Veterinarian>,
    appointments: Vec<Appointment>,
    // (veterinarian, rating)
    reviews: Vec<(VetId, u8)>,
}

/// Process-local store. Every query reads under one lock, so each answer is a
/// single snapshot.
#[derive(Debug, Default)]
pub struct InMemoryVetStore {
    tables: RwLock<Tables>,
}

impl InMemoryVetStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_veterinarian(&self, vet: Veterinarian) {
        self.write().veterinarians.push(vet);
    }

    pub fn insert_appointment(&self, appointment: Appointment) {
        self.write().appointments.push(appointment);
    }

    pub fn insert_review(&self, veterinarian_id: VetId, rating: u8) {
        self.write().reviews.push((veterinarian_id, rating));
    }

    fn sorted(mut vets: Vec<Veterinarian>) -> Vec<Veterinarian> {
        vets.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        vets
    }
}

#[async_trait]
impl VeterinarianSource for InMemoryVetStore {
    async fn list_page(&self, request: PageRequest) -> Result<Page<Veterinarian>> {
        let all = Self::sorted(self.read().veterinarians.clone());
        let total = all.len() as u64;

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = all
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .collect();

        Ok(Page::new(content, request, total))
    }

    async fn list_all(&self) -> Result<Vec<Veterinarian>> {
        Ok(Self::sorted(self.read().veterinarians.clone()))
    }

    async fn list_by_specialization(&self, specialization: &str) -> Result<Vec<Veterinarian>> {
        let matching = self
            .read()
            .veterinarians
            .iter()
            .filter(|vet| vet.specialization == specialization)
            .cloned()
            .collect();
        Ok(Self::sorted(matching))
    }

    async fn specializations(&self) -> Result<Vec<String>> {
        let distinct: BTreeSet<String> = self
            .read()
            .veterinarians
            .iter()
            .map(|vet| vet.specialization.clone())
            .collect();
        Ok(distinct.into_iter().collect())
    }

    async fn count_by_specialization(&self) -> Result<Vec<SpecializationCount>> {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for vet in &self.read().veterinarians {
            *counts.entry(vet.specialization.clone()).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(specialization, count)| SpecializationCount { specialization, count })
            .collect())
    }
}

#[async_trait]
impl AppointmentConflictSource for InMemoryVetStore {
    async fn find_available(
        &self,
        date: NaiveDate,
        window: &ConflictWindow,
        specialization: Option<&str>,
    ) -> Result<Vec<Veterinarian>> {
        let tables = self.read();

        let candidates = tables
            .veterinarians
            .iter()
            .filter(|vet| specialization.map_or(true, |s| vet.specialization == s))
            .cloned()
            .collect();

        let available = exclude_booked(candidates, &tables.appointments, date, window);
        Ok(Self::sorted(available))
    }
}

#[async_trait]
impl ReviewStatsSource for InMemoryVetStore {
    async fn review_stats(&self, vet_ids: Option<&[VetId]>) -> Result<Vec<ReviewStatsRow>> {
        let wanted: Option<HashSet<&VetId>> = vet_ids.map(|ids| ids.iter().collect());

        // veterinarian -> (count, rating sum)
        let mut grouped: HashMap<VetId, (u64, u64)> = HashMap::new();
        for (vet_id, rating) in &self.read().reviews {
            if wanted.as_ref().is_some_and(|ids| !ids.contains(vet_id)) {
                continue;
            }
            let entry = grouped.entry(*vet_id).or_default();
            entry.0 += 1;
            entry.1 += u64::from(*rating);
        }

        Ok(grouped
            .into_iter()
            .map(|(veterinarian_id, (count, sum))| ReviewStatsRow {
                veterinarian_id,
                total_reviewers: count,
                average_rating: Some(sum as f64 / count as f64),
            })
            .collect())
    }
}
