use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Page, PageRequest, ReviewStatsRow, SpecializationCount, Veterinarian, VetId};
use crate::services::window::ConflictWindow;
use crate::store::{AppointmentConflictSource, ReviewStatsSource, VeterinarianSource};

const VETERINARIAN_COLUMNS: &str = "id,first_name,last_name,specialization,photo_id";
const VETERINARIAN_ORDER: &str = "last_name.asc,first_name.asc,id.asc";
const REVIEW_STATS_COLUMNS: &str = "veterinarian_id,total_reviewers,average_rating";
// Keeps `veterinarian_id=in.(...)` around 4 KB per request
const REVIEW_STATS_ID_CHUNK: usize = 100;

#[derive(Debug, Deserialize)]
struct SpecializationRow {
    specialization: String,
}

/// PostgREST-backed store over the `veterinarians` and `appointments` tables
/// and the `veterinarian_review_stats` view.
#[derive(Clone)]
pub struct SupabaseVetStore {
    supabase: SupabaseClient,
}

impl SupabaseVetStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn fetch_veterinarians(&self, filters: &[String]) -> Result<Vec<Veterinarian>> {
        let mut path = format!("/rest/v1/veterinarians?select={}", VETERINARIAN_COLUMNS);
        for filter in filters {
            path.push('&');
            path.push_str(filter);
        }
        path.push_str(&format!("&order={}", VETERINARIAN_ORDER));

        let vets: Vec<Veterinarian> = self.supabase.request(
            Method::GET,
            &path,
            None,
            None,
        ).await?;

        Ok(vets)
    }

    async fn fetch_specialization_column(&self) -> Result<Vec<String>> {
        let rows: Vec<SpecializationRow> = self.supabase.request(
            Method::GET,
            "/rest/v1/veterinarians?select=specialization",
            None,
            None,
        ).await?;

        Ok(rows.into_iter().map(|row| row.specialization).collect())
    }
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S%.3f").to_string()
}

fn id_list<'a>(ids: impl IntoIterator<Item = &'a VetId>) -> String {
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl VeterinarianSource for SupabaseVetStore {
    async fn list_page(&self, request: PageRequest) -> Result<Page<Veterinarian>> {
        debug!("Fetching veterinarian page {} (size {})", request.page, request.size);

        let path = format!(
            "/rest/v1/veterinarians?select={}&order={}&offset={}&limit={}",
            VETERINARIAN_COLUMNS,
            VETERINARIAN_ORDER,
            request.offset(),
            request.size
        );

        let (vets, total): (Vec<Veterinarian>, Option<u64>) =
            self.supabase.request_with_count(&path, None).await?;

        let total = total.unwrap_or_else(|| request.offset() + vets.len() as u64);
        Ok(Page::new(vets, request, total))
    }

    async fn list_all(&self) -> Result<Vec<Veterinarian>> {
        debug!("Fetching all veterinarians");
        self.fetch_veterinarians(&[]).await
    }

    async fn list_by_specialization(&self, specialization: &str) -> Result<Vec<Veterinarian>> {
        debug!("Fetching veterinarians with specialization: {}", specialization);
        let filter = format!("specialization=eq.{}", urlencoding::encode(specialization));
        self.fetch_veterinarians(&[filter]).await
    }

    async fn specializations(&self) -> Result<Vec<String>> {
        let distinct: BTreeSet<String> = self.fetch_specialization_column().await?
            .into_iter()
            .collect();
        Ok(distinct.into_iter().collect())
    }

    async fn count_by_specialization(&self) -> Result<Vec<SpecializationCount>> {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for specialization in self.fetch_specialization_column().await? {
            *counts.entry(specialization).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(specialization, count)| SpecializationCount { specialization, count })
            .collect())
    }
}

/// Anti-join against `appointments` in a single request: the embed keeps
/// only bookings inside the window and `appointments=is.null` drops every
/// veterinarian that has one.
fn available_path(date: NaiveDate, window: &ConflictWindow, specialization: Option<&str>) -> String {
    let mut path = format!(
        "/rest/v1/veterinarians?select={},appointments!left(id)\
         &appointments.appointment_date=eq.{}\
         &appointments.appointment_time=gt.{}\
         &appointments.appointment_time=lt.{}\
         &appointments=is.null",
        VETERINARIAN_COLUMNS,
        date.format("%Y-%m-%d"),
        format_time(window.min_time),
        format_time(window.max_time)
    );
    if let Some(specialization) = specialization {
        path.push_str(&format!("&specialization=eq.{}", urlencoding::encode(specialization)));
    }
    path.push_str(&format!("&order={}", VETERINARIAN_ORDER));
    path
}

#[async_trait]
impl AppointmentConflictSource for SupabaseVetStore {
    async fn find_available(
        &self,
        date: NaiveDate,
        window: &ConflictWindow,
        specialization: Option<&str>,
    ) -> Result<Vec<Veterinarian>> {
        debug!(
            "Fetching veterinarians free on {} outside ({}, {})",
            date, window.min_time, window.max_time
        );

        let vets: Vec<Veterinarian> = self.supabase.request(
            Method::GET,
            &available_path(date, window, specialization),
            None,
            None,
        ).await?;

        Ok(vets)
    }
}

#[async_trait]
impl ReviewStatsSource for SupabaseVetStore {
    async fn review_stats(&self, vet_ids: Option<&[VetId]>) -> Result<Vec<ReviewStatsRow>> {
        let base = format!("/rest/v1/veterinarian_review_stats?select={}", REVIEW_STATS_COLUMNS);

        let Some(ids) = vet_ids else {
            return self.supabase.request(Method::GET, &base, None, None).await;
        };

        // Each id lands in exactly one chunk, so every row still comes from
        // a single grouped read.
        let sorted: Vec<&VetId> = ids.iter().collect::<BTreeSet<_>>().into_iter().collect();
        let mut rows = Vec::new();
        for chunk in sorted.chunks(REVIEW_STATS_ID_CHUNK) {
            let path = format!("{}&veterinarian_id=in.({})", base, id_list(chunk.iter().copied()));
            let chunk_rows: Vec<ReviewStatsRow> = self.supabase.request(
                Method::GET,
                &path,
                None,
                None,
            ).await?;
            rows.extend(chunk_rows);
        }

        Ok(rows)
    }
}
