use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::error::VetError;
use crate::models::{AvailabilityQuery, PageRequest};
use crate::services::{AvailabilityService, ListingService};
use crate::store::{SupabaseVetStore, VetStore};

/// Services shared by every vet-cell handler.
#[derive(Clone)]
pub struct VetCellState {
    pub availability: AvailabilityService,
    pub listing: ListingService,
    pub default_page_size: u32,
}

impl VetCellState {
    pub fn from_store<S: VetStore + 'static>(store: Arc<S>, config: &AppConfig) -> Self {
        Self {
            availability: AvailabilityService::from_store(store.clone()),
            listing: ListingService::from_store(store, config.max_page_size),
            default_page_size: config.default_page_size,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::from_store(Arc::new(SupabaseVetStore::new(config)), config)
    }
}

// Query parameters for different endpoints
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub page: Option<String>,
    pub size: Option<String>,
}

impl ListingQuery {
    pub fn page_request(&self, default_size: u32) -> Result<PageRequest, VetError> {
        let page = parse_number("page", self.page.as_deref())?.unwrap_or(0);
        let size = parse_number("size", self.size.as_deref())?.unwrap_or(default_size);
        Ok(PageRequest::new(page, size))
    }
}

fn parse_number(name: &str, raw: Option<&str>) -> Result<Option<u32>, VetError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().map_err(|_| {
                VetError::InvalidInput(format!("Invalid {} '{}', expected a non-negative integer", name, s))
            })
        })
        .transpose()
}

#[derive(Debug, Deserialize)]
pub struct AvailableVetsQuery {
    pub specialization: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

impl AvailableVetsQuery {
    /// Malformed values are rejected here, before any window is computed.
    pub fn parse(self) -> Result<AvailabilityQuery, VetError> {
        let date = self.date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_date)
            .transpose()?;
        let time = self.time
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_time)
            .transpose()?;

        Ok(AvailabilityQuery {
            specialization: self.specialization,
            date,
            time,
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, VetError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| VetError::InvalidInput(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

fn parse_time(raw: &str) -> Result<NaiveTime, VetError> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| VetError::InvalidInput(format!("Invalid time '{}', expected HH:MM or HH:MM:SS", raw)))
}

// ==============================================================================
// LISTING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_veterinarians(
    State(state): State<Arc<VetCellState>>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Value>, AppError> {
    let request = query.page_request(state.default_page_size)?;

    let page = state.listing.get_all_veterinarians(request).await?;

    Ok(Json(json!(page)))
}

#[axum::debug_handler]
pub async fn list_veterinarians_with_details(
    State(state): State<Arc<VetCellState>>,
) -> Result<Json<Value>, AppError> {
    let veterinarians = state.listing.get_all_veterinarians_with_details().await?;

    Ok(Json(json!({
        "veterinarians": veterinarians,
        "total": veterinarians.len()
    })))
}

#[axum::debug_handler]
pub async fn get_specializations(
    State(state): State<Arc<VetCellState>>,
) -> Result<Json<Value>, AppError> {
    let specializations = state.listing.get_specializations().await?;

    Ok(Json(json!({ "specializations": specializations })))
}

#[axum::debug_handler]
pub async fn get_specialization_breakdown(
    State(state): State<Arc<VetCellState>>,
) -> Result<Json<Value>, AppError> {
    let breakdown = state.listing.aggregate_vets_by_specialization().await?;

    Ok(Json(json!({ "breakdown": breakdown })))
}

#[axum::debug_handler]
pub async fn get_veterinarians_by_specialization(
    State(state): State<Arc<VetCellState>>,
    Path(specialization): Path<String>,
) -> Result<Json<Value>, AppError> {
    let veterinarians = state.listing.get_veterinarians_by_specialization(&specialization).await?;

    Ok(Json(json!({
        "specialization": specialization,
        "veterinarians": veterinarians,
        "total": veterinarians.len()
    })))
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn find_available_veterinarians(
    State(state): State<Arc<VetCellState>>,
    Query(query): Query<AvailableVetsQuery>,
) -> Result<Json<Value>, AppError> {
    let query = query.parse()?;

    let veterinarians = state.availability.find_available_vets(&query).await?;

    Ok(Json(json!({
        "date": query.date,
        "time": query.time,
        "specialization": query.specialization(),
        "veterinarians": veterinarians,
        "total": veterinarians.len()
    })))
}
