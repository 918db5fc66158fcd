use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::VetError;
use crate::models::{Appointment, Veterinarian, VetId};
use crate::services::window::ConflictWindow;
use crate::store::AppointmentConflictSource;

/// Finds veterinarians with no booking strictly inside a conflict window.
///
/// The exclusion itself runs in the data source; this type only normalises
/// the request.
#[derive(Clone)]
pub struct ConflictFilter {
    source: Arc<dyn AppointmentConflictSource>,
}

impl ConflictFilter {
    pub fn new(source: Arc<dyn AppointmentConflictSource>) -> Self {
        Self { source }
    }

    pub async fn find_available(
        &self,
        date: NaiveDate,
        window: &ConflictWindow,
        specialization: Option<&str>,
    ) -> Result<Vec<Veterinarian>, VetError> {
        let specialization = specialization.map(str::trim).filter(|s| !s.is_empty());

        debug!(
            "Finding veterinarians free on {} outside ({}, {}) for specialization {:?}",
            date, window.min_time, window.max_time, specialization
        );

        let available = self.source.find_available(date, window, specialization).await?;

        debug!("{} veterinarians available", available.len());
        Ok(available)
    }
}

/// In-memory form of the exclusion for sources that can only hand back raw
/// appointment rows.
pub fn exclude_booked(
    candidates: Vec<Veterinarian>,
    appointments: &[Appointment],
    date: NaiveDate,
    window: &ConflictWindow,
) -> Vec<Veterinarian> {
    let busy: HashSet<VetId> = appointments
        .iter()
        .filter(|apt| apt.appointment_date == date && window.contains(apt.appointment_time))
        .map(|apt| apt.veterinarian_id)
        .collect();

    candidates
        .into_iter()
        .filter(|vet| !busy.contains(&vet.id))
        .collect()
}
