use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{NaiveDate, NaiveTime};

pub type VetId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Veterinarian {
    pub id: VetId,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    // Only the id: photo bytes are never loaded for listings
    #[serde(default)]
    pub photo_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub veterinarian_id: VetId,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
}

/// Reviewer count and mean rating for one veterinarian, taken from a single
/// aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total_reviewers: u64,
    pub average_rating: f64,
}

/// One grouped row as returned by the review aggregate source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewStatsRow {
    pub veterinarian_id: VetId,
    pub total_reviewers: u64,
    #[serde(default)]
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VetSummary {
    pub id: VetId,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub average_rating: f64,
    pub total_reviewers: u64,
    pub photo_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecializationCount {
    pub specialization: String,
    pub count: u64,
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let total_pages = if request.size == 0 {
            0
        } else {
            total_elements.div_ceil(u64::from(request.size))
        };

        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub specialization: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

impl AvailabilityQuery {
    /// Blank specialization means "any".
    pub fn specialization(&self) -> Option<&str> {
        self.specialization
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
