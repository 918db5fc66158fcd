use std::sync::Arc;
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            default_page_size: 10,
            max_page_size: 50,
        }
    }
}

impl TestConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Row shapes as PostgREST returns them for the vet tables and views.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn veterinarian_row(id: Uuid, first_name: &str, last_name: &str, specialization: &str) -> serde_json::Value {
        json!({
            "id": id,
            "first_name": first_name,
            "last_name": last_name,
            "specialization": specialization,
            "photo_id": null
        })
    }

    pub fn veterinarian_row_with_photo(id: Uuid, first_name: &str, last_name: &str, specialization: &str, photo_id: Uuid) -> serde_json::Value {
        json!({
            "id": id,
            "first_name": first_name,
            "last_name": last_name,
            "specialization": specialization,
            "photo_id": photo_id
        })
    }

    /// Row from the availability anti-join; the embedded booking list is
    /// always empty for the veterinarians that survive the filter.
    pub fn available_veterinarian_row(id: Uuid, first_name: &str, last_name: &str, specialization: &str) -> serde_json::Value {
        let mut row = Self::veterinarian_row(id, first_name, last_name, specialization);
        row["appointments"] = json!([]);
        row
    }

    pub fn review_stats_row(veterinarian_id: Uuid, total_reviewers: u64, average_rating: f64) -> serde_json::Value {
        json!({
            "veterinarian_id": veterinarian_id,
            "total_reviewers": total_reviewers,
            "average_rating": average_rating
        })
    }

    pub fn specialization_row(specialization: &str) -> serde_json::Value {
        json!({ "specialization": specialization })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
