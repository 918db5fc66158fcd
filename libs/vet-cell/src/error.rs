use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum VetError {
    #[error("No veterinarian found with specialization: {specialization}")]
    NotFound { specialization: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data source error: {0}")]
    DataSource(#[from] anyhow::Error),
}

impl VetError {
    pub fn not_found(specialization: impl Into<String>) -> Self {
        VetError::NotFound { specialization: specialization.into() }
    }
}

impl From<VetError> for AppError {
    fn from(err: VetError) -> Self {
        match err {
            VetError::NotFound { .. } => AppError::NotFound(err.to_string()),
            VetError::InvalidInput(msg) => AppError::ValidationError(msg),
            VetError::DataSource(e) => AppError::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_not_found_names_specialization() {
        let err = VetError::not_found("Dermatology");
        assert_eq!(err.to_string(), "No veterinarian found with specialization: Dermatology");

        let app_err: AppError = err.into();
        assert_matches!(app_err, AppError::NotFound(msg) if msg.contains("Dermatology"));
    }

    #[test]
    fn test_data_source_maps_to_database_error() {
        let err = VetError::from(anyhow::anyhow!("connection refused"));
        let app_err: AppError = err.into();
        assert_matches!(app_err, AppError::Database(msg) if msg == "connection refused");
    }
}
