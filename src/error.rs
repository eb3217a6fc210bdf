use thiserror::Error;

pub type Result<T> = std::result::Result<T, BootwrightError>;

#[derive(Debug, Error)]
pub enum BootwrightError {
    #[error("Dependency not found: {type_name}")]
    DependencyNotFound { type_name: String },

    #[error("Failed to downcast type: {type_name}")]
    DowncastFailed { type_name: String },

    #[error("Service collection is sealed; cannot register {type_name} after the application was built")]
    BuilderSealed { type_name: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BootwrightError {
    pub(crate) fn not_found<T: ?Sized>() -> Self {
        Self::DependencyNotFound {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }

    pub(crate) fn sealed<T: ?Sized>() -> Self {
        Self::BuilderSealed {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }
}
