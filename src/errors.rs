//! Error types for the recycling pool

use thiserror::Error;

/// Error produced by a pool's factory, boxed so any host error type fits.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Invalid pool configuration: {0}")]
    Configuration(String),

    #[error("Factory failed to create a pooled object")]
    Factory(#[source] FactoryError),

    /// Never returned to callers. Acquisition logs it and skips the slot.
    #[error("Active object found in available stack (slot {index})")]
    Consistency { index: usize },
}

pub type PoolResult<T> = Result<T, PoolError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_factory_error_keeps_source() {
        let inner: FactoryError = "prefab missing".into();
        let err = PoolError::Factory(inner);

        assert_eq!(err.to_string(), "Factory failed to create a pooled object");
        assert_eq!(err.source().unwrap().to_string(), "prefab missing");
    }

    #[test]
    fn test_consistency_message_names_slot() {
        let err = PoolError::Consistency { index: 7 };
        assert!(err.to_string().contains("slot 7"));
    }
}
