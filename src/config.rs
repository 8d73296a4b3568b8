//! Pool configuration options

use crate::errors::FactoryError;
use std::fmt;

pub(crate) type Factory<T> = Box<dyn FnMut() -> Result<T, FactoryError>>;

/// Configuration used to construct a [`Pool`](crate::Pool)
///
/// # Examples
///
/// ```
/// use recycling_pool::PoolConfiguration;
///
/// let config = PoolConfiguration::new()
///     .with_capacity(32)
///     .with_name("bullets")
///     .with_factory(|| 0u32);
///
/// assert_eq!(config.capacity, 32);
/// assert_eq!(config.name, "bullets");
/// assert!(config.has_factory());
/// ```
pub struct PoolConfiguration<T> {
    /// Number of objects created up front
    pub capacity: usize,

    /// Label used in log lines and metric exports
    pub name: String,

    pub(crate) factory: Option<Factory<T>>,
}

impl<T> Default for PoolConfiguration<T> {
    fn default() -> Self {
        Self {
            capacity: 10,
            name: "pool".to_string(),
            factory: None,
        }
    }
}

impl<T> fmt::Debug for PoolConfiguration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfiguration")
            .field("capacity", &self.capacity)
            .field("name", &self.name)
            .field("factory", &self.factory.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl<T> PoolConfiguration<T> {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of objects to pre-create
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the pool name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Use a factory that cannot fail
    pub fn with_factory<F>(mut self, mut factory: F) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        self.factory = Some(Box::new(move || Ok(factory())));
        self
    }

    /// Use a factory whose errors are surfaced from construction and acquisition
    ///
    /// # Examples
    ///
    /// ```
    /// use recycling_pool::PoolConfiguration;
    ///
    /// let config = PoolConfiguration::<String>::new()
    ///     .with_fallible_factory(|| "spark".parse::<String>());
    ///
    /// assert!(config.has_factory());
    /// ```
    pub fn with_fallible_factory<F, E>(mut self, mut factory: F) -> Self
    where
        F: FnMut() -> Result<T, E> + 'static,
        E: Into<FactoryError>,
    {
        self.factory = Some(Box::new(move || factory().map_err(Into::into)));
        self
    }

    /// Whether a factory has been configured
    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PoolConfiguration::<u8>::default();
        assert_eq!(config.capacity, 10);
        assert_eq!(config.name, "pool");
        assert!(!config.has_factory());
    }

    #[test]
    fn test_fallible_factory_boxes_error() {
        let mut config = PoolConfiguration::<u8>::new()
            .with_fallible_factory(|| Err::<u8, _>(std::fmt::Error));

        let factory = config.factory.as_mut().unwrap();
        assert!(factory().is_err());
    }

    #[test]
    fn test_debug_hides_factory() {
        let config = PoolConfiguration::new().with_factory(|| 1u8);
        let text = format!("{config:?}");
        assert!(text.contains("<fn>"));
    }
}
