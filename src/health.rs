//! Health monitoring for recycling pools

/// Health status of a pool
///
/// # Examples
///
/// ```
/// use recycling_pool::HealthStatus;
///
/// let health = HealthStatus::new(3, 0, 3, 3, 0);
/// assert!(health.is_healthy());
/// assert_eq!(health.available_objects, 3);
///
/// let grown = HealthStatus::new(0, 5, 5, 3, 0);
/// assert!(!grown.is_healthy());
/// assert_eq!(grown.warning_count, 3);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "metrics", derive(serde::Serialize))]
pub struct HealthStatus {
    /// Whether the pool is healthy
    pub is_healthy: bool,

    /// Number of warnings detected
    pub warning_count: usize,

    /// Current pool utilization (0.0 to 1.0)
    pub utilization: f64,

    /// Available objects count
    pub available_objects: usize,

    /// In-use objects count
    pub in_use_objects: usize,

    /// Objects created so far
    pub capacity: usize,

    /// Objects created at construction
    pub initial_capacity: usize,

    /// Warning messages
    pub warnings: Vec<String>,
}

impl HealthStatus {
    /// Create a new health status
    pub fn new(
        available: usize,
        in_use: usize,
        capacity: usize,
        initial_capacity: usize,
        consistency_faults: usize,
    ) -> Self {
        let utilization = if capacity > 0 {
            in_use as f64 / capacity as f64
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        let mut is_healthy = true;

        // Check for high utilization
        if utilization > 0.9 {
            warnings.push(format!("High utilization: {:.1}%", utilization * 100.0));
            is_healthy = false;
        }

        if available == 0 && capacity > 0 {
            warnings.push("No objects available".to_string());
        }

        if capacity > initial_capacity {
            warnings.push(format!(
                "Grown beyond initial capacity: {} > {}",
                capacity, initial_capacity
            ));
        }

        if consistency_faults > 0 {
            warnings.push(format!("{} consistency faults recorded", consistency_faults));
            is_healthy = false;
        }

        Self {
            is_healthy,
            warning_count: warnings.len(),
            utilization,
            available_objects: available,
            in_use_objects: in_use,
            capacity,
            initial_capacity,
            warnings,
        }
    }

    /// Check if the pool is healthy
    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }
}
