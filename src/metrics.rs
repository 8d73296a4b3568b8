//! Metrics collection and export for recycling pools

use std::collections::HashMap;

/// Metrics data for a pool
///
/// # Examples
///
/// ```
/// use recycling_pool::{Pool, Poolable};
///
/// #[derive(Default)]
/// struct Spark(bool);
///
/// impl Poolable for Spark {
///     fn set_active(&mut self, active: bool) { self.0 = active; }
///     fn is_active(&self) -> bool { self.0 }
/// }
///
/// let mut pool = Pool::with_factory(3, Spark::default).unwrap();
/// let _spark = pool.acquire().unwrap();
///
/// let metrics = pool.get_metrics();
/// assert_eq!(metrics.total_acquired, 1);
/// assert_eq!(metrics.in_use_objects, 1);
/// assert_eq!(metrics.available_objects, 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "metrics", derive(serde::Serialize))]
pub struct PoolMetrics {
    /// Total successful acquisitions
    pub total_acquired: usize,

    /// Total releases that moved an object back to the available stack
    pub total_released: usize,

    /// Objects created after construction because the pool ran dry
    pub total_grown: usize,

    /// Releases of objects that were already available
    pub duplicate_releases: usize,

    /// Releases through handles whose object had been re-acquired
    pub stale_releases: usize,

    /// Active objects found on the available stack
    pub consistency_faults: usize,

    /// Current in-use objects
    pub in_use_objects: usize,

    /// Current available objects
    pub available_objects: usize,

    /// In-use share of all objects (0.0 to 1.0)
    pub utilization: f64,

    /// Objects created so far
    pub capacity: usize,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_acquired".to_string(), self.total_acquired.to_string());
        metrics.insert("total_released".to_string(), self.total_released.to_string());
        metrics.insert("total_grown".to_string(), self.total_grown.to_string());
        metrics.insert("duplicate_releases".to_string(), self.duplicate_releases.to_string());
        metrics.insert("stale_releases".to_string(), self.stale_releases.to_string());
        metrics.insert("consistency_faults".to_string(), self.consistency_faults.to_string());
        metrics.insert("in_use_objects".to_string(), self.in_use_objects.to_string());
        metrics.insert("available_objects".to_string(), self.available_objects.to_string());
        metrics.insert("utilization".to_string(), format!("{:.2}", self.utilization));
        metrics.insert("capacity".to_string(), self.capacity.to_string());
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use recycling_pool::{MetricsExporter, Pool, Poolable};
    /// use std::collections::HashMap;
    ///
    /// struct Decal(bool);
    ///
    /// impl Poolable for Decal {
    ///     fn set_active(&mut self, active: bool) { self.0 = active; }
    ///     fn is_active(&self) -> bool { self.0 }
    /// }
    ///
    /// let pool = Pool::with_factory(4, || Decal(false)).unwrap();
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("scene".to_string(), "arena".to_string());
    ///
    /// let output = pool.export_metrics_prometheus("decals", Some(&tags));
    /// assert!(output.contains("recycling_pool_objects_available{pool=\"decals\",scene=\"arena\"} 4"));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let mut output = String::new();
        let labels = Self::format_labels(pool_name, tags);

        // Gauge metrics
        Self::push(&mut output, "objects_in_use", "gauge", "Current in-use objects", &labels, metrics.in_use_objects);
        Self::push(&mut output, "objects_available", "gauge", "Current available objects", &labels, metrics.available_objects);
        Self::push(&mut output, "capacity", "gauge", "Objects created so far", &labels, metrics.capacity);

        output.push_str("# HELP recycling_pool_utilization Pool utilization ratio\n");
        output.push_str("# TYPE recycling_pool_utilization gauge\n");
        output.push_str(&format!("recycling_pool_utilization{{{}}} {:.2}\n", labels, metrics.utilization));

        // Counter metrics
        Self::push(&mut output, "acquired_total", "counter", "Total objects acquired", &labels, metrics.total_acquired);
        Self::push(&mut output, "released_total", "counter", "Total objects released", &labels, metrics.total_released);
        Self::push(&mut output, "grown_total", "counter", "Objects created on demand", &labels, metrics.total_grown);
        Self::push(&mut output, "duplicate_releases_total", "counter", "Releases of already available objects", &labels, metrics.duplicate_releases);
        Self::push(&mut output, "stale_releases_total", "counter", "Releases through outdated handles", &labels, metrics.stale_releases);
        Self::push(&mut output, "consistency_faults_total", "counter", "Active objects found on the available stack", &labels, metrics.consistency_faults);

        output
    }

    fn push(output: &mut String, name: &str, kind: &str, help: &str, labels: &str, value: usize) {
        output.push_str(&format!("# HELP recycling_pool_{} {}\n", name, help));
        output.push_str(&format!("# TYPE recycling_pool_{} {}\n", name, kind));
        output.push_str(&format!("recycling_pool_{}{{{}}} {}\n", name, labels, value));
    }

    fn format_labels(pool_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("pool=\"{}\"", pool_name)];

        if let Some(tags) = tags {
            let mut tags: Vec<_> = tags.iter().collect();
            tags.sort();
            for (key, value) in tags {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal metrics tracker
#[derive(Debug, Default)]
pub(crate) struct MetricsTracker {
    pub total_acquired: usize,
    pub total_released: usize,
    pub total_grown: usize,
    pub duplicate_releases: usize,
    pub stale_releases: usize,
    pub consistency_faults: usize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_metrics(&self, in_use: usize, available: usize, capacity: usize) -> PoolMetrics {
        let utilization = if capacity > 0 {
            in_use as f64 / capacity as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_acquired: self.total_acquired,
            total_released: self.total_released,
            total_grown: self.total_grown,
            duplicate_releases: self.duplicate_releases,
            stale_releases: self.stale_releases,
            consistency_faults: self.consistency_faults,
            in_use_objects: in_use,
            available_objects: available,
            utilization,
            capacity,
        }
    }
}
