use std::collections::BTreeMap;

/// Deterministic metrics aggregation.
///
/// Metrics must not depend on wall-clock time or unordered iteration, so
/// snapshots come from sorted maps and have stable ordering.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Metrics {
    counters: BTreeMap<String, u64>,
    gauges: BTreeMap<String, f64>,
    histograms: BTreeMap<String, Histogram>,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Histogram {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Histogram {
    pub fn observe(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub counters: Vec<(String, u64)>,
    pub gauges: Vec<(String, f64)>,
    pub histograms: Vec<(String, Histogram)>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.counters.clear();
        self.gauges.clear();
        self.histograms.clear();
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn inc(&mut self, name: impl Into<String>) {
        self.add(name, 1);
    }

    pub fn add(&mut self, name: impl Into<String>, by: u64) {
        *self.counters.entry(name.into()).or_insert(0) += by;
    }

    pub fn gauge(&self, name: &str) -> Option<f64> {
        self.gauges.get(name).copied()
    }

    pub fn set_gauge(&mut self, name: impl Into<String>, value: f64) {
        self.gauges.insert(name.into(), value);
    }

    pub fn observe(&mut self, name: impl Into<String>, value: f64) {
        self.histograms
            .entry(name.into())
            .or_default()
            .observe(value);
    }

    pub fn histogram(&self, name: &str) -> Option<Histogram> {
        self.histograms.get(name).copied()
    }

    /// Returns a stable, sorted snapshot suitable for logs/debug overlays.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            gauges: self.gauges.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            histograms: self
                .histograms
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Histogram, Metrics};

    #[test]
    fn counters_accumulate() {
        let mut m = Metrics::new();
        m.inc("frames");
        m.add("frames", 2);
        assert_eq!(m.counter("frames"), 3);
        assert_eq!(m.counter("missing"), 0);
    }

    #[test]
    fn gauges_overwrite() {
        let mut m = Metrics::new();
        assert_eq!(m.gauge("zoom"), None);
        m.set_gauge("zoom", 1.0);
        m.set_gauge("zoom", 2.5);
        assert_eq!(m.gauge("zoom"), Some(2.5));
    }

    #[test]
    fn histogram_tracks_min_max_sum_count() {
        let mut h = Histogram::default();
        h.observe(5.0);
        h.observe(-2.0);
        h.observe(7.0);
        assert_eq!(h.count, 3);
        assert_eq!(h.sum, 10.0);
        assert_eq!(h.min, -2.0);
        assert_eq!(h.max, 7.0);
        assert!((h.mean() - 10.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn snapshot_is_stably_sorted() {
        let mut m = Metrics::new();
        m.inc("b");
        m.inc("a");
        m.observe("h2", 10.0);
        m.observe("h1", 5.0);

        let snap = m.snapshot();
        assert_eq!(
            snap.counters,
            vec![("a".to_string(), 1), ("b".to_string(), 1)]
        );
        assert_eq!(snap.histograms[0].0, "h1".to_string());
        assert_eq!(snap.histograms[1].0, "h2".to_string());
    }
}
