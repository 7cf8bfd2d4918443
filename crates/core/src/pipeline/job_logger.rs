use std::collections::HashMap;

/// Cross-cutting logger for job orchestration events.
///
/// Keeps timing and status reporting out of the coordination code so
/// callers choose where it goes (log crate, nowhere in tests).
pub trait JobLogger: Send {
    /// Record how long a named job phase took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. rows held by a rank).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-job summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullJobLogger;

impl JobLogger for NullJobLogger {
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Logger backed by the `log` crate that keeps per-stage timings and
/// metrics for a summary at job completion.
#[derive(Default)]
pub struct LogJobLogger {
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    messages: Vec<String>,
}

impl LogJobLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let mut lines = vec!["Job summary:".to_string()];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let total_ms: f64 = self.timings[stage].iter().sum();
            lines.push(format!("  {stage:12}: {total_ms:9.2}ms"));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            let values = &self.metrics[name];
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            lines.push(format!("  {name}: min {min:.0} max {max:.0}"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

impl JobLogger for LogJobLogger {
    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullJobLogger;
        logger.timing("distributed", 5.0);
        logger.metric("rank_rows", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = LogJobLogger::new();
        logger.timing("distributed", 20.0);
        logger.timing("distributed", 30.0);

        let values = logger.timings_for("distributed").unwrap();
        assert_eq!(values.len(), 2);
        assert!((values[1] - 30.0).abs() < f64::EPSILON);
        assert!(logger.timings_for("io").is_none());
    }

    #[test]
    fn test_summary_includes_timing_and_metric_range() {
        let mut logger = LogJobLogger::new();
        logger.timing("distributed", 12.5);
        logger.metric("rank_rows", 3.0);
        logger.metric("rank_rows", 4.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Job summary"));
        assert!(summary.contains("distributed"));
        assert!(summary.contains("rank_rows: min 3 max 4"));
        assert_eq!(logger.metrics_for("rank_rows").unwrap(), &[3.0, 4.0]);
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogJobLogger::new().summary_string().is_none());
    }

    #[test]
    fn test_info_stores_messages() {
        let mut logger = LogJobLogger::new();
        logger.info("hello world");
        assert_eq!(logger.messages, vec!["hello world".to_string()]);
    }
}
