//! Per-item batch outcomes.
//!
//! Batch scripts process items one at a time; a failure is recorded as a
//! value rather than propagated, so one bad item never aborts the run. Only
//! the aggregate "any item failed" flag reaches the process exit code.

/// Outcome of one batch item.
#[derive(Debug)]
pub struct ItemResult {
    pub label: String,
    /// `None` on success, otherwise the failure diagnostic.
    pub error: Option<String>,
}

impl ItemResult {
    pub fn ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated results of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    items: Vec<ItemResult>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful item.
    pub fn success(&mut self, label: impl Into<String>) {
        let label = label.into();
        log::info!("✓ {label}");
        self.items.push(ItemResult { label, error: None });
    }

    /// Record a failed item with its diagnostic.
    pub fn failure(&mut self, label: impl Into<String>, error: impl std::fmt::Display) {
        let label = label.into();
        let error = error.to_string();
        log::error!("✗ {label}: {error}");
        self.items.push(ItemResult {
            label,
            error: Some(error),
        });
    }

    pub fn items(&self) -> &[ItemResult] {
        &self.items
    }

    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    pub fn all_ok(&self) -> bool {
        self.failed() == 0
    }

    /// Process exit code: 0 if every item succeeded, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.all_ok() {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BatchReport;

    #[test]
    fn counts_and_exit_code() {
        let mut report = BatchReport::new();
        report.success("a");
        report.success("b");
        report.failure("c", "network unreachable");
        report.success("d");

        assert_eq!(report.succeeded(), 3);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_ok());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.items().len(), 4);
        assert_eq!(
            report.items()[2].error.as_deref(),
            Some("network unreachable")
        );
    }

    #[test]
    fn empty_report_is_ok() {
        let report = BatchReport::new();
        assert!(report.all_ok());
        assert_eq!(report.exit_code(), 0);
    }
}
