//! Structured diagnostic reports, report sinks, and aggregate counters.
//!
//! Every prediction-path condition worth surfacing is materialized as a
//! [`Report`] and handed to a [`ReportSink`]; the content of the report is
//! part of the observable contract, the sink decides where it goes.

use crate::fault::PredictFault;

/// Severity carried by a diagnostic report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Severity {
    /// Informational; no state was affected.
    Info,
    /// An error was detected; the observation stream continues.
    Error,
    /// Unrecoverable configuration error; the triggering call was aborted.
    Fatal,
}

/// Short category tag classifying a diagnostic report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ReportTag {
    /// An address was re-observed within an in-progress accumulation.
    Collision,
    /// A resolved address was absent from its register's expected set.
    InternalLookupFailure,
    /// Incomplete accumulations remained at the lifecycle checkpoint.
    PendingAtCheckpoint,
    /// No bus adapter was configured at first use.
    MissingAdapter,
    /// An assembled read value disagreed with the mirrored value.
    MirrorMismatch,
    /// A transfer resolved to no register and was discarded.
    NotApplicable,
}

impl ReportTag {
    /// Returns the stable short tag string for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collision => "collision",
            Self::InternalLookupFailure => "internal-lookup-failure",
            Self::PendingAtCheckpoint => "pending-at-checkpoint",
            Self::MissingAdapter => "fatal-missing-adapter",
            Self::MirrorMismatch => "mirror-mismatch",
            Self::NotApplicable => "not-applicable",
        }
    }
}

/// One structured diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Report {
    /// Severity of the reported condition.
    pub severity: Severity,
    /// Short category tag.
    pub tag: ReportTag,
    /// Human-readable description.
    pub message: String,
}

impl Report {
    /// Creates a report from its parts.
    #[must_use]
    pub fn new(severity: Severity, tag: ReportTag, message: impl Into<String>) -> Self {
        Self {
            severity,
            tag,
            message: message.into(),
        }
    }

    /// Creates the canonical report for a prediction fault.
    #[must_use]
    pub fn from_fault(fault: &PredictFault) -> Self {
        Self {
            severity: fault.severity(),
            tag: fault.tag(),
            message: fault.to_string(),
        }
    }
}

/// Sink trait receiving diagnostic reports in emission order.
pub trait ReportSink {
    /// Records one report.
    fn report(&mut self, report: Report);
}

/// Report sink that retains every report for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    /// Reports in emission order.
    pub reports: Vec<Report>,
}

impl RecordingReporter {
    /// Creates an empty recording reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of recorded reports carrying `tag`.
    #[must_use]
    pub fn count_of(&self, tag: ReportTag) -> usize {
        self.reports.iter().filter(|report| report.tag == tag).count()
    }

    /// Returns `true` when at least one report carries `tag`.
    #[must_use]
    pub fn has(&self, tag: ReportTag) -> bool {
        self.count_of(tag) > 0
    }
}

impl ReportSink for RecordingReporter {
    fn report(&mut self, report: Report) {
        self.reports.push(report);
    }
}

/// Report sink that drops every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ReportSink for NullReporter {
    fn report(&mut self, _report: Report) {}
}

/// Saturating per-category report counters owned by the prediction engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ReportCounters {
    /// Collision discards observed.
    pub collision_count: u16,
    /// Internal slot-lookup failures observed.
    pub lookup_failure_count: u16,
    /// Checkpoint audits that found pending entries.
    pub pending_at_checkpoint_count: u16,
    /// Calls aborted for a missing adapter.
    pub missing_adapter_count: u16,
    /// Read-check mismatches against mirrored values.
    pub mirror_mismatch_count: u16,
    /// Transfers discarded as not applicable to any register.
    pub not_applicable_count: u16,
    /// Completed accesses published downstream.
    pub published_count: u16,
}

impl ReportCounters {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one report into its category counter.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record(&mut self, report: &Report) {
        match report.tag {
            ReportTag::Collision => {
                self.collision_count = self.collision_count.saturating_add(1);
            }
            ReportTag::InternalLookupFailure => {
                self.lookup_failure_count = self.lookup_failure_count.saturating_add(1);
            }
            ReportTag::PendingAtCheckpoint => {
                self.pending_at_checkpoint_count =
                    self.pending_at_checkpoint_count.saturating_add(1);
            }
            ReportTag::MissingAdapter => {
                self.missing_adapter_count = self.missing_adapter_count.saturating_add(1);
            }
            ReportTag::MirrorMismatch => {
                self.mirror_mismatch_count = self.mirror_mismatch_count.saturating_add(1);
            }
            ReportTag::NotApplicable => {
                self.not_applicable_count = self.not_applicable_count.saturating_add(1);
            }
        }
    }

    /// Records one published completion with saturating behavior.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_published(&mut self) {
        self.published_count = self.published_count.saturating_add(1);
    }

    /// Resets all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{
        RecordingReporter, Report, ReportCounters, ReportSink, ReportTag, Severity,
    };
    use crate::fault::PredictFault;

    #[test]
    fn tag_strings_are_stable() {
        assert_eq!(ReportTag::Collision.as_str(), "collision");
        assert_eq!(
            ReportTag::InternalLookupFailure.as_str(),
            "internal-lookup-failure"
        );
        assert_eq!(
            ReportTag::PendingAtCheckpoint.as_str(),
            "pending-at-checkpoint"
        );
        assert_eq!(ReportTag::MissingAdapter.as_str(), "fatal-missing-adapter");
        assert_eq!(ReportTag::MirrorMismatch.as_str(), "mirror-mismatch");
        assert_eq!(ReportTag::NotApplicable.as_str(), "not-applicable");
    }

    #[test]
    fn fault_report_carries_fault_severity_tag_and_display_text() {
        let report = Report::from_fault(&PredictFault::MissingAdapter);
        assert_eq!(report.severity, Severity::Fatal);
        assert_eq!(report.tag, ReportTag::MissingAdapter);
        assert!(report.message.contains("adapter"));
    }

    #[test]
    fn recording_reporter_counts_by_tag() {
        let mut reporter = RecordingReporter::new();
        reporter.report(Report::new(Severity::Info, ReportTag::NotApplicable, "a"));
        reporter.report(Report::new(Severity::Error, ReportTag::Collision, "b"));
        reporter.report(Report::new(Severity::Info, ReportTag::NotApplicable, "c"));

        assert_eq!(reporter.count_of(ReportTag::NotApplicable), 2);
        assert_eq!(reporter.count_of(ReportTag::Collision), 1);
        assert!(reporter.has(ReportTag::Collision));
        assert!(!reporter.has(ReportTag::MirrorMismatch));
    }

    #[test]
    fn counters_dispatch_by_tag() {
        let mut counters = ReportCounters::new();
        counters.record(&Report::new(Severity::Error, ReportTag::Collision, ""));
        counters.record(&Report::new(
            Severity::Error,
            ReportTag::InternalLookupFailure,
            "",
        ));
        counters.record(&Report::new(
            Severity::Error,
            ReportTag::PendingAtCheckpoint,
            "",
        ));
        counters.record(&Report::new(Severity::Fatal, ReportTag::MissingAdapter, ""));
        counters.record(&Report::new(Severity::Error, ReportTag::MirrorMismatch, ""));
        counters.record(&Report::new(Severity::Info, ReportTag::NotApplicable, ""));

        assert_eq!(counters.collision_count, 1);
        assert_eq!(counters.lookup_failure_count, 1);
        assert_eq!(counters.pending_at_checkpoint_count, 1);
        assert_eq!(counters.missing_adapter_count, 1);
        assert_eq!(counters.mirror_mismatch_count, 1);
        assert_eq!(counters.not_applicable_count, 1);
    }

    #[test]
    fn counters_saturate_at_max() {
        let mut counters = ReportCounters::new();
        let report = Report::new(Severity::Error, ReportTag::Collision, "");
        for _ in 0..0x2_0000 {
            counters.record(&report);
        }
        assert_eq!(counters.collision_count, u16::MAX);

        for _ in 0..0x2_0000 {
            counters.record_published();
        }
        assert_eq!(counters.published_count, u16::MAX);
    }

    #[test]
    fn reset_returns_counters_to_zero() {
        let mut counters = ReportCounters::new();
        counters.record_published();
        counters.record(&Report::new(Severity::Error, ReportTag::Collision, ""));
        counters.reset();
        assert_eq!(counters, ReportCounters::new());
    }
}
