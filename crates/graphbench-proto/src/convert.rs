//! Converters between proto types and domain types.

use crate::pb;
use chrono::{DateTime, Utc};
use graphbench_core::{Failure, FailureKind, RunDescriptor, RunId, RunMetrics, RunResult};

// ============================================================================
// FailureKind conversions
// ============================================================================

impl From<FailureKind> for pb::FailureKind {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::Init => pb::FailureKind::Init,
            FailureKind::Exec => pb::FailureKind::Exec,
            FailureKind::Collect => pb::FailureKind::Collect,
            FailureKind::Validate => pb::FailureKind::Validate,
            FailureKind::Metrics => pb::FailureKind::Metrics,
        }
    }
}

impl From<pb::FailureKind> for FailureKind {
    fn from(kind: pb::FailureKind) -> Self {
        match kind {
            pb::FailureKind::Unspecified => FailureKind::Init,
            pb::FailureKind::Init => FailureKind::Init,
            pb::FailureKind::Exec => FailureKind::Exec,
            pb::FailureKind::Collect => FailureKind::Collect,
            pb::FailureKind::Validate => FailureKind::Validate,
            pb::FailureKind::Metrics => FailureKind::Metrics,
        }
    }
}

// ============================================================================
// Failure conversions
// ============================================================================

impl From<Failure> for pb::Failure {
    fn from(failure: Failure) -> Self {
        pb::Failure {
            kind: pb::FailureKind::from(failure.kind) as i32,
            detail: failure.detail.unwrap_or_default(),
        }
    }
}

impl From<pb::Failure> for Failure {
    fn from(proto: pb::Failure) -> Self {
        let kind = pb::FailureKind::try_from(proto.kind)
            .unwrap_or(pb::FailureKind::Unspecified)
            .into();
        Failure {
            kind,
            detail: if proto.detail.is_empty() {
                None
            } else {
                Some(proto.detail)
            },
        }
    }
}

// ============================================================================
// RunMetrics conversions
// ============================================================================

impl From<RunMetrics> for pb::RunMetrics {
    fn from(metrics: RunMetrics) -> Self {
        pb::RunMetrics {
            makespan_ms: metrics.makespan_ms,
            processing_time_ms: metrics.processing_time_ms,
            extras: metrics.extras,
        }
    }
}

impl From<pb::RunMetrics> for RunMetrics {
    fn from(proto: pb::RunMetrics) -> Self {
        RunMetrics {
            makespan_ms: proto.makespan_ms,
            processing_time_ms: proto.processing_time_ms,
            extras: proto.extras,
        }
    }
}

// ============================================================================
// RunAssignment conversions
// ============================================================================

impl From<pb::RunAssignment> for RunDescriptor {
    fn from(proto: pb::RunAssignment) -> Self {
        RunDescriptor {
            id: RunId::new(proto.run_id),
            platform: proto.platform,
            algorithm: proto.algorithm,
            dataset: proto.dataset,
            parameters: proto.parameters,
        }
    }
}

// ============================================================================
// RunResult conversions
// ============================================================================

impl From<RunResult> for pb::RunResultReport {
    fn from(result: RunResult) -> Self {
        pb::RunResultReport {
            run_id: result.run_id.into_inner(),
            metrics: Some(result.metrics.into()),
            completed_at_ms: result.completed_at.timestamp_millis(),
        }
    }
}

impl From<pb::RunResultReport> for RunResult {
    fn from(proto: pb::RunResultReport) -> Self {
        RunResult {
            run_id: RunId::new(proto.run_id),
            metrics: proto.metrics.map(Into::into).unwrap_or_default(),
            completed_at: DateTime::<Utc>::from_timestamp_millis(proto.completed_at_ms)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_roundtrip() {
        let kinds = [
            FailureKind::Init,
            FailureKind::Exec,
            FailureKind::Collect,
            FailureKind::Validate,
            FailureKind::Metrics,
        ];

        for kind in kinds {
            let proto: pb::FailureKind = kind.into();
            let back: FailureKind = proto.into();
            assert_eq!(kind, back);
        }
    }

    #[test]
    fn test_failure_roundtrip() {
        let failure = Failure::with_detail(FailureKind::Validate, "output mismatch");
        let proto: pb::Failure = failure.clone().into();
        let back: Failure = proto.into();
        assert_eq!(failure, back);

        let bare = Failure::new(FailureKind::Exec);
        let proto: pb::Failure = bare.clone().into();
        assert!(proto.detail.is_empty());
        let back: Failure = proto.into();
        assert_eq!(bare, back);
    }

    #[test]
    fn test_metrics_roundtrip() {
        let metrics = RunMetrics::new(1_250, 430).with_extra("edges_touched", "90441");
        let proto: pb::RunMetrics = metrics.clone().into();
        let back: RunMetrics = proto.into();
        assert_eq!(metrics, back);
    }

    #[test]
    fn test_assignment_to_descriptor() {
        let proto = pb::RunAssignment {
            run_id: "r7".to_string(),
            platform: "reference".to_string(),
            algorithm: "bfs".to_string(),
            dataset: "example-directed".to_string(),
            parameters: [("source_vertex".to_string(), "1".to_string())].into(),
            issued_at_ms: 0,
        };

        let descriptor: RunDescriptor = proto.into();
        assert_eq!(descriptor.id.as_str(), "r7");
        assert_eq!(descriptor.platform, "reference");
        assert_eq!(descriptor.algorithm, "bfs");
        assert_eq!(descriptor.parameters["source_vertex"], "1");
    }

    #[test]
    fn test_result_report_roundtrip() {
        let result = RunResult::new(RunId::new("r9"), RunMetrics::new(900, 300));
        let proto: pb::RunResultReport = result.clone().into();
        let back: RunResult = proto.into();

        assert_eq!(back.run_id, result.run_id);
        assert_eq!(back.metrics, result.metrics);
        assert_eq!(
            back.completed_at.timestamp_millis(),
            result.completed_at.timestamp_millis()
        );
    }
}
