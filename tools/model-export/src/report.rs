//! Per-entity outcome of a conversion batch.

use std::fmt;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Mesh,
    Material,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Mesh => write!(f, "mesh"),
            EntityKind::Material => write!(f, "material"),
        }
    }
}

/// One entity that could not be converted.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFailure {
    pub kind: EntityKind,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    Complete,
    CompletedWithErrors,
    Failed,
}

impl ExportStatus {
    pub fn exit_code(self) -> ExitCode {
        match self {
            ExportStatus::Complete => ExitCode::SUCCESS,
            ExportStatus::Failed => ExitCode::from(1),
            ExportStatus::CompletedWithErrors => ExitCode::from(2),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionReport {
    pub succeeded: usize,
    pub failures: Vec<EntityFailure>,
}

impl ConversionReport {
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Record a failed entity and log it.
    pub fn record_failure(
        &mut self,
        kind: EntityKind,
        name: impl Into<String>,
        error: &dyn std::error::Error,
    ) {
        let name = name.into();
        let reason = error.to_string();
        tracing::warn!("Failed to convert {} {:?}: {}", kind, name, reason);
        self.failures.push(EntityFailure { kind, name, reason });
    }

    pub fn status(&self) -> ExportStatus {
        match (self.failures.is_empty(), self.succeeded) {
            (true, _) => ExportStatus::Complete,
            (false, 0) => ExportStatus::Failed,
            (false, _) => ExportStatus::CompletedWithErrors,
        }
    }

    pub fn log_summary(&self) {
        match self.status() {
            ExportStatus::Complete => {
                tracing::info!("Converted {} entities", self.succeeded)
            }
            _ => {
                tracing::warn!(
                    "Converted {} entities, {} failed",
                    self.succeeded,
                    self.failures.len()
                );
                for failure in &self.failures {
                    tracing::warn!("  {} {:?}: {}", failure.kind, failure.name, failure.reason);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MaterialError;

    #[test]
    fn test_status() {
        let mut report = ConversionReport::default();
        assert_eq!(report.status(), ExportStatus::Complete);

        report.record_failure(
            EntityKind::Material,
            "skin",
            &MaterialError::MissingShaderGraph("skin".into()),
        );
        assert_eq!(report.status(), ExportStatus::Failed);

        report.record_success();
        assert_eq!(report.status(), ExportStatus::CompletedWithErrors);
        assert_eq!(report.failures[0].kind, EntityKind::Material);
        assert!(report.failures[0].reason.contains("\"skin\""));
    }
}
