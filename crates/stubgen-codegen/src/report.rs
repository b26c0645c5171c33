//! Per-run generation report.

use crate::pipeline::Surface;
use serde::Serialize;
use std::collections::HashMap;
use stubgen_core::EntityKind;
use tracing::warn;

/// An entity that made it into the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedEntity {
    /// Entity kind
    pub kind: EntityKind,
    /// Generated function name
    pub name: String,
}

/// An entity left out of the output, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntity {
    /// Entity kind
    pub kind: EntityKind,
    /// Name as listed in the manifest or located in the document
    pub name: String,
    /// Why it was skipped
    pub reason: String,
}

impl SkippedEntity {
    /// Creates a skip record.
    #[must_use]
    pub fn new(kind: EntityKind, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Summary of one generation run.
///
/// # Examples
///
/// ```
/// use stubgen_codegen::{GenerationReport, Surface};
/// use stubgen_core::EntityKind;
///
/// let mut report = GenerationReport::new(Surface::Rest);
/// report.record_generated(EntityKind::Endpoint, "healthcheck");
/// report.record_generated(EntityKind::Definition, "create_api_session");
///
/// assert_eq!(report.count(EntityKind::Endpoint), 1);
/// assert!(report.collisions.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Surface the run generated
    pub surface: Surface,
    /// Entities emitted, in emission order
    pub generated: Vec<GeneratedEntity>,
    /// Entities skipped, one entry each
    pub skipped: Vec<SkippedEntity>,
    /// Generated names that were emitted more than once
    pub collisions: Vec<String>,
    /// Size of the generated text in bytes
    pub bytes: usize,
}

impl GenerationReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new(surface: Surface) -> Self {
        Self {
            surface,
            generated: Vec::new(),
            skipped: Vec::new(),
            collisions: Vec::new(),
            bytes: 0,
        }
    }

    /// Records an emitted entity.
    pub fn record_generated(&mut self, kind: EntityKind, name: impl Into<String>) {
        self.generated.push(GeneratedEntity {
            kind,
            name: name.into(),
        });
    }

    /// Records a skipped entity.
    pub fn record_skip(&mut self, skip: SkippedEntity) {
        self.skipped.push(skip);
    }

    /// Number of emitted entities of `kind`.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.generated.iter().filter(|e| e.kind == kind).count()
    }

    /// Finds generated names emitted more than once and records them.
    ///
    /// Later definitions win at load time in Lua, so collisions are reported
    /// but the output is left as is.
    pub fn detect_collisions(&mut self) {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for entity in &self.generated {
            *seen.entry(entity.name.as_str()).or_default() += 1;
        }

        let mut collisions = Vec::new();
        for entity in &self.generated {
            if seen.get(entity.name.as_str()).is_some_and(|n| *n > 1)
                && !collisions.contains(&entity.name)
            {
                warn!(name = %entity.name, "Generated name collision, last definition wins");
                collisions.push(entity.name.clone());
            }
        }
        self.collisions = collisions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_collisions_once_per_name() {
        let mut report = GenerationReport::new(Surface::Realtime);
        report.record_generated(EntityKind::Message, "status_update");
        report.record_generated(EntityKind::Message, "party_join");
        report.record_generated(EntityKind::Message, "status_update");
        report.record_generated(EntityKind::Message, "status_update");
        report.detect_collisions();
        assert_eq!(report.collisions, ["status_update"]);
    }

    #[test]
    fn test_serializes_kinds_lowercase() {
        let mut report = GenerationReport::new(Surface::Rest);
        report.record_generated(EntityKind::Endpoint, "healthcheck");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["surface"], "rest");
        assert_eq!(json["generated"][0]["kind"], "endpoint");
    }
}
