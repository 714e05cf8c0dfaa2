//! Job manifest
//!
//! The static list of jobs a panel session is built from. Jobs keep the
//! manifest's order for display.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use super::job::MetricJob;

/// One manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub endpoint: String,
}

/// Errors raised while loading a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("manifest contains no jobs")]
    Empty,

    #[error("job #{0} has an empty {1}")]
    Blank(usize, &'static str),

    #[error("duplicate job id: {0}")]
    DuplicateId(String),
}

/// Validated, ordered list of job specs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobManifest {
    specs: Vec<JobSpec>,
}

impl JobManifest {
    /// Builds a manifest, rejecting empty lists, blank ids/endpoints and duplicate ids
    pub fn new(specs: Vec<JobSpec>) -> Result<Self, ManifestError> {
        if specs.is_empty() {
            return Err(ManifestError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, spec) in specs.iter().enumerate() {
            if spec.id.trim().is_empty() {
                return Err(ManifestError::Blank(index, "id"));
            }
            if spec.endpoint.trim().is_empty() {
                return Err(ManifestError::Blank(index, "endpoint"));
            }
            if !seen.insert(spec.id.as_str()) {
                return Err(ManifestError::DuplicateId(spec.id.clone()));
            }
        }

        Ok(Self { specs })
    }

    /// Parses a JSON array of job specs
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let specs: Vec<JobSpec> = serde_json::from_str(json)?;
        Self::new(specs)
    }

    /// Reads a JSON manifest file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn specs(&self) -> &[JobSpec] {
        &self.specs
    }

    /// Creates idle, never-run jobs in manifest order
    pub fn jobs(&self) -> Vec<MetricJob> {
        self.specs
            .iter()
            .map(|spec| MetricJob::new(&spec.id, &spec.name, &spec.icon, &spec.endpoint))
            .collect()
    }
}

impl Default for JobManifest {
    /// The Spotify and YouTube collection jobs exposed by the dashboard API
    fn default() -> Self {
        let spec = |id: &str, name: &str, icon: &str| JobSpec {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            endpoint: format!("/api/admin/trigger-{}", id),
        };

        Self {
            specs: vec![
                spec("spotify-listeners", "Monthly Listeners", "/images/spotify.svg"),
                spec("spotify-followers", "Followers", "/images/spotify.svg"),
                spec("youtube-metrics", "Subscribers", "/images/youtube.svg"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::JobStatus;

    #[test]
    fn test_default_manifest() {
        let manifest = JobManifest::default();
        let ids: Vec<_> = manifest.specs().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["spotify-listeners", "spotify-followers", "youtube-metrics"]
        );
        assert_eq!(
            manifest.specs()[2].endpoint,
            "/api/admin/trigger-youtube-metrics"
        );
        assert!(JobManifest::new(manifest.specs().to_vec()).is_ok());
    }

    #[test]
    fn test_jobs_preserve_order_and_start_idle() {
        let jobs = JobManifest::default().jobs();
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].name, "Monthly Listeners");
        assert!(jobs.iter().all(|j| j.status == JobStatus::Idle));
    }

    #[test]
    fn test_from_json() {
        let manifest = JobManifest::from_json(
            r#"[{"id": "a", "name": "A", "icon": "/a.svg", "endpoint": "/api/a"}]"#,
        )
        .unwrap();
        assert_eq!(manifest.specs().len(), 1);
    }

    #[test]
    fn test_from_file_keeps_order() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        write!(
            file,
            r#"[
                {{"id": "youtube-metrics", "name": "Subscribers", "icon": "/images/youtube.svg", "endpoint": "/api/admin/trigger-youtube-metrics"}},
                {{"id": "spotify-listeners", "name": "Monthly Listeners", "icon": "/images/spotify.svg", "endpoint": "/api/admin/trigger-spotify-listeners"}}
            ]"#
        )
        .expect("write manifest");

        let manifest = JobManifest::from_file(file.path()).unwrap();
        let ids: Vec<_> = manifest.jobs().into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["youtube-metrics", "spotify-listeners"]);
        assert!(matches!(
            JobManifest::from_file(file.path().with_extension("missing")),
            Err(ManifestError::Io(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = JobManifest::from_json(
            r#"[
                {"id": "a", "name": "A", "icon": "", "endpoint": "/api/a"},
                {"id": "a", "name": "B", "icon": "", "endpoint": "/api/b"}
            ]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn test_rejects_empty_and_blank() {
        assert!(matches!(
            JobManifest::from_json("[]"),
            Err(ManifestError::Empty)
        ));
        assert!(matches!(
            JobManifest::from_json(r#"[{"id": "a", "name": "A", "icon": "", "endpoint": " "}]"#),
            Err(ManifestError::Blank(0, "endpoint"))
        ));
    }
}
