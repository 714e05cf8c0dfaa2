//! Offline command handlers
//!
//! Commands that only read local data: the job manifest, navigation models
//! and record files.

use anyhow::{Context, Result};
use colored::*;
use encore_core::domain::artist::{self, RecordKind};
use encore_core::domain::nav::ArtistNav;
use std::path::Path;

use crate::config::Config;
use crate::render;

/// List the jobs from the configured manifest
pub fn list_jobs(config: &Config) -> Result<()> {
    let manifest = config.load_manifest()?;
    render::print_manifest(&manifest);
    Ok(())
}

/// Print the navigation model for `path`
pub fn show_nav(path: &str, name: Option<&str>, image: Option<&str>) {
    let nav = ArtistNav::new(path, name, image);
    render::print_nav(&nav);
}

/// Validate a JSON record file against its schema
pub fn validate_file(kind: &str, file: &Path) -> Result<()> {
    let kind: RecordKind = kind.parse()?;
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let count = artist::validate(kind, &json)?;

    println!(
        "{} {} ({} {} record(s))",
        "✓".green(),
        file.display().to_string().bold(),
        count,
        kind
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("create temp file");
        write!(file, "{contents}").expect("write json");
        file
    }

    #[test]
    fn test_validate_file() {
        let file = write_json(
            r#"[{"artist_id":"a1","track_id":"t1"},{"artist_id":"a1","track_id":"t2"}]"#,
        );
        assert!(validate_file("artist-tracks", file.path()).is_ok());

        let file = write_json(r#"[{"artist_id":"a1"}]"#);
        assert!(validate_file("artist-tracks", file.path()).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_kind_and_missing_file() {
        let file = write_json("[]");
        assert!(validate_file("playlists", file.path()).is_err());

        let dir = tempfile::tempdir().expect("create temp dir");
        assert!(validate_file("tracks", &dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_list_jobs_from_manifest_file() {
        let file = write_json(
            r#"[{"id": "lastfm-scrobbles", "name": "Scrobbles", "icon": "/images/lastfm.svg", "endpoint": "/api/admin/trigger-lastfm-scrobbles"}]"#,
        );
        let config = Config {
            manifest_path: Some(file.path().to_path_buf()),
            ..Config::default()
        };
        assert!(list_jobs(&config).is_ok());
    }
}
