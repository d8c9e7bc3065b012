//! Staleness gate for generated artifacts.
//!
//! A set of artifacts is fresh only when every file exists and recomputation
//! is not forced. There is no partial recomputation: a stale gate reruns the
//! whole producing step, then checks again.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::error::{AnalysisError, Result};

/// File name of the contact table
pub const CONTACT_TABLE_FILE: &str = "contactData.csv";
/// File name of the message table
pub const MESSAGE_TABLE_FILE: &str = "allMessageData.csv";

/// Locations of the canonical tables of one archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// `<processed root>/<archive id>`
    pub dir: PathBuf,
    /// Contact table path
    pub contacts: PathBuf,
    /// Message table path
    pub messages: PathBuf,
}

impl ArtifactPaths {
    /// Paths for `archive_id` under `processed_root`
    pub fn for_archive(processed_root: &Path, archive_id: &str) -> Self {
        let dir = processed_root.join(archive_id);
        Self {
            contacts: dir.join(CONTACT_TABLE_FILE),
            messages: dir.join(MESSAGE_TABLE_FILE),
            dir,
        }
    }

    /// Both tables, contact table first
    #[must_use]
    pub fn all(&self) -> Vec<PathBuf> {
        vec![self.contacts.clone(), self.messages.clone()]
    }
}

/// Why a gate is stale
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    /// Recomputation was forced
    Forced,
    /// An artifact does not exist
    Missing(PathBuf),
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forced => write!(f, "Debug mode, forcing recomputation"),
            Self::Missing(path) => write!(f, "No file found at {}", path.display()),
        }
    }
}

/// Gate state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// All artifacts exist and recomputation is not forced
    Fresh,
    /// Recomputation is required
    Stale(StaleReason),
}

/// What [`StalenessGate::run`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Existing artifacts were kept
    Reused,
    /// Artifacts were regenerated
    Recomputed,
}

/// First missing artifact, if any
#[must_use]
pub fn first_missing(artifacts: &[PathBuf]) -> Option<&PathBuf> {
    artifacts.iter().find(|p| !p.is_file())
}

/// Decides whether a producing step has to run
#[derive(Debug, Clone)]
pub struct StalenessGate {
    artifacts: Vec<PathBuf>,
    force: bool,
}

impl StalenessGate {
    /// Gate over `artifacts`; `force` makes it always stale
    #[must_use]
    pub fn new(artifacts: Vec<PathBuf>, force: bool) -> Self {
        Self { artifacts, force }
    }

    /// Gate over both canonical tables
    #[must_use]
    pub fn for_tables(paths: &ArtifactPaths, force: bool) -> Self {
        Self::new(paths.all(), force)
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> GateState {
        if let Some(missing) = first_missing(&self.artifacts) {
            return GateState::Stale(StaleReason::Missing(missing.clone()));
        }
        if self.force {
            return GateState::Stale(StaleReason::Forced);
        }
        GateState::Fresh
    }

    /// Run `recompute` unless fresh, then require every artifact to exist
    pub fn run<F>(&self, recompute: F) -> Result<GateOutcome>
    where
        F: FnOnce() -> Result<()>,
    {
        let outcome = match self.state() {
            GateState::Fresh => {
                info!("Using existing processed data");
                GateOutcome::Reused
            }
            GateState::Stale(reason) => {
                info!("{reason}");
                recompute()?;
                GateOutcome::Recomputed
            }
        };

        if let Some(missing) = first_missing(&self.artifacts) {
            error!(path = %missing.display(), "Critical error, artifact still missing");
            return Err(AnalysisError::MissingArtifact {
                reason: StaleReason::Missing(missing.clone()).to_string(),
            });
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_paths_for_archive() {
        let paths = ArtifactPaths::for_archive(Path::new("processed-data"), "fb");
        assert_eq!(paths.contacts, Path::new("processed-data/fb/contactData.csv"));
        assert_eq!(paths.messages, Path::new("processed-data/fb/allMessageData.csv"));
    }

    #[test]
    fn test_state_transitions() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::for_archive(dir.path(), "fb");
        let gate = StalenessGate::for_tables(&paths, false);

        assert_eq!(gate.state(), GateState::Stale(StaleReason::Missing(paths.contacts.clone())));

        fs::create_dir_all(&paths.dir).unwrap();
        fs::write(&paths.contacts, "x").unwrap();
        assert_eq!(gate.state(), GateState::Stale(StaleReason::Missing(paths.messages.clone())));

        fs::write(&paths.messages, "x").unwrap();
        assert_eq!(gate.state(), GateState::Fresh);
        assert_eq!(
            StalenessGate::for_tables(&paths, true).state(),
            GateState::Stale(StaleReason::Forced)
        );
    }

    #[test]
    fn test_run_fails_when_recompute_produces_nothing() {
        let dir = tempdir().unwrap();
        let gate = StalenessGate::new(vec![dir.path().join("out.csv")], false);
        let err = gate.run(|| Ok(())).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingArtifact { .. }));
    }

    #[test]
    fn test_run_skips_when_fresh() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.csv");
        fs::write(&out, "x").unwrap();
        let gate = StalenessGate::new(vec![out], false);
        let outcome = gate
            .run(|| Err(AnalysisError::Other("should not run".to_string())))
            .unwrap();
        assert_eq!(outcome, GateOutcome::Reused);
    }
}
