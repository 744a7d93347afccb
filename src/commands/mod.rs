// Reconciliation commands
pub mod apply;
pub mod destroy;
pub mod plan;
pub mod refresh;

use anyhow::{Context as AnyhowContext, Result};
use std::path::{Path, PathBuf};
use vapi::{ApiClient, DEFAULT_BASE_URL};

use crate::config::Manifest;
use crate::state::SyncState;

/// Parallel reads when refreshing before a plan
pub const REFRESH_JOBS: usize = 4;

/// Global options shared by every command
#[derive(Debug, Clone, Default)]
pub struct Globals {
    pub manifest: PathBuf,
    pub state: Option<PathBuf>,
    pub token: Option<String>,
    pub url: Option<String>,
}

/// Loaded manifest and state, plus what is needed to reach the API
pub struct Session {
    pub manifest: Manifest,
    pub state: SyncState,
    pub state_path: PathBuf,
    token: Option<String>,
    url: String,
}

impl Session {
    /// Load the manifest and its state file
    pub fn open(globals: &Globals) -> Result<Self> {
        let manifest = Manifest::load(&globals.manifest)?;
        Self::with_manifest(globals, manifest)
    }

    /// Like [`Session::open`], but a missing manifest counts as empty
    ///
    /// Destroy only needs state, and should still work after the manifest
    /// has been deleted.
    pub fn open_for_destroy(globals: &Globals) -> Result<Self> {
        let manifest = if globals.manifest.exists() {
            Manifest::load(&globals.manifest)?
        } else {
            log::debug!(
                "Manifest {} not found, destroying from state alone",
                globals.manifest.display()
            );
            Manifest::default()
        };
        Self::with_manifest(globals, manifest)
    }

    fn with_manifest(globals: &Globals, manifest: Manifest) -> Result<Self> {
        let state_path = match &globals.state {
            Some(path) => path.clone(),
            None => SyncState::default_path(&globals.manifest)?,
        };
        let state = SyncState::load(&state_path)?;
        let url = resolve_url(globals.url.as_deref(), manifest.url());

        log::debug!(
            "Using state {} and API {}",
            state_path.display(),
            url
        );

        Ok(Self {
            manifest,
            state,
            state_path,
            token: globals.token.clone(),
            url,
        })
    }

    /// Authenticated API client
    pub fn client(&self) -> Result<ApiClient> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .context("No API token: pass --token or set VAPI_TOKEN")?;
        Ok(ApiClient::new(&self.url, token))
    }

    /// Stamp and persist state
    pub fn save(&mut self) -> Result<()> {
        self.state.touch(&self.state_path)
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }
}

/// Pick the API base URL: flag or environment, then manifest, then default
pub fn resolve_url(flag: Option<&str>, manifest: Option<&str>) -> String {
    flag.or(manifest)
        .filter(|u| !u.trim().is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}
