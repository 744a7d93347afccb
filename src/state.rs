use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use vapi::{Assistant, File, QueryTool, SipTrunk, SipTrunkPhoneNumber, Tool, TwilioPhoneNumber};

/// Current state file format
const STATE_VERSION: u32 = 1;

// ============================================================================
// State Structures
// ============================================================================

/// Last observed state of every resource this tool manages
///
/// Holds write-only inputs (secrets, auth tokens) as they were declared,
/// so the file should be treated as sensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncState {
    /// State file format version
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub files: BTreeMap<String, File>,
    #[serde(default)]
    pub sip_trunks: BTreeMap<String, SipTrunk>,
    #[serde(default)]
    pub tools: BTreeMap<String, Tool>,
    #[serde(default)]
    pub query_tools: BTreeMap<String, QueryTool>,
    #[serde(default)]
    pub assistants: BTreeMap<String, Assistant>,
    #[serde(default)]
    pub twilio_phone_numbers: BTreeMap<String, TwilioPhoneNumber>,
    #[serde(default)]
    pub sip_trunk_phone_numbers: BTreeMap<String, SipTrunkPhoneNumber>,

    /// Last time the state was updated
    pub last_updated: DateTime<Utc>,
}

fn default_version() -> u32 {
    STATE_VERSION
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            files: BTreeMap::new(),
            sip_trunks: BTreeMap::new(),
            tools: BTreeMap::new(),
            query_tools: BTreeMap::new(),
            assistants: BTreeMap::new(),
            twilio_phone_numbers: BTreeMap::new(),
            sip_trunk_phone_numbers: BTreeMap::new(),
            last_updated: Utc::now(),
        }
    }
}

// ============================================================================
// SyncState Implementation
// ============================================================================

impl SyncState {
    /// Get the state directory path (~/.local/state/vapi-sync)
    pub fn state_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".local").join("state").join("vapi-sync"))
    }

    /// Default state file for a manifest, named after its file stem
    pub fn default_path(manifest: &Path) -> Result<PathBuf> {
        let stem = manifest
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("vapi-sync");
        Ok(Self::state_dir()?.join(format!("{stem}.json")))
    }

    /// Load state from disk, or return default if the file doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("State file {} does not exist, using empty state", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        let state: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        if state.version > STATE_VERSION {
            anyhow::bail!(
                "State file {} has version {}, this build understands up to {}",
                path.display(),
                state.version,
                STATE_VERSION
            );
        }

        log::debug!("Loaded state from {}", path.display());
        Ok(state)
    }

    /// Save state to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
        }

        let content =
            serde_json::to_string_pretty(&self).context("Failed to serialize state to JSON")?;

        // Atomic replace: write a sibling file, then rename over the old one.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &content)
            .with_context(|| format!("Failed to write state file: {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace state file: {}", path.display()))?;

        log::debug!("Saved state to {}", path.display());
        Ok(())
    }

    /// Update the last_updated timestamp and save
    pub fn touch(&mut self, path: &Path) -> Result<()> {
        self.last_updated = Utc::now();
        self.save(path)
    }

    /// Total number of resources held
    pub fn total(&self) -> usize {
        self.files.len()
            + self.sip_trunks.len()
            + self.tools.len()
            + self.query_tools.len()
            + self.assistants.len()
            + self.twilio_phone_numbers.len()
            + self.sip_trunk_phone_numbers.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
