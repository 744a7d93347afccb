//! Manifest loading
//!
//! The manifest is a TOML file with one table per resource kind, keyed by
//! a local name:
//!
//! ```toml
//! [provider]
//! url = "https://api.vapi.ai"
//!
//! [files.faq]
//! file_path = "docs/faq.txt"
//!
//! [assistants.support]
//! name = "Support"
//! silence_timeout_seconds = 30
//! ```

use anyhow::{Context, Result};
use declarative::Resource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use vapi::{Assistant, File, QueryTool, SipTrunk, SipTrunkPhoneNumber, Tool, TwilioPhoneNumber};

/// Provider settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// API base URL
    #[serde(default)]
    pub url: Option<String>,
}

/// Declared resources, keyed by local name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub provider: ProviderConfig,
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
}

impl Manifest {
    /// Load a manifest and resolve local file paths against its directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read manifest {}", path.display()))?;
        let mut manifest = Self::parse(&content)
            .with_context(|| format!("Invalid manifest {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        manifest.resolve_paths(base);
        Ok(manifest)
    }

    /// Parse manifest TOML
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check local invariants the API cannot report
    fn validate(&self) -> Result<()> {
        for (key, file) in &self.files {
            if file.file_path.as_os_str().is_empty() {
                anyhow::bail!("files.{key}: file_path is required");
            }
        }
        check_unbound("files", &self.files)?;
        check_unbound("sip_trunks", &self.sip_trunks)?;
        check_unbound("tools", &self.tools)?;
        check_unbound("query_tools", &self.query_tools)?;
        check_unbound("assistants", &self.assistants)?;
        check_unbound("twilio_phone_numbers", &self.twilio_phone_numbers)?;
        check_unbound("sip_trunk_phone_numbers", &self.sip_trunk_phone_numbers)?;
        Ok(())
    }

    /// Expand `~` and make relative file paths absolute
    fn resolve_paths(&mut self, base: &Path) {
        for file in self.files.values_mut() {
            file.file_path = resolve_path(base, &file.file_path);
        }
    }

    /// API base URL from the manifest, if set
    pub fn url(&self) -> Option<&str> {
        self.provider.url.as_deref()
    }

    /// Total number of declared resources
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

/// Identifiers and applied payloads live in state, never in the manifest
fn check_unbound<R: Resource>(section: &str, declared: &BTreeMap<String, R>) -> Result<()> {
    for (key, resource) in declared {
        if !resource.id().is_empty() {
            anyhow::bail!("{section}.{key}: id is assigned remotely and cannot be declared");
        }
        if resource.applied().is_some() {
            anyhow::bail!("{section}.{key}: applied is recorded state and cannot be declared");
        }
    }
    Ok(())
}

/// Resolve a declared path against the manifest directory
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let expanded = PathBuf::from(shellexpand::tilde(&raw).as_ref());
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::Value;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[provider]
url = "https://api.example.com"

[files.faq]
file_path = "docs/faq.txt"

[tools.weather]
type = "function"

[tools.weather.function]
name = "get_weather"

[tools.weather.function.parameters]
type = "object"
required = ["city"]

[tools.weather.function.parameters.properties.city]
type = "string"
description = "City"
minLength = 2

[assistants.support]
name = "Support"
silence_timeout_seconds = 0
response_delay_seconds = 1

[assistants.support.model]
provider = "openai"
model = "gpt-4o"
tool_ids = ["t-1"]
"#;

    #[test]
    fn test_parse_sample() {
        let manifest = Manifest::parse(SAMPLE).unwrap();
        assert_eq!(manifest.url(), Some("https://api.example.com"));
        assert_eq!(manifest.total(), 3);

        let support = &manifest.assistants["support"];
        assert_eq!(support.silence_timeout_seconds, Value::Present(0));
        assert_eq!(support.max_duration_seconds, Value::Unset);
        assert_eq!(support.response_delay_seconds, Value::Present(1.0));

        let weather = &manifest.tools["weather"];
        let params = weather.function.as_ref().unwrap().parameters.as_ref().unwrap();
        assert_eq!(params.required, vec!["city"]);
        assert_eq!(
            params.properties["city"].extra["minLength"],
            serde_json::json!(2)
        );
    }

    #[test]
    fn test_unknown_table_is_rejected() {
        let err = Manifest::parse("[widgets.a]\nname = \"x\"\n").unwrap_err();
        assert!(err.to_string().contains("widgets"));
    }

    #[test]
    fn test_file_path_required() {
        let err = Manifest::parse("[files.faq]\n").unwrap_err();
        assert!(err.to_string().contains("file_path"));
    }

    #[test]
    fn test_declared_id_is_rejected() {
        let err = Manifest::parse("[tools.t]\nid = \"t-1\"\n").unwrap_err();
        assert!(err.to_string().contains("tools.t"));
    }

    #[test]
    fn test_declared_applied_payload_is_rejected() {
        let err = Manifest::parse("[assistants.a]\napplied = { name = \"x\" }\n").unwrap_err();
        assert!(err.to_string().contains("assistants.a: applied"));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vapi-sync.toml");
        fs::write(&path, "[files.faq]\nfile_path = \"docs/faq.txt\"\n").unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(
            manifest.files["faq"].file_path,
            dir.path().join("docs/faq.txt")
        );
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/work");
        assert_eq!(
            resolve_path(base, Path::new("/abs/a.txt")),
            PathBuf::from("/abs/a.txt")
        );
        assert_eq!(
            resolve_path(base, Path::new("rel/a.txt")),
            PathBuf::from("/work/rel/a.txt")
        );
        if let Some(home) = dirs::home_dir() {
            assert_eq!(resolve_path(base, Path::new("~/a.txt")), home.join("a.txt"));
        }
    }

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let err = Manifest::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Could not read manifest"));
    }
}
