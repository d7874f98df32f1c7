use anyhow::{Context, Result, bail};
use optspec::{Config, InputMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_NAME: &str = "optspec.json";

/// `optspec.json`: parser configuration plus a list of option declarations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_mode: Option<InputMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_on_unknown: Option<bool>,

    /// Declarations in the order they are registered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDecl>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDecl {
    /// Declaration string, e.g. `-w|--wife=!s`.
    pub spec: String,
    /// Canonical name overriding the one derived from the last handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Manifest {
    /// Apply the settings present in the manifest on top of `base`.
    pub fn apply(&self, mut base: Config) -> Config {
        if let Some(v) = self.case_sensitive {
            base = base.case_sensitive(v);
        }
        if let Some(mode) = self.input_mode {
            base = base.input_mode(mode);
        }
        if let Some(v) = self.error_on_unknown {
            base = base.error_on_unknown(v);
        }
        base
    }
}

#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub path: PathBuf,
    pub manifest: Manifest,
}

/// Load `manifest_path`, or `./optspec.json` when no path is given.
///
/// A missing default manifest is not an error; a missing explicit one is.
pub fn load_manifest(manifest_path: Option<&Path>) -> Result<Option<LoadedManifest>> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let (path, explicit) = match manifest_path {
        Some(p) => (resolve_against(&cwd, p), true),
        None => (cwd.join(DEFAULT_MANIFEST_NAME), false),
    };

    if !path.exists() {
        if explicit {
            bail!("manifest not found: {}", path.display());
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse manifest JSON: {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        options = manifest.options.len(),
        "loaded manifest"
    );
    Ok(Some(LoadedManifest { path, manifest }))
}

pub fn write_default_manifest(project_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_MANIFEST_NAME);
    if dest.exists() && !overwrite {
        bail!("{} already exists (use --force to overwrite)", dest.display());
    }

    let manifest = Manifest {
        schema_version: Some(1),
        case_sensitive: Some(true),
        input_mode: Some(InputMode::Standard),
        error_on_unknown: Some(true),
        options: vec![
            OptionDecl {
                spec: "-v|--verbose*".to_string(),
                name: None,
            },
            OptionDecl {
                spec: "-o|--output=?s".to_string(),
                name: None,
            },
            OptionDecl {
                spec: "-j|--jobs=i".to_string(),
                name: None,
            },
        ],
    };

    let bytes = serde_json::to_vec_pretty(&manifest).context("failed to serialize manifest")?;
    let mut out = String::from_utf8(bytes).context("manifest is not valid UTF-8")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let pid = std::process::id();
        let dir = std::env::temp_dir().join(format!("optspec-{prefix}-{pid}-{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn manifest_deserializes_camel_case() {
        let json = r#"{
  "schemaVersion": 1,
  "caseSensitive": false,
  "inputMode": "bsd",
  "errorOnUnknown": false,
  "options": [
    { "spec": "x" },
    { "spec": "-o|--out=s", "name": "output" }
  ]
}"#;
        let m: Manifest = serde_json::from_str(json).unwrap();
        assert_eq!(m.schema_version, Some(1));
        assert_eq!(m.input_mode, Some(InputMode::Bsd));
        assert_eq!(m.options.len(), 2);
        assert_eq!(m.options[0].spec, "x");
        assert_eq!(m.options[0].name, None);
        assert_eq!(m.options[1].name.as_deref(), Some("output"));

        let cfg = m.apply(Config::default());
        assert!(!cfg.case_sensitive);
        assert!(!cfg.error_on_unknown);
        assert_eq!(cfg.input_mode, InputMode::Bsd);
    }

    #[test]
    fn missing_settings_keep_the_base_config() {
        let m: Manifest = serde_json::from_str(r#"{ "options": [] }"#).unwrap();
        assert_eq!(m.apply(Config::default()), Config::default());
    }

    #[test]
    fn write_default_manifest_round_trips() {
        let dir = make_temp_dir("manifest-defaults");
        let dest = write_default_manifest(&dir, false).unwrap();
        let contents = fs::read_to_string(&dest).unwrap();
        let m: Manifest = serde_json::from_str(&contents).unwrap();
        assert_eq!(m.schema_version, Some(1));
        assert_eq!(m.input_mode, Some(InputMode::Standard));
        assert!(m.options.iter().any(|o| o.spec == "-v|--verbose*"));

        assert!(write_default_manifest(&dir, false).is_err());
        write_default_manifest(&dir, true).unwrap();

        let _ = fs::remove_dir_all(&dir);
    }
}
