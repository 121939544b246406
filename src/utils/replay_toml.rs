//! Load `.s3replay.toml` (CLI only). Lib callers build [`RunConfig`](crate::RunConfig) themselves.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::utils::config::UsageError;

#[derive(Debug, Default, Deserialize)]
pub struct ReplayToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    region: Option<String>,
    account: Option<String>,
    s3path: Option<String>,
    topic: Option<String>,
    concurrency: Option<usize>,
    limit: Option<u64>,
    interactive: Option<bool>,
    verbose: Option<bool>,
}

/// Parse a config file body.
pub fn parse_replay_toml(s: &str) -> Result<ReplayToml> {
    toml::from_str(s).map_err(|e| UsageError::new(format!("invalid config: {e}")).into())
}

/// Load the config file at `path`. A missing file is `Ok(None)` unless `required`
/// (i.e. the user named it with `--config`).
pub fn load_replay_toml(path: &Path, required: bool) -> Result<Option<ReplayToml>> {
    let s = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(UsageError::new(format!("read {}: {}", path.display(), e)).into());
        }
    };
    let parsed = parse_replay_toml(&s)
        .map_err(|e| UsageError::new(format!("{}: {}", path.display(), e)))?;
    log::debug!("Loaded settings from {}", path.display());
    Ok(Some(parsed))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($s:expr, $opts:expr, $field:ident => Some $opts_field:ident) => {
        if let Some(v) = $s.$field.clone() {
            $opts.$opts_field = Some(v);
        }
    };
    ($s:expr, $opts:expr, $field:ident => $opts_field:ident) => {
        if let Some(v) = $s.$field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
pub fn apply_file_to_opts(file: &ReplayToml, opts: &mut Opts) {
    let s = &file.settings;
    apply_file_opt!(s, opts, region => Some region);
    apply_file_opt!(s, opts, account => Some account);
    apply_file_opt!(s, opts, s3path => Some s3_path);
    apply_file_opt!(s, opts, topic => Some topic);
    apply_file_opt!(s, opts, concurrency => concurrency);
    apply_file_opt!(s, opts, limit => limit);
    apply_file_opt!(s, opts, interactive => interactive);
    apply_file_opt!(s, opts, verbose => verbose);
}
