//! Validation of the protocol environment variables.
//!
//! Every variable is read and checked before anything is applied, so a
//! malformed value aborts the request without touching any plugin.

use std::path::PathBuf;

use nsattach_common::config::AttachEnv;
use nsattach_common::constants::{DEFAULT_IFNAME, DEFAULT_NET_DIR, ENV_CAPABILITY_ARGS};
use nsattach_common::error::{AttachError, Result};
use serde_json::{Map, Value};

/// Validated parameters that do not depend on the namespace path.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedParams {
    /// Directory searched for network configuration lists.
    pub net_dir: PathBuf,
    /// Ordered plugin binary directories.
    pub plugin_path: Vec<PathBuf>,
    /// Capability data forwarded to plugins; empty when none was supplied.
    pub capability_args: Map<String, Value>,
    /// `CNI_ARGS` pairs in source order.
    pub cni_args: Vec<(String, String)>,
    /// Interface name to create inside the namespace.
    pub ifname: String,
}

/// Validates the environment snapshot and applies defaults.
///
/// # Errors
///
/// Returns [`AttachError::Config`] if `CAP_ARGS` is not a JSON object or
/// any `CNI_ARGS` pair is malformed.
pub fn collect(env: &AttachEnv) -> Result<CollectedParams> {
    let net_dir = env
        .net_dir
        .as_deref()
        .filter(|dir| !dir.is_empty())
        .unwrap_or(DEFAULT_NET_DIR);

    let plugin_path = env
        .cni_path
        .as_deref()
        .map(split_plugin_path)
        .unwrap_or_default();

    let capability_args = match env.capability_args.as_deref() {
        Some(raw) if !raw.is_empty() => parse_capability_args(raw)?,
        _ => Map::new(),
    };

    let cni_args = match env.cni_args.as_deref() {
        Some(raw) if !raw.is_empty() => parse_cni_args(raw)?,
        _ => Vec::new(),
    };

    let ifname = env
        .ifname
        .clone()
        .unwrap_or_else(|| DEFAULT_IFNAME.to_string());

    tracing::debug!(
        net_dir,
        plugin_dirs = plugin_path.len(),
        capability_keys = capability_args.len(),
        cni_args = cni_args.len(),
        ifname = %ifname,
        "collected attach parameters"
    );

    Ok(CollectedParams {
        net_dir: PathBuf::from(net_dir),
        plugin_path,
        capability_args,
        cni_args,
        ifname,
    })
}

/// Splits a platform path list into directories, keeping their order.
///
/// An empty list yields no directories.
pub fn split_plugin_path(raw: &str) -> Vec<PathBuf> {
    if raw.is_empty() {
        return Vec::new();
    }
    std::env::split_paths(raw).collect()
}

/// Parses capability data as a JSON object.
///
/// A literal `null` is accepted and yields an empty map.
///
/// # Errors
///
/// Returns [`AttachError::Config`] if the value is not a JSON object.
pub fn parse_capability_args(raw: &str) -> Result<Map<String, Value>> {
    let parsed: Option<Map<String, Value>> =
        serde_json::from_str(raw).map_err(|e| AttachError::Config {
            message: format!("malformed {ENV_CAPABILITY_ARGS}: {e}"),
        })?;
    Ok(parsed.unwrap_or_default())
}

/// Parses `;`-separated `key=value` pairs.
///
/// Each pair is split on its first `=`; both halves must be non-empty.
///
/// # Errors
///
/// Returns [`AttachError::Config`] naming the first offending pair verbatim.
pub fn parse_cni_args(raw: &str) -> Result<Vec<(String, String)>> {
    raw.split(';')
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                Ok((key.to_string(), value.to_string()))
            }
            _ => Err(AttachError::Config {
                message: format!("invalid CNI_ARGS pair \"{pair}\""),
            }),
        })
        .collect()
}
