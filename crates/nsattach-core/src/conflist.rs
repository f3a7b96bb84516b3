//! Network configuration lists and their on-disk loader.
//!
//! A list is an ordered chain of plugin configurations applied together.
//! Lists live in `.conflist` files; a single-plugin `.conf` or `.json`
//! file is accepted as a one-element list.

use std::path::{Path, PathBuf};

use nsattach_common::constants::{CONF_EXTENSIONS, CONFLIST_EXTENSION};
use nsattach_common::error::{AttachError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// One plugin entry of a configuration list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginConfig {
    /// Plugin binary name (the `type` key).
    #[serde(rename = "type")]
    pub plugin_type: String,
    /// Complete plugin configuration as it appeared on disk.
    #[serde(skip)]
    pub raw: Value,
}

/// Validated network configuration list, passed through unmodified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkConfigList {
    /// Network name.
    pub name: String,
    /// Declared CNI specification version, if any.
    #[serde(rename = "cniVersion", skip_serializing_if = "Option::is_none")]
    pub cni_version: Option<String>,
    /// Whether the list opts out of the check verb.
    #[serde(rename = "disableCheck")]
    pub disable_check: bool,
    /// Plugin chain in execution order.
    pub plugins: Vec<PluginConfig>,
    /// Complete list document as it appeared on disk.
    #[serde(skip)]
    pub raw: Value,
}

impl NetworkConfigList {
    /// Parses and validates a `.conflist` document.
    ///
    /// # Errors
    ///
    /// Returns [`AttachError::Load`] if the document is not a JSON object,
    /// lacks a name, or has a missing, empty, or malformed `plugins` array.
    pub fn from_bytes(source: &Path, bytes: &[u8]) -> Result<Self> {
        let raw = parse_object(source, bytes)?;
        let obj = as_object(source, &raw)?;

        let name = required_string(source, obj, "name")?;
        let cni_version = optional_string(source, obj, "cniVersion")?;
        let disable_check = match obj.get("disableCheck") {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => return Err(load_error(source, "'disableCheck' must be a boolean")),
        };

        let entries = match obj.get("plugins") {
            None => return Err(load_error(source, "no 'plugins' key")),
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(load_error(source, "'plugins' must be an array")),
        };
        if entries.is_empty() {
            return Err(load_error(source, "no plugins in list"));
        }
        let plugins = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| plugin_from_value(source, index, entry))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name,
            cni_version,
            disable_check,
            plugins,
            raw,
        })
    }

    /// Wraps a single-plugin configuration document into a one-element list.
    ///
    /// # Errors
    ///
    /// Returns [`AttachError::Load`] if the document is not a JSON object or
    /// lacks a `name` or `type`.
    pub fn from_single_conf(source: &Path, bytes: &[u8]) -> Result<Self> {
        let conf = parse_object(source, bytes)?;
        let obj = as_object(source, &conf)?;
        let name = required_string(source, obj, "name")?;
        let cni_version = optional_string(source, obj, "cniVersion")?;
        let plugin = plugin_from_value(source, 0, &conf)?;

        let mut list = Map::new();
        let _ = list.insert("name".into(), Value::String(name.clone()));
        if let Some(version) = &cni_version {
            let _ = list.insert("cniVersion".into(), Value::String(version.clone()));
        }
        let _ = list.insert("plugins".into(), Value::Array(vec![conf.clone()]));

        Ok(Self {
            name,
            cni_version,
            disable_check: false,
            plugins: vec![plugin],
            raw: Value::Object(list),
        })
    }

    /// Returns the plugin types in chain order.
    pub fn plugin_types(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|p| p.plugin_type.as_str())
    }
}

/// Source of network configuration lists.
pub trait ConfigLoader {
    /// Loads the list called `name` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`AttachError::NetworkNotFound`] if no configuration has that
    /// name, or [`AttachError::Load`] if a candidate file is unreadable or invalid.
    fn load_config_list(&self, dir: &Path, name: &str) -> Result<NetworkConfigList>;
}

/// Loads configuration lists from a directory of JSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryLoader;

impl ConfigLoader for DirectoryLoader {
    fn load_config_list(&self, dir: &Path, name: &str) -> Result<NetworkConfigList> {
        tracing::debug!(dir = %dir.display(), name, "loading network configuration list");

        for path in conf_files(dir, &[CONFLIST_EXTENSION])? {
            let list = NetworkConfigList::from_bytes(&path, &read_file(&path)?)?;
            if list.name == name {
                tracing::debug!(path = %path.display(), "matched configuration list");
                return Ok(list);
            }
        }

        for path in conf_files(dir, &CONF_EXTENSIONS)? {
            let list = NetworkConfigList::from_single_conf(&path, &read_file(&path)?)?;
            if list.name == name {
                tracing::debug!(path = %path.display(), "matched single configuration");
                return Ok(list);
            }
        }

        Err(AttachError::NetworkNotFound {
            dir: dir.to_path_buf(),
            name: name.to_string(),
        })
    }
}

/// Lists regular files in `dir` whose extension is one of `extensions`, sorted by path.
///
/// A missing directory yields an empty list.
///
/// # Errors
///
/// Returns [`AttachError::Load`] if the directory cannot be read.
pub fn conf_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(load_error(dir, &e.to_string())),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| load_error(dir, &e.to_string()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext));
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| load_error(path, &e.to_string()))
}

fn parse_object(source: &Path, bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes)
        .map_err(|e| load_error(source, &format!("invalid JSON: {e}")))
}

fn as_object<'a>(source: &Path, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| load_error(source, "configuration must be a JSON object"))
}

fn required_string(source: &Path, obj: &Map<String, Value>, key: &str) -> Result<String> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) | None => Err(load_error(source, &format!("missing '{key}'"))),
        Some(_) => Err(load_error(source, &format!("'{key}' must be a string"))),
    }
}

fn optional_string(source: &Path, obj: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(load_error(source, &format!("'{key}' must be a string"))),
    }
}

fn plugin_from_value(source: &Path, index: usize, value: &Value) -> Result<PluginConfig> {
    let obj = value
        .as_object()
        .ok_or_else(|| load_error(source, &format!("plugin {index} is not a JSON object")))?;
    match obj.get("type") {
        Some(Value::String(t)) if !t.is_empty() => Ok(PluginConfig {
            plugin_type: t.clone(),
            raw: value.clone(),
        }),
        _ => Err(load_error(source, &format!("plugin {index} is missing 'type'"))),
    }
}

fn load_error(source: &Path, message: &str) -> AttachError {
    AttachError::Load {
        dir: source.to_path_buf(),
        message: message.to_string(),
    }
}
