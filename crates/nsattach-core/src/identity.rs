//! Namespace identity derivation.
//!
//! The container ID is a pure function of the resolved namespace path:
//! `cnitool-` followed by the hex encoding of the first
//! [`CONTAINER_ID_DIGEST_BYTES`] bytes of the path's SHA-512 digest.
//! Truncating to ten bytes leaves about 80 bits of collision resistance,
//! which is ample for the number of namespaces on a single host.

use std::path::Path;

use nsattach_common::constants::{CONTAINER_ID_DIGEST_BYTES, CONTAINER_ID_PREFIX};
use nsattach_common::error::{AttachError, Result};
use nsattach_common::types::ContainerId;
use path_clean::PathClean;
use sha2::{Digest, Sha512};

/// Resolved namespace path and the container ID derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceIdentity {
    /// Absolute, lexically cleaned namespace path.
    pub netns: String,
    /// Deterministic container ID for `netns`.
    pub container_id: ContainerId,
}

/// Resolves `netns` against the current working directory and derives its ID.
///
/// # Errors
///
/// Returns [`AttachError::Path`] if the working directory cannot be determined.
pub fn derive(netns: &str) -> Result<NamespaceIdentity> {
    let netns = resolve_namespace_path(netns)?;
    let container_id = container_id_for(&netns);
    tracing::debug!(netns = %netns, container_id = %container_id, "derived namespace identity");
    Ok(NamespaceIdentity {
        netns,
        container_id,
    })
}

/// Resolves a possibly relative namespace argument to an absolute path.
///
/// An empty argument resolves to the working directory.
///
/// # Errors
///
/// Returns [`AttachError::Path`] if the argument is relative and the
/// working directory is unavailable or not valid UTF-8.
pub fn resolve_namespace_path(netns: &str) -> Result<String> {
    if Path::new(netns).is_absolute() {
        return resolve_against(Path::new("/"), netns);
    }
    let cwd = std::env::current_dir()
        .map_err(|e| path_error(netns, &format!("cannot determine working directory: {e}")))?;
    resolve_against(&cwd, netns)
}

/// Joins `netns` onto `base` and removes `.`, `..`, and repeated separators
/// without touching the filesystem.
///
/// # Errors
///
/// Returns [`AttachError::Path`] if the result is not absolute or not valid UTF-8.
pub fn resolve_against(base: &Path, netns: &str) -> Result<String> {
    let cleaned = base.join(netns).clean();
    if !cleaned.is_absolute() {
        return Err(path_error(netns, "resolved path is not absolute"));
    }
    cleaned
        .into_os_string()
        .into_string()
        .map_err(|_| path_error(netns, "resolved path is not valid UTF-8"))
}

/// Derives the container ID for an already resolved namespace path.
pub fn container_id_for(netns: &str) -> ContainerId {
    let digest = Sha512::digest(netns.as_bytes());
    let hex = hex::encode(&digest[..CONTAINER_ID_DIGEST_BYTES]);
    ContainerId::new(format!("{CONTAINER_ID_PREFIX}{hex}"))
}

fn path_error(netns: &str, message: &str) -> AttachError {
    AttachError::Path {
        path: netns.to_string(),
        message: message.to_string(),
    }
}
