//! Snapshot of the ambient environment consumed by the attach pipeline.
//!
//! The process environment is read exactly once, at the binary boundary.
//! Everything downstream works from an [`AttachEnv`] value, so tests can
//! build one directly instead of mutating global state.

use crate::constants::{
    ENV_CAPABILITY_ARGS, ENV_CNI_ARGS, ENV_CNI_IFNAME, ENV_CNI_PATH, ENV_NET_DIR,
};

/// Raw, unvalidated values of the protocol environment variables.
///
/// `None` means the variable was not set. An empty string means it was set
/// to the empty value; the two are treated differently for `CNI_IFNAME`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachEnv {
    /// `NETCONFPATH`.
    pub net_dir: Option<String>,
    /// `CNI_PATH`.
    pub cni_path: Option<String>,
    /// `CAP_ARGS`.
    pub capability_args: Option<String>,
    /// `CNI_ARGS`.
    pub cni_args: Option<String>,
    /// `CNI_IFNAME`.
    pub ifname: Option<String>,
}

impl AttachEnv {
    /// Builds a snapshot from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            net_dir: lookup(ENV_NET_DIR),
            cni_path: lookup(ENV_CNI_PATH),
            capability_args: lookup(ENV_CAPABILITY_ARGS),
            cni_args: lookup(ENV_CNI_ARGS),
            ifname: lookup(ENV_CNI_IFNAME),
        }
    }

    /// Snapshots the current process environment.
    ///
    /// Variables whose value is not valid Unicode are treated as unset.
    pub fn from_process_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}
