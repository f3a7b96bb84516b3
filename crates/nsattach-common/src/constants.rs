//! Environment variable names and default values.
//!
//! The variable names are part of the plugin protocol and must match
//! exactly what other CNI tooling reads.

/// Colon-separated list of directories searched for plugin binaries.
pub const ENV_CNI_PATH: &str = "CNI_PATH";

/// Directory holding network configuration list files.
pub const ENV_NET_DIR: &str = "NETCONFPATH";

/// JSON object passed to plugins that declare matching capabilities.
pub const ENV_CAPABILITY_ARGS: &str = "CAP_ARGS";

/// `;`-separated `key=value` pairs forwarded to every plugin.
pub const ENV_CNI_ARGS: &str = "CNI_ARGS";

/// Name of the interface created inside the namespace.
pub const ENV_CNI_IFNAME: &str = "CNI_IFNAME";

/// Network configuration directory used when `NETCONFPATH` is unset or empty.
pub const DEFAULT_NET_DIR: &str = "/etc/cni/net.d";

/// Interface name used when `CNI_IFNAME` is unset.
pub const DEFAULT_IFNAME: &str = "eth1";

/// Network configuration list attached when no name is given.
pub const DEFAULT_NETWORK_NAME: &str = "cbr1";

/// Literal prefix of every derived container ID.
pub const CONTAINER_ID_PREFIX: &str = "cnitool-";

/// Number of leading SHA-512 digest bytes kept in a container ID.
///
/// Ten bytes give roughly 80 bits of collision resistance.
pub const CONTAINER_ID_DIGEST_BYTES: usize = 10;

/// Extension of multi-plugin configuration list files.
pub const CONFLIST_EXTENSION: &str = "conflist";

/// Extensions of single-plugin configuration files.
pub const CONF_EXTENSIONS: [&str; 2] = ["conf", "json"];

/// Binary name for the CLI.
pub const BIN_NAME: &str = "nsattach";
