//! # nsattach-core
//!
//! Attaches a network interface to an existing network namespace by
//! driving a CNI plugin chain through one lifecycle verb.
//!
//! The pipeline is strictly linear:
//! - **Parameters**: validate the ambient environment snapshot.
//! - **Identity**: resolve the namespace path and derive its container ID.
//! - **Configuration**: load the named network configuration list.
//! - **Dispatch**: invoke exactly one orchestrator capability.
//!
//! Plugin execution itself is delegated to a [`dispatch::NetworkOrchestrator`]
//! implementation supplied by the caller.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod conflist;
pub mod dispatch;
pub mod identity;
pub mod params;
pub mod pipeline;

pub use pipeline::{AttachCommand, attach};
