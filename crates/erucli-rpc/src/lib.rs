//! Eru core RPC
//!
//! コアとの gRPC 通信と、2種類のサーバーストリームの消費を担当します。
//!
//! ```text
//!   DeployRequest ──▶ CreateContainer ──▶ process_deploy_stream ──▶ DeployReport
//!
//!   StatusFilter  ──▶ DeployStatus ──▶ correlate_status_stream ──▶ StatusReport
//!                                            │
//!                                            └──▶ GetContainer（イベントごと）
//! ```

pub mod client;
pub mod convert;
pub mod deploy;
pub mod error;
pub mod pb;
pub mod policy;
pub mod status;

#[cfg(test)]
mod fake;

// Re-exports
pub use client::{ContainerLookup, CoreClient, CoreRpc, RpcStream};
pub use deploy::{DeployReport, DeploySummary, DeployedContainer, deploy, process_deploy_stream};
pub use error::{Result, RpcError};
pub use policy::{Disposition, ItemFailure, StreamKind, disposition};
pub use status::{
    ContainerStatus, DELETE_ACTION, StatusFilter, StatusReport, StatusSummary,
    correlate_status_stream, labels_match, short_id, watch_status,
};
