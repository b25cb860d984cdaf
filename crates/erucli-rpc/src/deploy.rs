//! デプロイ結果ストリームの処理

use crate::client::CoreRpc;
use crate::error::{Result, RpcError};
use crate::pb;
use crate::policy::{ItemFailure, StreamKind, settle};
use erucli_core::DeployRequest;
use futures_util::{Stream, StreamExt};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// デプロイに成功したコンテナ
#[derive(Debug, Clone, PartialEq)]
pub struct DeployedContainer {
    pub id: String,
    pub name: String,
    pub node: String,
    pub cpu: BTreeMap<String, i32>,
    pub memory: i64,
    /// after_start フックの出力
    pub hook_output: Option<String>,
    /// ネットワーク名 → 公開アドレス
    pub publish: BTreeMap<String, String>,
}

/// レプリカ1件分の報告
#[derive(Debug, Clone, PartialEq)]
pub enum DeployReport {
    Success(DeployedContainer),
    Failure { error: String },
}

impl DeployReport {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<pb::CreateContainerMessage> for DeployReport {
    fn from(msg: pb::CreateContainerMessage) -> Self {
        if !msg.success {
            return Self::Failure { error: msg.error };
        }

        let hook_output =
            (!msg.hook.is_empty()).then(|| String::from_utf8_lossy(&msg.hook).into_owned());

        Self::Success(DeployedContainer {
            id: msg.id,
            name: msg.name,
            node: msg.nodename,
            cpu: msg.cpu.into_iter().collect(),
            memory: msg.memory,
            hook_output,
            publish: msg.publish.into_iter().collect(),
        })
    }
}

/// デプロイ結果の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeploySummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// 結果ストリームを最後まで消費し、到着順に1件ずつ報告する
///
/// レプリカの失敗は報告して継続。通信エラーはストリーム全体を中断する。
pub async fn process_deploy_stream<S, F>(mut stream: S, mut report: F) -> Result<DeploySummary>
where
    S: Stream<Item = std::result::Result<pb::CreateContainerMessage, tonic::Status>> + Unpin,
    F: FnMut(DeployReport),
{
    let mut summary = DeploySummary::default();

    while let Some(item) = stream.next().await {
        let msg = match item {
            Ok(msg) => msg,
            Err(status) => match settle(StreamKind::Deploy, ItemFailure::Transport, || {
                RpcError::Transport(status)
            }) {
                Some(err) => return Err(err),
                None => continue,
            },
        };

        let entry = DeployReport::from(msg);
        let abort = match &entry {
            DeployReport::Success(container) => {
                debug!(id = %container.id, node = %container.node, "[Deploy] Success");
                summary.succeeded += 1;
                None
            }
            DeployReport::Failure { error } => {
                debug!(%error, "[Deploy] Failed");
                summary.failed += 1;
                settle(StreamKind::Deploy, ItemFailure::Replica, || {
                    RpcError::Replica(error.clone())
                })
            }
        };
        report(entry);

        if let Some(err) = abort {
            return Err(err);
        }
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "[Deploy] Stream finished"
    );
    Ok(summary)
}

/// デプロイリクエストを送信して結果を処理する
#[instrument(skip_all, fields(app = %request.app_name, count = request.count))]
pub async fn deploy<C, F>(client: &C, request: &DeployRequest, report: F) -> Result<DeploySummary>
where
    C: CoreRpc + ?Sized,
    F: FnMut(DeployReport),
{
    let stream = client.create_container(request.into()).await?;
    process_deploy_stream(stream, report).await
}
