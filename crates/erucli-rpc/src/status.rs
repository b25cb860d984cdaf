//! ステータスイベントの相関処理
//!
//! 購読したイベントごとにコンテナ情報を引き、ラベルで絞り込んでから
//! 削除 / 復帰 / 異常 のいずれかに分類して報告する。イベント間で状態は持たない。

use crate::client::{ContainerLookup, CoreRpc};
use crate::error::{Result, RpcError};
use crate::pb;
use crate::policy::{ItemFailure, StreamKind, settle};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, error, info, instrument};

/// 削除イベントのアクション名
pub const DELETE_ACTION: &str = "delete";

/// 表示用に短縮するコンテナIDの長さ
const SHORT_ID_LEN: usize = 7;

/// コンテナIDを表示用に短縮
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// ステータス購読の絞り込み条件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusFilter {
    pub app_name: String,
    pub entrypoint: String,
    pub node: String,
    /// コンテナが持つべきラベル（空なら全件一致）
    pub labels: HashMap<String, String>,
}

impl StatusFilter {
    fn options(&self) -> pb::DeployStatusOptions {
        pb::DeployStatusOptions {
            appname: self.app_name.clone(),
            entrypoint: self.entrypoint.clone(),
            nodename: self.node.clone(),
        }
    }
}

/// 指定されたラベルをすべて同じ値で持っているか
pub fn labels_match(labels: &HashMap<String, String>, filter: &HashMap<String, String>) -> bool {
    filter
        .iter()
        .all(|(key, value)| labels.get(key) == Some(value))
}

/// イベントのペイロードに入っているコンテナの状態
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContainerStatus {
    pub id: String,
    pub healthy: bool,
    pub running: bool,
    pub networks: HashMap<String, String>,
    pub extension: serde_json::Value,
}

impl ContainerStatus {
    /// 空のペイロードはゼロ値として扱う
    pub fn decode(data: &[u8]) -> serde_json::Result<Self> {
        if data.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(data)
    }
}

/// イベント1件の分類結果
#[derive(Debug, Clone, PartialEq)]
pub enum StatusReport {
    Deleted {
        id: String,
        name: String,
    },
    Healthy {
        id: String,
        name: String,
        node: String,
        /// ネットワーク名 → 公開アドレス
        publish: BTreeMap<String, String>,
    },
    Unhealthy {
        id: String,
        name: String,
        node: String,
    },
}

impl StatusReport {
    pub fn id(&self) -> &str {
        match self {
            Self::Deleted { id, .. } | Self::Healthy { id, .. } | Self::Unhealthy { id, .. } => id,
        }
    }
}

/// ステータスストリームの集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub reported: usize,
    pub lookup_failed: usize,
    pub filtered: usize,
}

/// イベント1件を分類する
fn classify(
    msg: &pb::DeployStatusMessage,
    container: pb::Container,
) -> std::result::Result<StatusReport, RpcError> {
    // 削除イベントはペイロードを見ない
    if msg.action == DELETE_ACTION {
        return Ok(StatusReport::Deleted {
            id: container.id,
            name: container.name,
        });
    }

    let status = ContainerStatus::decode(&msg.data).map_err(|source| RpcError::PayloadDecode {
        id: msg.id.clone(),
        source,
    })?;

    Ok(if status.healthy {
        StatusReport::Healthy {
            id: container.id,
            name: container.name,
            node: msg.nodename.clone(),
            publish: container.publish.into_iter().collect(),
        }
    } else {
        StatusReport::Unhealthy {
            id: container.id,
            name: container.name,
            node: msg.nodename.clone(),
        }
    })
}

/// ステータスストリームを最後まで消費し、イベントごとに報告する
pub async fn correlate_status_stream<S, L, F>(
    mut stream: S,
    lookup: &L,
    labels: &HashMap<String, String>,
    mut report: F,
) -> Result<StatusSummary>
where
    S: Stream<Item = std::result::Result<pb::DeployStatusMessage, tonic::Status>> + Unpin,
    L: ContainerLookup + ?Sized,
    F: FnMut(StatusReport),
{
    let mut summary = StatusSummary::default();

    while let Some(item) = stream.next().await {
        let msg = match item {
            Ok(msg) => msg,
            Err(status) => match settle(StreamKind::Status, ItemFailure::Transport, || {
                RpcError::Transport(status)
            }) {
                Some(err) => return Err(err),
                None => continue,
            },
        };

        let container = match lookup.get_container(&msg.id).await {
            Ok(container) => container,
            Err(status) => {
                error!("[status] get container {} failed {}", msg.id, status.message());
                summary.lookup_failed += 1;
                match settle(StreamKind::Status, ItemFailure::Lookup, || status.into()) {
                    Some(err) => return Err(err),
                    None => continue,
                }
            }
        };

        if !labels_match(&container.labels, labels) {
            debug!("[status] ignore container {}", container.id);
            summary.filtered += 1;
            match settle(StreamKind::Status, ItemFailure::Filtered, || {
                RpcError::LabelMismatch {
                    id: container.id.clone(),
                }
            }) {
                Some(err) => return Err(err),
                None => continue,
            }
        }

        match classify(&msg, container) {
            Ok(entry) => {
                summary.reported += 1;
                report(entry);
            }
            Err(err) => {
                error!("[status] parse container data failed {}", err);
                if let Some(err) = settle(StreamKind::Status, ItemFailure::PayloadDecode, || err) {
                    return Err(err);
                }
            }
        }
    }

    info!(
        reported = summary.reported,
        lookup_failed = summary.lookup_failed,
        filtered = summary.filtered,
        "[status] Stream finished"
    );
    Ok(summary)
}

/// ステータスを購読して報告する
#[instrument(skip(client, report))]
pub async fn watch_status<C, F>(
    client: &C,
    filter: &StatusFilter,
    report: F,
) -> Result<StatusSummary>
where
    C: CoreRpc + ContainerLookup + ?Sized,
    F: FnMut(StatusReport),
{
    let stream = client.deploy_status(filter.options()).await?;
    correlate_status_stream(stream, client, &filter.labels, report).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures_util::stream;
    use tonic::Status;

    struct MemoryLookup {
        containers: HashMap<String, pb::Container>,
    }

    impl MemoryLookup {
        fn new(containers: Vec<pb::Container>) -> Self {
            Self {
                containers: containers.into_iter().map(|c| (c.id.clone(), c)).collect(),
            }
        }
    }

    #[async_trait]
    impl ContainerLookup for MemoryLookup {
        async fn get_container(&self, id: &str) -> std::result::Result<pb::Container, Status> {
            self.containers
                .get(id)
                .cloned()
                .ok_or_else(|| Status::not_found(format!("container {} not found", id)))
        }
    }

    fn container(id: &str, labels: &[(&str, &str)]) -> pb::Container {
        pb::Container {
            id: id.to_string(),
            name: format!("web_{}", id),
            nodename: "node-1".to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            publish: HashMap::from([("calico".to_string(), "10.0.0.5:80".to_string())]),
            ..Default::default()
        }
    }

    fn event(
        id: &str,
        action: &str,
        data: &str,
    ) -> std::result::Result<pb::DeployStatusMessage, Status> {
        Ok(pb::DeployStatusMessage {
            action: action.to_string(),
            appname: "shop".to_string(),
            entrypoint: "web".to_string(),
            nodename: "node-1".to_string(),
            id: id.to_string(),
            data: data.as_bytes().to_vec(),
        })
    }

    const HEALTHY: &str = r#"{"id":"c1","healthy":true,"running":true}"#;
    const UNHEALTHY: &str = r#"{"id":"c1","healthy":false,"running":true}"#;

    async fn run(
        events: Vec<std::result::Result<pb::DeployStatusMessage, Status>>,
        lookup: &MemoryLookup,
        labels: &HashMap<String, String>,
    ) -> (Result<StatusSummary>, Vec<StatusReport>) {
        let mut reports = Vec::new();
        let result =
            correlate_status_stream(stream::iter(events), lookup, labels, |r| reports.push(r))
                .await;
        (result, reports)
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "0123456");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_labels_match() {
        let labels = HashMap::from([
            ("team".to_string(), "infra".to_string()),
            ("tier".to_string(), "web".to_string()),
        ]);

        assert!(labels_match(&labels, &HashMap::new()));
        assert!(labels_match(
            &labels,
            &HashMap::from([("team".to_string(), "infra".to_string())])
        ));
        assert!(!labels_match(
            &labels,
            &HashMap::from([("team".to_string(), "data".to_string())])
        ));
        assert!(!labels_match(
            &labels,
            &HashMap::from([("region".to_string(), String::new())])
        ));
    }

    #[test]
    fn test_container_status_decode() {
        assert_eq!(ContainerStatus::decode(b"").unwrap(), ContainerStatus::default());

        let status = ContainerStatus::decode(HEALTHY.as_bytes()).unwrap();
        assert!(status.healthy);
        assert!(status.running);

        assert!(ContainerStatus::decode(b"{not json").is_err());
    }

    #[tokio::test]
    async fn test_healthy_and_unhealthy() {
        let lookup = MemoryLookup::new(vec![container("c1", &[]), container("c2", &[])]);
        let events = vec![event("c1", "set", HEALTHY), event("c2", "set", UNHEALTHY)];

        let (result, reports) = run(events, &lookup, &HashMap::new()).await;

        assert_eq!(result.unwrap().reported, 2);
        match &reports[0] {
            StatusReport::Healthy { id, node, publish, .. } => {
                assert_eq!(id, "c1");
                assert_eq!(node, "node-1");
                assert_eq!(publish.get("calico").map(String::as_str), Some("10.0.0.5:80"));
            }
            other => panic!("Expected Healthy, got {:?}", other),
        }
        assert!(matches!(&reports[1], StatusReport::Unhealthy { id, .. } if id == "c2"));
    }

    #[tokio::test]
    async fn test_lookup_failure_skips_event() {
        let lookup = MemoryLookup::new(vec![container("c2", &[])]);
        let events = vec![event("c1", "set", HEALTHY), event("c2", "set", HEALTHY)];

        let (result, reports) = run(events, &lookup, &HashMap::new()).await;

        let summary = result.unwrap();
        assert_eq!(summary.lookup_failed, 1);
        assert_eq!(summary.reported, 1);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id(), "c2");
    }

    #[tokio::test]
    async fn test_delete_reported_regardless_of_payload() {
        let lookup = MemoryLookup::new(vec![container("c1", &[])]);
        for data in ["", HEALTHY, UNHEALTHY, "{garbage"] {
            let (result, reports) =
                run(vec![event("c1", DELETE_ACTION, data)], &lookup, &HashMap::new()).await;

            assert_eq!(result.unwrap().reported, 1);
            assert_eq!(
                reports,
                vec![StatusReport::Deleted {
                    id: "c1".to_string(),
                    name: "web_c1".to_string()
                }]
            );
        }
    }

    #[tokio::test]
    async fn test_flapping_reported_every_time() {
        let lookup = MemoryLookup::new(vec![container("c1", &[])]);
        let events = vec![
            event("c1", "set", HEALTHY),
            event("c1", "set", UNHEALTHY),
            event("c1", "set", HEALTHY),
        ];

        let (result, reports) = run(events, &lookup, &HashMap::new()).await;

        assert_eq!(result.unwrap().reported, 3);
        assert!(matches!(reports[0], StatusReport::Healthy { .. }));
        assert!(matches!(reports[1], StatusReport::Unhealthy { .. }));
        assert!(matches!(reports[2], StatusReport::Healthy { .. }));
    }

    #[tokio::test]
    async fn test_label_filter_drops_silently() {
        let lookup = MemoryLookup::new(vec![
            container("c1", &[("team", "infra")]),
            container("c2", &[("team", "data")]),
        ]);
        let labels = HashMap::from([("team".to_string(), "infra".to_string())]);
        let events = vec![event("c1", "set", HEALTHY), event("c2", "set", HEALTHY)];

        let (result, reports) = run(events, &lookup, &labels).await;

        let summary = result.unwrap();
        assert_eq!(summary.filtered, 1);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id(), "c1");
    }

    #[tokio::test]
    async fn test_malformed_payload_stops_stream() {
        let lookup = MemoryLookup::new(vec![container("c1", &[]), container("c2", &[])]);
        let events = vec![event("c1", "set", "{garbage"), event("c2", "set", HEALTHY)];

        let (result, reports) = run(events, &lookup, &HashMap::new()).await;

        assert!(matches!(result, Err(RpcError::PayloadDecode { .. })));
        assert!(reports.is_empty());
    }

    #[tokio::test]
    async fn test_filtered_event_never_decoded() {
        let lookup = MemoryLookup::new(vec![
            container("c1", &[]),
            container("c2", &[("team", "infra")]),
        ]);
        let labels = HashMap::from([("team".to_string(), "infra".to_string())]);
        let events = vec![event("c1", "set", "{garbage"), event("c2", "set", HEALTHY)];

        let (result, reports) = run(events, &lookup, &labels).await;

        assert_eq!(result.unwrap().filtered, 1);
        assert_eq!(reports.len(), 1);
    }

    #[tokio::test]
    async fn test_watch_status_sends_filter() {
        use crate::fake::FakeCore;

        let core = FakeCore {
            events: vec![
                event("c1", "set", HEALTHY).unwrap(),
                event("c2", "set", HEALTHY).unwrap(),
            ],
            containers: HashMap::from([
                ("c1".to_string(), container("c1", &[("team", "infra")])),
                ("c2".to_string(), container("c2", &[("team", "data")])),
            ]),
            ..Default::default()
        };
        let filter = StatusFilter {
            app_name: "shop".to_string(),
            entrypoint: "web".to_string(),
            node: "n1".to_string(),
            labels: HashMap::from([("team".to_string(), "infra".to_string())]),
        };
        let mut reports = Vec::new();

        let summary = watch_status(&core, &filter, |r| reports.push(r))
            .await
            .unwrap();

        assert_eq!(
            core.status_options.lock().unwrap().clone(),
            Some(pb::DeployStatusOptions {
                appname: "shop".to_string(),
                entrypoint: "web".to_string(),
                nodename: "n1".to_string(),
            })
        );
        assert_eq!(summary.reported, 1);
        assert_eq!(summary.filtered, 1);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id(), "c1");
    }

    #[tokio::test]
    async fn test_transport_error_aborts() {
        let lookup = MemoryLookup::new(vec![container("c1", &[])]);
        let events = vec![
            event("c1", "set", HEALTHY),
            Err(Status::unavailable("stream reset")),
            event("c1", "set", HEALTHY),
        ];

        let (result, reports) = run(events, &lookup, &HashMap::new()).await;

        assert!(matches!(result, Err(RpcError::Transport(_))));
        assert_eq!(reports.len(), 1);
    }
}
