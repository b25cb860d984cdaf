//! デプロイリクエスト
//!
//! コンパイラが生成し、コアへ送信される完成済みの値オブジェクト。
//! 送信前にすべてのフィールドが埋まっており、送信後に書き換えられることはない。

use super::port::PortDescriptor;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeployRequest {
    pub app_name: String,
    pub entrypoint: EntrypointOptions,
    pub pod: String,
    pub image: String,
    pub cpu_quota: f64,
    pub memory: i64,
    pub count: i32,
    pub env: Vec<String>,
    /// ユーザー定義ネットワークの場合のみ1件（アドレスは空）
    pub networks: HashMap<String, String>,
    pub network_mode: String,
    pub volumes: Vec<String>,
    pub meta: HashMap<String, String>,
    pub dns: Vec<String>,
}

/// リクエストに埋め込まれるエントリポイント
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntrypointOptions {
    pub name: String,
    pub command: Vec<String>,
    pub privileged: bool,
    pub working_dir: String,
    pub log_config: String,
    pub publish: Vec<PortDescriptor>,
    pub health_check: HealthCheckOptions,
    pub hook: HookOptions,
    pub restart_policy: String,
    pub extra_hosts: Vec<String>,
}

/// ヘルスチェック設定
///
/// 未設定の場合はゼロ値。ワイヤ上に「省略」の表現がないため、空であることが未設定を意味する。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthCheckOptions {
    pub ports: Vec<PortDescriptor>,
    pub url: String,
    pub code: i32,
}

/// フック設定（未設定の場合はゼロ値）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HookOptions {
    pub after_start: Vec<String>,
    pub before_stop: Vec<String>,
    pub force: bool,
}

impl HealthCheckOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl HookOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
