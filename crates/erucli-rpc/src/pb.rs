//! コア RPC のワイヤメッセージ
//!
//! コアの `pb.CoreRPC` サービスのうち、CLI が利用する3つのメソッドのメッセージのみを定義する。

use std::collections::HashMap;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeployOptions {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub entrypoint: Option<EntrypointOptions>,
    #[prost(string, tag = "3")]
    pub podname: String,
    #[prost(string, tag = "4")]
    pub image: String,
    #[prost(double, tag = "5")]
    pub cpu_quota: f64,
    #[prost(int64, tag = "6")]
    pub memory: i64,
    #[prost(int32, tag = "7")]
    pub count: i32,
    #[prost(string, repeated, tag = "8")]
    pub env: Vec<String>,
    #[prost(string, repeated, tag = "9")]
    pub dns: Vec<String>,
    #[prost(string, repeated, tag = "10")]
    pub volumes: Vec<String>,
    #[prost(map = "string, string", tag = "11")]
    pub networks: HashMap<String, String>,
    #[prost(string, tag = "12")]
    pub networkmode: String,
    #[prost(map = "string, string", tag = "13")]
    pub meta: HashMap<String, String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EntrypointOptions {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, repeated, tag = "2")]
    pub command: Vec<String>,
    #[prost(bool, tag = "3")]
    pub privileged: bool,
    #[prost(string, tag = "4")]
    pub working_dir: String,
    #[prost(string, tag = "5")]
    pub log_config: String,
    #[prost(string, repeated, tag = "6")]
    pub publish: Vec<String>,
    #[prost(message, optional, tag = "7")]
    pub healthcheck: Option<HealthCheckOptions>,
    #[prost(message, optional, tag = "8")]
    pub hook: Option<HookOptions>,
    #[prost(string, tag = "9")]
    pub restart_policy: String,
    #[prost(string, repeated, tag = "10")]
    pub extra_hosts: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HealthCheckOptions {
    #[prost(string, repeated, tag = "1")]
    pub ports: Vec<String>,
    #[prost(string, tag = "2")]
    pub url: String,
    #[prost(int32, tag = "3")]
    pub code: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HookOptions {
    #[prost(string, repeated, tag = "1")]
    pub after_start: Vec<String>,
    #[prost(string, repeated, tag = "2")]
    pub before_stop: Vec<String>,
    #[prost(bool, tag = "3")]
    pub force: bool,
}

/// CreateContainer のストリームで返るレプリカごとの結果
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateContainerMessage {
    #[prost(string, tag = "1")]
    pub podname: String,
    #[prost(string, tag = "2")]
    pub nodename: String,
    #[prost(string, tag = "3")]
    pub id: String,
    #[prost(string, tag = "4")]
    pub name: String,
    #[prost(string, tag = "5")]
    pub error: String,
    #[prost(bool, tag = "6")]
    pub success: bool,
    #[prost(map = "string, int32", tag = "7")]
    pub cpu: HashMap<String, i32>,
    #[prost(int64, tag = "8")]
    pub memory: i64,
    #[prost(map = "string, string", tag = "9")]
    pub publish: HashMap<String, String>,
    #[prost(bytes = "vec", tag = "10")]
    pub hook: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeployStatusOptions {
    #[prost(string, tag = "1")]
    pub appname: String,
    #[prost(string, tag = "2")]
    pub entrypoint: String,
    #[prost(string, tag = "3")]
    pub nodename: String,
}

/// DeployStatus のストリームで返るライフサイクルイベント
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeployStatusMessage {
    #[prost(string, tag = "1")]
    pub action: String,
    #[prost(string, tag = "2")]
    pub appname: String,
    #[prost(string, tag = "3")]
    pub entrypoint: String,
    #[prost(string, tag = "4")]
    pub nodename: String,
    #[prost(string, tag = "5")]
    pub id: String,
    #[prost(bytes = "vec", tag = "6")]
    pub data: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContainerId {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Container {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub podname: String,
    #[prost(string, tag = "3")]
    pub nodename: String,
    #[prost(string, tag = "4")]
    pub name: String,
    #[prost(map = "string, string", tag = "5")]
    pub labels: HashMap<String, String>,
    /// ネットワーク名 → 公開アドレス（カンマ区切り）
    #[prost(map = "string, string", tag = "6")]
    pub publish: HashMap<String, String>,
    #[prost(string, tag = "7")]
    pub image: String,
}
