//! デプロイ spec 定義
//!
//! YAML形式：
//! ```yaml
//! appname: web-app
//! entrypoints:
//!   web:
//!     cmd: ["/run.sh"]
//!     publish: ["80/tcp"]
//!     restart: always
//!     healthcheck:
//!       ports: ["80/tcp"]
//!       url: /healthz
//!       code: 200
//! volumes:
//!   - /data:/data
//! dns:
//!   - 8.8.8.8
//! ```

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// デプロイ spec のルート
///
/// パース後は不変として扱う。コンパイラはこれを書き換えない。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Specs {
    #[serde(rename = "appname", default)]
    pub app_name: String,
    #[serde(default, deserialize_with = "unique_map")]
    pub entrypoints: HashMap<String, Entrypoint>,
    #[serde(default)]
    pub volumes: Vec<String>,
    #[serde(default)]
    pub meta: HashMap<String, String>,
    #[serde(default)]
    pub dns: Vec<String>,
}

/// エントリポイント定義
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entrypoint {
    #[serde(rename = "cmd", default, deserialize_with = "command_tokens")]
    pub command: Vec<String>,
    #[serde(default)]
    pub privileged: bool,
    #[serde(default)]
    pub working_dir: String,
    #[serde(default)]
    pub log_config: String,
    #[serde(default)]
    pub publish: Vec<String>,
    /// ヘルスチェック設定（未指定と空の設定を区別する）
    #[serde(rename = "healthcheck", default)]
    pub health_check: Option<HealthCheck>,
    #[serde(default)]
    pub hook: Option<Hook>,
    /// 再起動ポリシー (no, always, on-failure, unless-stopped)
    #[serde(rename = "restart", default)]
    pub restart_policy: String,
    #[serde(default)]
    pub extra_hosts: Vec<String>,
}

/// ヘルスチェック設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub code: i32,
}

/// フック設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    #[serde(default)]
    pub after_start: Vec<String>,
    #[serde(default)]
    pub before_stop: Vec<String>,
    /// 失敗時にも before_stop を実行する
    #[serde(default)]
    pub force: bool,
}

impl Specs {
    /// エントリポイントを名前で取得
    pub fn entrypoint(&self, name: &str) -> Option<&Entrypoint> {
        self.entrypoints.get(name)
    }
}

/// `cmd` は文字列でもリストでも書ける
fn command_tokens<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Command {
        Line(String),
        Tokens(Vec<String>),
    }

    Ok(match Command::deserialize(deserializer)? {
        // コマンドをスペースで分割
        Command::Line(line) => line.split_whitespace().map(String::from).collect(),
        Command::Tokens(tokens) => tokens,
    })
}

/// キーの重複を許さないマップとしてデシリアライズ
fn unique_map<'de, D, V>(deserializer: D) -> Result<HashMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueMapVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueMapVisitor<V> {
        type Value = HashMap<String, V>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a mapping with unique keys")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut map = HashMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, V>()? {
                if map.contains_key(&key) {
                    return Err(de::Error::custom(format!("duplicate entrypoint '{}'", key)));
                }
                map.insert(key, value);
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueMapVisitor(PhantomData))
}
