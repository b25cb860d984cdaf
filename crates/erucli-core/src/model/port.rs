//! ポート定義
//!
//! spec に書かれた `80/tcp` のようなテキストを構造化されたポート記述子に変換します。

use crate::error::{Result, SpecError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// プロトコル種別
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl Protocol {
    /// 文字列からProtocolをパース
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tcp" => Some(Protocol::Tcp),
            "udp" => Some(Protocol::Udp),
            _ => None,
        }
    }

    /// ワイヤ上で使用する文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

/// デコード済みのポート記述子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDescriptor {
    pub port: u16,
    #[serde(default)]
    pub protocol: Protocol,
}

impl PortDescriptor {
    /// `PORT[/PROTO]` 形式の文字列をパース
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason: String| SpecError::InvalidPort {
            spec: spec.to_string(),
            reason,
        };

        let trimmed = spec.trim();
        let (port, protocol) = match trimmed.split_once('/') {
            Some((port, proto)) => {
                let protocol = Protocol::parse(proto)
                    .ok_or_else(|| invalid(format!("未対応のプロトコル '{}'", proto)))?;
                (port, protocol)
            }
            None => (trimmed, Protocol::Tcp),
        };

        let port: u16 = port
            .parse()
            .map_err(|_| invalid(format!("ポート番号 '{}' を数値として解釈できません", port)))?;
        if port == 0 {
            return Err(invalid("ポート番号 0 は使用できません".to_string()));
        }

        Ok(Self { port, protocol })
    }
}

impl fmt::Display for PortDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port, self.protocol.as_str())
    }
}

/// ポート指定のリストをまとめてデコードする
///
/// 1件でも不正な指定があればリスト全体をエラーにする。
pub fn decode_ports<S: AsRef<str>>(specs: &[S]) -> Result<Vec<PortDescriptor>> {
    specs
        .iter()
        .map(|s| PortDescriptor::parse(s.as_ref()))
        .collect()
}
