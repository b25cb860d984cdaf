//! ネットワークモード

use std::collections::HashMap;

/// コンテナ共有モードの接頭辞
const CONTAINER_PREFIX: &str = "container:";

/// `--network` に渡された文字列の分類
///
/// ホストレベルの組み込みモードか、明示的に接続するユーザー定義ネットワークかを区別する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkMode {
    Default,
    Bridge,
    Host,
    None,
    /// 他コンテナのネットワーク名前空間を共有 (`container:<id>`)
    Container(String),
    /// SDN などのユーザー定義ネットワーク
    UserDefined(String),
}

impl NetworkMode {
    pub fn parse(s: &str) -> Self {
        match s {
            "" | "default" => Self::Default,
            "bridge" => Self::Bridge,
            "host" => Self::Host,
            "none" => Self::None,
            _ => match s.strip_prefix(CONTAINER_PREFIX) {
                Some(id) => Self::Container(id.to_string()),
                None => Self::UserDefined(s.to_string()),
            },
        }
    }

    pub fn is_user_defined(&self) -> bool {
        matches!(self, Self::UserDefined(_))
    }

    /// デプロイリクエストに載せるネットワークのマップ
    ///
    /// ユーザー定義ネットワークの場合のみ、名前に空のアドレスを対応させた1件を持つ。
    /// アドレスはデプロイ後にエンジン側が埋める。
    pub fn networks(&self) -> HashMap<String, String> {
        match self {
            Self::UserDefined(name) => HashMap::from([(name.clone(), String::new())]),
            _ => HashMap::new(),
        }
    }
}
