use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error(
        "コアに接続できません: {address}\n理由: {source}\n\nヒント:\n  • --eru または ERU 環境変数でコアのアドレスを確認してください"
    )]
    Connect {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("RPC 通信エラー: {0}")]
    Transport(#[from] tonic::Status),

    #[error("レプリカのデプロイに失敗しました: {0}")]
    Replica(String),

    #[error("コンテナ {id} はラベル条件に一致しません")]
    LabelMismatch { id: String },

    #[error("コンテナ {id} のステータスをパースできません: {source}")]
    PayloadDecode {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, RpcError>;
