use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpecError {
    #[error("必須パラメータが指定されていません: {0}")]
    MissingParameter(&'static str),

    #[error("パラメータが不正です: {name} = {value}\n理由: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("エントリポイントが見つかりません: {0}")]
    UnknownEntrypoint(String),

    #[error("ポート指定が不正です: '{spec}'\n理由: {reason}")]
    InvalidPort { spec: String, reason: String },

    #[error("spec の読み込みに失敗しました: {uri}\n理由: {message}")]
    SpecLoadFailure { uri: String, message: String },

    #[error("spec のパースに失敗しました: {0}")]
    SpecParseFailure(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SpecError>;
