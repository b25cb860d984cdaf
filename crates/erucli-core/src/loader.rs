//! spec ローダー
//!
//! ローカルファイルまたはリモートURIから spec を取得してパースする

use crate::error::{Result, SpecError};
use crate::model::Specs;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// リモート取得と判定する接頭辞（http:// と https:// の両方に一致）
const REMOTE_PREFIX: &str = "http";

/// spec の取得元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    Local(PathBuf),
    Remote(String),
}

impl SpecSource {
    pub fn from_uri(uri: &str) -> Self {
        if uri.starts_with(REMOTE_PREFIX) {
            Self::Remote(uri.to_string())
        } else {
            Self::Local(PathBuf::from(uri))
        }
    }

    fn display(&self) -> String {
        match self {
            Self::Local(path) => path.display().to_string(),
            Self::Remote(url) => url.clone(),
        }
    }

    /// spec のバイト列を取得
    pub async fn fetch(&self) -> Result<Vec<u8>> {
        let load_failure = |message: String| SpecError::SpecLoadFailure {
            uri: self.display(),
            message,
        };

        match self {
            Self::Local(path) => tokio::fs::read(path)
                .await
                .map_err(|e| load_failure(e.to_string())),
            Self::Remote(url) => {
                let response = reqwest::get(url)
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| load_failure(e.to_string()))?;
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| load_failure(e.to_string()))?;
                Ok(bytes.to_vec())
            }
        }
    }
}

/// バイト列から spec をパース
pub fn parse_specs(data: &[u8]) -> Result<Specs> {
    let specs: Specs = serde_yaml::from_slice(data)?;
    debug!(
        app = %specs.app_name,
        entrypoints = specs.entrypoints.len(),
        "Spec parsed"
    );
    Ok(specs)
}

/// URI またはパスから spec を読み込んでパース
#[instrument]
pub async fn load_specs(uri: &str) -> Result<Specs> {
    let source = SpecSource::from_uri(uri);
    debug!(?source, "Fetching spec");
    let data = source.fetch().await?;
    info!(size = data.len(), "Spec fetched");
    parse_specs(&data)
}
