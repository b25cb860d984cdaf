pub mod error;

pub use error::*;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// コアのデフォルトアドレス
pub const DEFAULT_CORE_ADDRESS: &str = "127.0.0.1:5001";

/// カレントディレクトリで探す設定ファイル名
const LOCAL_CONFIG_FILE: &str = ".eru.yaml";

/// クライアント設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// コアの gRPC アドレス (host:port)
    pub core: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            core: DEFAULT_CORE_ADDRESS.to_string(),
        }
    }
}

impl ClientConfig {
    /// ファイルから設定を読み込む
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 設定ファイルを探して読み込む。見つからなければデフォルト値
    pub fn load() -> Result<Self> {
        match find_config_file()? {
            Some(path) => {
                debug!(path = %path.display(), "Loading client config");
                Self::from_file(&path)
            }
            None => {
                debug!("No client config found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// コマンドライン (--eru / ERU) の指定を優先してアドレスを決定
    pub fn core_address(&self, override_address: Option<&str>) -> String {
        match override_address {
            Some(address) if !address.is_empty() => address.to_string(),
            _ => self.core.clone(),
        }
    }
}

/// クライアント設定ファイルを探す
///
/// 以下の優先順位で設定ファイルを検索:
/// 1. 環境変数 ERU_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: .eru.yaml
/// 3. ~/.config/erucli/config.yaml (グローバル設定)
pub fn find_config_file() -> Result<Option<PathBuf>> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var("ERU_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::EnvPathNotFound(path));
    }

    // 2. カレントディレクトリで検索
    if let Ok(current_dir) = std::env::current_dir() {
        let path = current_dir.join(LOCAL_CONFIG_FILE);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // 3. グローバル設定ファイル
    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("erucli").join("config.yaml");
        if global_config.exists() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.core, "127.0.0.1:5001");
    }

    #[test]
    fn test_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "core: core.eru.local:5001\n").unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.core, "core.eru.local:5001");
    }

    #[test]
    fn test_from_file_missing_field_uses_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "{}\n").unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_from_file_parse_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "core: [broken\n").unwrap();

        assert!(matches!(
            ClientConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_core_address_override() {
        let config = ClientConfig::default();
        assert_eq!(config.core_address(Some("10.0.0.1:5001")), "10.0.0.1:5001");
        assert_eq!(config.core_address(Some("")), "127.0.0.1:5001");
        assert_eq!(config.core_address(None), "127.0.0.1:5001");
    }

    #[test]
    #[serial]
    fn test_find_config_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join(".eru.yaml"), "core: local:5001\n").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_config_file().unwrap();
        assert!(result.unwrap().ends_with(".eru.yaml"));

        let config = ClientConfig::load().unwrap();
        assert_eq!(config.core, "local:5001");

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_config_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.yaml");
        fs::write(&config_path, "core: env:5001\n").unwrap();

        // 環境変数を設定
        unsafe {
            std::env::set_var("ERU_CONFIG_PATH", config_path.to_str().unwrap());
        }

        let result = find_config_file().unwrap();
        assert_eq!(result, Some(config_path));

        // クリーンアップ
        unsafe {
            std::env::remove_var("ERU_CONFIG_PATH");
        }
    }

    #[test]
    #[serial]
    fn test_find_config_env_var_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing.yaml");

        unsafe {
            std::env::set_var("ERU_CONFIG_PATH", missing.to_str().unwrap());
        }

        assert!(matches!(
            find_config_file(),
            Err(ConfigError::EnvPathNotFound(_))
        ));

        unsafe {
            std::env::remove_var("ERU_CONFIG_PATH");
        }
    }
}
