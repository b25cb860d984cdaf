use colored::Colorize;
use erucli_rpc::CoreClient;
use std::collections::BTreeMap;

/// `--label KEY=VALUE` をパース
pub fn parse_label(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("ラベルは KEY=VALUE 形式で指定してください: '{}'", s)),
    }
}

/// CPU 割り当てを `0:100,1:50` 形式で表示
pub fn format_cpu(cpu: &BTreeMap<String, i32>) -> String {
    cpu.iter()
        .map(|(core, share)| format!("{}:{}", core, share))
        .collect::<Vec<_>>()
        .join(",")
}

/// 設定ファイルとコマンドラインからアドレスを決めてコアに接続
pub async fn connect_core(override_address: Option<&str>) -> anyhow::Result<CoreClient> {
    let config = erucli_config::ClientConfig::load()?;
    let address = config.core_address(override_address);

    println!("{} {}", "コアに接続中:".blue(), address.cyan());
    Ok(CoreClient::connect(&address).await?)
}
