mod commands;
mod utils;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eru")]
#[command(about = "Eru コアにデプロイし、コンテナの状態を見守る", long_about = None)]
struct Cli {
    /// コアのアドレス (host:port)。設定ファイルより優先
    #[arg(long, env = "ERU", global = true)]
    eru: Option<String>,
    /// デバッグログを有効化
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// spec からコンテナをデプロイ
    Deploy {
        /// spec のパスまたは http(s) URI
        spec: String,
        /// デプロイ先の pod
        #[arg(long, default_value = "")]
        pod: String,
        /// 使用するエントリポイント
        #[arg(long, default_value = "")]
        entry: String,
        /// 起動するイメージ
        #[arg(long, default_value = "")]
        image: String,
        /// レプリカ数
        #[arg(long, default_value_t = 1)]
        count: i32,
        /// SDN 名またはホストモード (host, bridge, none, container:<id>)
        #[arg(long, default_value = "host")]
        network: String,
        /// CPU クォータ（コア数）
        #[arg(long, default_value_t = 1.0)]
        cpu: f64,
        /// メモリ上限（バイト）
        #[arg(long, default_value_t = 536_870_912)]
        mem: i64,
        /// 環境変数 KEY=VALUE（複数指定可）
        #[arg(long = "env")]
        env: Vec<String>,
    },
    /// デプロイ済みコンテナのステータスを購読
    Status {
        /// アプリケーション名（省略時は全件）
        name: Option<String>,
        /// エントリポイントで絞り込み
        #[arg(long, default_value = "")]
        entry: String,
        /// ノードで絞り込み
        #[arg(long, default_value = "")]
        node: String,
        /// ラベル KEY=VALUE で絞り込み（複数指定可）
        #[arg(long = "label", value_parser = utils::parse_label)]
        labels: Vec<(String, String)>,
    },
    /// バージョン情報を表示
    Version,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    // コマンドディスパッチ
    match cli.command {
        Commands::Deploy {
            spec,
            pod,
            entry,
            image,
            count,
            network,
            cpu,
            mem,
            env,
        } => {
            let params = erucli_core::DeployParams {
                pod,
                entry,
                image,
                network,
                cpu,
                memory: mem,
                count,
                env,
            };
            commands::deploy::handle(&spec, params, cli.eru.as_deref()).await?;
        }
        Commands::Status {
            name,
            entry,
            node,
            labels,
        } => {
            let filter = erucli_rpc::StatusFilter {
                app_name: name.unwrap_or_default(),
                entrypoint: entry,
                node,
                labels: labels.into_iter().collect(),
            };
            commands::status::handle(filter, cli.eru.as_deref()).await?;
        }
        Commands::Version => {
            println!("erucli {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
