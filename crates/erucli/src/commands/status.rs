use crate::utils;
use colored::Colorize;
use erucli_rpc::{StatusFilter, StatusReport, short_id};

pub async fn handle(filter: StatusFilter, core_address: Option<&str>) -> anyhow::Result<()> {
    let client = utils::connect_core(core_address).await?;

    println!("{}", "ステータスを購読中...".blue());
    if !filter.app_name.is_empty() {
        println!("アプリ: {}", filter.app_name.cyan());
    }

    erucli_rpc::watch_status(&client, &filter, print_report).await?;

    Ok(())
}

fn print_report(report: StatusReport) {
    match report {
        StatusReport::Deleted { id, name } => {
            println!("[{}] {} は削除されました", short_id(&id).dimmed(), name);
        }
        StatusReport::Healthy {
            id,
            name,
            node,
            publish,
        } => {
            let id = short_id(&id);
            println!(
                "[{}] {} ({}) {}",
                id.cyan(),
                name,
                node,
                "が復帰しました".green()
            );
            for (network, addresses) in &publish {
                println!("[{}] {} で公開中: {}", id.cyan(), network, addresses);
            }
        }
        StatusReport::Unhealthy { id, name, node } => {
            println!(
                "[{}] {} ({}) {}",
                short_id(&id).yellow(),
                name,
                node,
                "は異常です".yellow().bold()
            );
        }
    }
}
