use crate::utils;
use colored::Colorize;
use erucli_core::DeployParams;
use erucli_rpc::{DeployReport, DeployedContainer};

pub async fn handle(
    spec_uri: &str,
    params: DeployParams,
    core_address: Option<&str>,
) -> anyhow::Result<()> {
    // spec を読む前にパラメータを検証
    params.validate()?;

    println!("{}", "デプロイを開始します...".blue().bold());
    println!("spec: {}", spec_uri.cyan());

    let specs = erucli_core::load_specs(spec_uri).await?;
    let request = erucli_core::compile(&specs, &params)?;

    println!(
        "アプリ: {}  エントリ: {}  pod: {}  イメージ: {}  レプリカ: {}",
        request.app_name.cyan(),
        request.entrypoint.name.cyan(),
        request.pod.cyan(),
        request.image.cyan(),
        request.count
    );

    let client = utils::connect_core(core_address).await?;

    println!();
    let summary = erucli_rpc::deploy(&client, &request, print_report).await?;

    println!();
    let line = format!(
        "デプロイ完了: 成功 {} / 失敗 {}",
        summary.succeeded, summary.failed
    );
    if summary.failed == 0 {
        println!("{}", format!("✓ {}", line).green().bold());
    } else {
        println!("{}", format!("⚠ {}", line).yellow().bold());
    }

    Ok(())
}

fn print_report(report: DeployReport) {
    match report {
        DeployReport::Success(container) => print_success(&container),
        DeployReport::Failure { error } => {
            eprintln!("  {} デプロイ失敗: {}", "✗".red(), error);
        }
    }
}

fn print_success(container: &DeployedContainer) {
    println!(
        "  {} {} {} (ノード: {}, CPU: {}, メモリ: {})",
        "✓".green(),
        container.id.cyan(),
        container.name,
        container.node,
        utils::format_cpu(&container.cpu),
        container.memory
    );

    if let Some(output) = &container.hook_output {
        println!("    フック出力:");
        for line in output.lines() {
            println!("      {}", line.dimmed());
        }
    }

    for (network, address) in &container.publish {
        println!("    • {} に公開: {}", network.cyan(), address);
    }
}
