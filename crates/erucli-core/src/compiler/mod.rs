//! デプロイリクエストのコンパイラ
//!
//! パース済みの spec とコマンドラインのパラメータから、コアへ送信する
//! [`DeployRequest`] を組み立てる。spec 自体は書き換えない。

use crate::error::{Result, SpecError};
use crate::model::{
    DeployRequest, Entrypoint, EntrypointOptions, HealthCheckOptions, HookOptions, NetworkMode,
    Specs, decode_ports,
};
use tracing::{debug, instrument};


/// コマンドラインから渡されるデプロイパラメータ
#[derive(Debug, Clone, PartialEq)]
pub struct DeployParams {
    pub pod: String,
    pub entry: String,
    pub image: String,
    pub network: String,
    pub cpu: f64,
    pub memory: i64,
    pub count: i32,
    pub env: Vec<String>,
}

impl DeployParams {
    /// I/O の前に行うパラメータ検証
    ///
    /// pod / entry / image の欠落は MissingParameter、リソース値の異常は InvalidParameter。
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("pod", &self.pod),
            ("entry", &self.entry),
            ("image", &self.image),
        ] {
            if value.is_empty() {
                return Err(SpecError::MissingParameter(name));
            }
        }

        if self.count <= 0 {
            return Err(SpecError::InvalidParameter {
                name: "count",
                value: self.count.to_string(),
                reason: "1以上を指定してください",
            });
        }
        if !self.cpu.is_finite() || self.cpu <= 0.0 {
            return Err(SpecError::InvalidParameter {
                name: "cpu",
                value: self.cpu.to_string(),
                reason: "正の数を指定してください",
            });
        }
        if self.memory <= 0 {
            return Err(SpecError::InvalidParameter {
                name: "mem",
                value: self.memory.to_string(),
                reason: "正のバイト数を指定してください",
            });
        }

        Ok(())
    }
}

/// spec とパラメータからデプロイリクエストを生成
#[instrument(skip(specs), fields(app = %specs.app_name))]
pub fn compile(specs: &Specs, params: &DeployParams) -> Result<DeployRequest> {
    params.validate()?;

    let entrypoint = specs
        .entrypoint(&params.entry)
        .ok_or_else(|| SpecError::UnknownEntrypoint(params.entry.clone()))?;

    let network_mode = NetworkMode::parse(&params.network);
    debug!(
        ?network_mode,
        user_defined = network_mode.is_user_defined(),
        "Network mode resolved"
    );

    Ok(DeployRequest {
        app_name: specs.app_name.clone(),
        entrypoint: compile_entrypoint(&params.entry, entrypoint)?,
        pod: params.pod.clone(),
        image: params.image.clone(),
        cpu_quota: params.cpu,
        memory: params.memory,
        count: params.count,
        env: params.env.clone(),
        networks: network_mode.networks(),
        network_mode: params.network.clone(),
        volumes: specs.volumes.clone(),
        meta: specs.meta.clone(),
        dns: specs.dns.clone(),
    })
}

/// spec のエントリポイントをリクエスト用に変換
///
/// hook / healthcheck が未指定の場合はゼロ値に畳み込む。
fn compile_entrypoint(name: &str, entrypoint: &Entrypoint) -> Result<EntrypointOptions> {
    let hook = entrypoint
        .hook
        .as_ref()
        .map(|hook| HookOptions {
            after_start: hook.after_start.clone(),
            before_stop: hook.before_stop.clone(),
            force: hook.force,
        })
        .unwrap_or_default();

    let health_check = match &entrypoint.health_check {
        Some(check) => HealthCheckOptions {
            ports: decode_ports(&check.ports)?,
            url: check.url.clone(),
            code: check.code,
        },
        None => HealthCheckOptions::default(),
    };

    debug!(
        entrypoint = name,
        hook = !hook.is_empty(),
        health_check = !health_check.is_empty(),
        "Entrypoint compiled"
    );

    Ok(EntrypointOptions {
        name: name.to_string(),
        command: entrypoint.command.clone(),
        privileged: entrypoint.privileged,
        working_dir: entrypoint.working_dir.clone(),
        log_config: entrypoint.log_config.clone(),
        publish: decode_ports(&entrypoint.publish)?,
        health_check,
        hook,
        restart_policy: entrypoint.restart_policy.clone(),
        extra_hosts: entrypoint.extra_hosts.clone(),
    })
}
