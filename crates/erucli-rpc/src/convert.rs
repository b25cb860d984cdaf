//! DeployRequest からワイヤメッセージへの変換

use crate::pb;
use erucli_core::{DeployRequest, EntrypointOptions, HealthCheckOptions, HookOptions};

impl From<&HookOptions> for pb::HookOptions {
    fn from(hook: &HookOptions) -> Self {
        Self {
            after_start: hook.after_start.clone(),
            before_stop: hook.before_stop.clone(),
            force: hook.force,
        }
    }
}

impl From<&HealthCheckOptions> for pb::HealthCheckOptions {
    fn from(check: &HealthCheckOptions) -> Self {
        Self {
            ports: check.ports.iter().map(ToString::to_string).collect(),
            url: check.url.clone(),
            code: check.code,
        }
    }
}

impl From<&EntrypointOptions> for pb::EntrypointOptions {
    fn from(entry: &EntrypointOptions) -> Self {
        Self {
            name: entry.name.clone(),
            command: entry.command.clone(),
            privileged: entry.privileged,
            working_dir: entry.working_dir.clone(),
            log_config: entry.log_config.clone(),
            publish: entry.publish.iter().map(ToString::to_string).collect(),
            // 未設定でも空のメッセージとして送る
            healthcheck: Some((&entry.health_check).into()),
            hook: Some((&entry.hook).into()),
            restart_policy: entry.restart_policy.clone(),
            extra_hosts: entry.extra_hosts.clone(),
        }
    }
}

impl From<&DeployRequest> for pb::DeployOptions {
    fn from(request: &DeployRequest) -> Self {
        Self {
            name: request.app_name.clone(),
            entrypoint: Some((&request.entrypoint).into()),
            podname: request.pod.clone(),
            image: request.image.clone(),
            cpu_quota: request.cpu_quota,
            memory: request.memory,
            count: request.count,
            env: request.env.clone(),
            dns: request.dns.clone(),
            volumes: request.volumes.clone(),
            networks: request.networks.clone(),
            networkmode: request.network_mode.clone(),
            meta: request.meta.clone(),
        }
    }
}
