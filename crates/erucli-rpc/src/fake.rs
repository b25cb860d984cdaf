//! テスト用のインメモリなコア
//!
//! 受け取ったリクエストを記録し、あらかじめ積んだ応答をストリームとして返す。

use crate::client::{ContainerLookup, CoreRpc, RpcStream};
use crate::error::Result;
use crate::pb;
use async_trait::async_trait;
use futures_util::stream;
use std::collections::HashMap;
use std::sync::Mutex;
use tonic::Status;

#[derive(Default)]
pub struct FakeCore {
    pub replies: Vec<pb::CreateContainerMessage>,
    pub events: Vec<pb::DeployStatusMessage>,
    pub containers: HashMap<String, pb::Container>,
    pub deploy_options: Mutex<Option<pb::DeployOptions>>,
    pub status_options: Mutex<Option<pb::DeployStatusOptions>>,
}

#[async_trait]
impl CoreRpc for FakeCore {
    async fn create_container(
        &self,
        opts: pb::DeployOptions,
    ) -> Result<RpcStream<pb::CreateContainerMessage>> {
        *self.deploy_options.lock().unwrap() = Some(opts);
        Ok(Box::pin(stream::iter(self.replies.clone().into_iter().map(Ok))))
    }

    async fn deploy_status(
        &self,
        opts: pb::DeployStatusOptions,
    ) -> Result<RpcStream<pb::DeployStatusMessage>> {
        *self.status_options.lock().unwrap() = Some(opts);
        Ok(Box::pin(stream::iter(self.events.clone().into_iter().map(Ok))))
    }
}

#[async_trait]
impl ContainerLookup for FakeCore {
    async fn get_container(&self, id: &str) -> std::result::Result<pb::Container, Status> {
        self.containers
            .get(id)
            .cloned()
            .ok_or_else(|| Status::not_found(format!("container {} not found", id)))
    }
}
