//! コア RPC クライアント
//!
//! tonic のチャネル上に `pb.CoreRPC` のメソッドを実装する。
//! ストリーム処理側は [`CoreRpc`] / [`ContainerLookup`] トレイト越しに利用する。

use crate::error::{Result, RpcError};
use crate::pb;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tonic::{IntoRequest, Status};
use tracing::{debug, info};

const CREATE_CONTAINER_PATH: &str = "/pb.CoreRPC/CreateContainer";
const DEPLOY_STATUS_PATH: &str = "/pb.CoreRPC/DeployStatus";
const GET_CONTAINER_PATH: &str = "/pb.CoreRPC/GetContainer";

/// サーバーストリーミングのレスポンス
pub type RpcStream<T> = BoxStream<'static, std::result::Result<T, Status>>;

/// コアのストリーミング RPC
#[async_trait]
pub trait CoreRpc: Send + Sync {
    /// デプロイリクエストを送信し、レプリカごとの結果ストリームを返す
    async fn create_container(
        &self,
        opts: pb::DeployOptions,
    ) -> Result<RpcStream<pb::CreateContainerMessage>>;

    /// ステータスイベントを購読する
    async fn deploy_status(
        &self,
        opts: pb::DeployStatusOptions,
    ) -> Result<RpcStream<pb::DeployStatusMessage>>;
}

/// コンテナIDからコンテナ情報を引く
#[async_trait]
pub trait ContainerLookup: Send + Sync {
    async fn get_container(&self, id: &str) -> std::result::Result<pb::Container, Status>;
}

/// tonic ベースのクライアント
#[derive(Debug, Clone)]
pub struct CoreClient {
    inner: Grpc<Channel>,
}

impl CoreClient {
    /// `host:port` または URI で指定されたコアに接続
    pub async fn connect(address: &str) -> Result<Self> {
        let uri = if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        };
        let connect_error = |source| RpcError::Connect {
            address: address.to_string(),
            source,
        };

        debug!(%uri, "Connecting to core");
        let channel = Endpoint::from_shared(uri)
            .map_err(connect_error)?
            .connect()
            .await
            .map_err(connect_error)?;
        info!(address, "Connected to core");

        Ok(Self {
            inner: Grpc::new(channel),
        })
    }

    async fn ready(&self) -> std::result::Result<Grpc<Channel>, Status> {
        let mut grpc = self.inner.clone();
        grpc.ready()
            .await
            .map_err(|e| Status::unknown(format!("Service was not ready: {}", e)))?;
        Ok(grpc)
    }
}

#[async_trait]
impl CoreRpc for CoreClient {
    async fn create_container(
        &self,
        opts: pb::DeployOptions,
    ) -> Result<RpcStream<pb::CreateContainerMessage>> {
        let mut grpc = self.ready().await?;
        let response = grpc
            .server_streaming(
                opts.into_request(),
                PathAndQuery::from_static(CREATE_CONTAINER_PATH),
                ProstCodec::default(),
            )
            .await?;
        Ok(Box::pin(response.into_inner()))
    }

    async fn deploy_status(
        &self,
        opts: pb::DeployStatusOptions,
    ) -> Result<RpcStream<pb::DeployStatusMessage>> {
        let mut grpc = self.ready().await?;
        let response = grpc
            .server_streaming(
                opts.into_request(),
                PathAndQuery::from_static(DEPLOY_STATUS_PATH),
                ProstCodec::default(),
            )
            .await?;
        Ok(Box::pin(response.into_inner()))
    }
}

#[async_trait]
impl ContainerLookup for CoreClient {
    async fn get_container(&self, id: &str) -> std::result::Result<pb::Container, Status> {
        let mut grpc = self.ready().await?;
        let request = pb::ContainerId { id: id.to_string() };
        let response = grpc
            .unary(
                request.into_request(),
                PathAndQuery::from_static(GET_CONTAINER_PATH),
                ProstCodec::default(),
            )
            .await?;
        Ok(response.into_inner())
    }
}
