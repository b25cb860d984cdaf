//! モデル定義
//!
//! デプロイ spec と、そこから生成されるデプロイリクエストのデータモデルを定義します。

mod network;
mod port;
mod request;
mod spec;

// Re-exports
pub use network::*;
pub use port::*;
pub use request::*;
pub use spec::*;
