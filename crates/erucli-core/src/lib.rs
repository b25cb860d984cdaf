//! Eru CLI core
//!
//! デプロイ spec の読み込みと、コアへ送信するデプロイリクエストの生成を担当します。

pub mod compiler;
pub mod error;
pub mod loader;
pub mod model;

pub use compiler::{DeployParams, compile};
pub use error::{Result, SpecError};
pub use loader::{SpecSource, load_specs, parse_specs};
pub use model::*;
