//! ストリームごとの失敗時ポリシー
//!
//! 通信エラーはどちらのストリームでも中断。アイテム単位の失敗は、デプロイ結果と
//! コンテナ検索ではスキップして継続し、ステータスのペイロード破損は中断する。

use crate::error::RpcError;

/// 消費するストリームの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// CreateContainer の結果ストリーム
    Deploy,
    /// DeployStatus のイベントストリーム
    Status,
}

/// ストリーム消費中に起こりうる失敗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFailure {
    /// チャネルの破損
    Transport,
    /// レプリカ1件のデプロイ失敗
    Replica,
    /// イベントに対応するコンテナの検索失敗
    Lookup,
    /// ラベルフィルタに一致しない
    Filtered,
    /// ステータスペイロードのデコード失敗
    PayloadDecode,
}

/// 失敗後の振る舞い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 報告して次のアイテムへ
    Continue,
    /// ストリーム全体を中断
    Abort,
}

/// 失敗したアイテムをポリシー表に従って処理する
///
/// 継続なら `None`、中断なら返すべきエラーを返す。エラーは中断時にだけ組み立てる。
pub(crate) fn settle<F>(stream: StreamKind, failure: ItemFailure, err: F) -> Option<RpcError>
where
    F: FnOnce() -> RpcError,
{
    match disposition(stream, failure) {
        Disposition::Continue => None,
        Disposition::Abort => Some(err()),
    }
}

/// ポリシー表
pub fn disposition(stream: StreamKind, failure: ItemFailure) -> Disposition {
    use Disposition::*;
    use ItemFailure::*;

    match (stream, failure) {
        (StreamKind::Deploy, Transport) => Abort,
        (StreamKind::Deploy, Replica) => Continue,

        (StreamKind::Status, Transport) => Abort,
        (StreamKind::Status, Lookup) => Continue,
        (StreamKind::Status, Filtered) => Continue,
        (StreamKind::Status, PayloadDecode) => Abort,

        // そのストリームでは発生しない組み合わせ
        (StreamKind::Deploy, Lookup | Filtered | PayloadDecode) | (StreamKind::Status, Replica) => {
            Abort
        }
    }
}
