//! タガー連携モジュール
//!
//! 機械学習タガー本体はブラックボックスとして扱い、
//! 「画像パス → タグ:信頼度」を返す能力だけを `Tagger` として定義する。
//!
//! 推論は時間がかかるため非同期。結果が古くなった（画像が切り替わった）場合の
//! 破棄は呼び出し側（`EditSession`）が画像パスの比較で行う。

pub mod captioner;
mod command;
mod postprocess;

pub use captioner::{Captioner, CommandCaptioner};
pub use command::CommandTagger;
pub use postprocess::{escape_tag, parse_predictions, postprocess_tags, with_escaped_variants};

use crate::error::Result;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::Path;

/// デフォルトの信頼度閾値
pub const DEFAULT_THRESHOLD: f32 = 0.35;

/// タグ推薦の提供元
pub trait Tagger {
    /// 画像のタグ候補を返す
    ///
    /// 閾値未満の候補と `exclude` に含まれるタグ（エスケープ表記も含む）は除外済み。
    fn tag_image(
        &self,
        image: &Path,
        exclude: &HashSet<String>,
    ) -> impl Future<Output = Result<HashMap<String, f32>>> + Send;
}
