//! タガー出力の後処理
//!
//! モデルのタグ表記（`blue_hair`、`(artist)`）と表示用表記（`blue hair`、`\(artist\)`）の
//! 相互変換、閾値処理、除外タグの適用を行う。

use crate::error::{Result, TagSidecarError};
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// 表示用表記をモデル表記に戻す（空白→`_`、`\(` `\)`→`(` `)`）
pub fn escape_tag(tag: &str) -> String {
    tag.replace(' ', "_").replace("\\(", "(").replace("\\)", ")")
}

/// 除外タグ集合に、モデル表記の変種を加える
pub fn with_escaped_variants<'a, I>(tags: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut variants = HashSet::new();
    for tag in tags {
        variants.insert(escape_tag(tag));
        variants.insert(tag.clone());
    }
    variants
}

/// モデル表記を表示用表記に変換（`_`→空白、括弧とバックスラッシュをエスケープ）
fn display_tag(raw: &str) -> String {
    lazy_static::lazy_static! {
        static ref ESCAPE_RE: Regex = Regex::new(r"([\\()])").unwrap();
    }
    ESCAPE_RE.replace_all(&raw.replace('_', " "), r"\$1").to_string()
}

/// 生のタガー出力を閾値・除外タグで絞り込み、表示用表記に変換
///
/// 除外判定はモデル表記と表示用表記の両方で行う。
/// 変換後に同じタグになった場合は高い信頼度を残す。
pub fn postprocess_tags(
    raw: &HashMap<String, f32>,
    threshold: f32,
    exclude: &HashSet<String>,
) -> HashMap<String, f32> {
    let excluded = with_escaped_variants(exclude);
    let mut result: HashMap<String, f32> = HashMap::new();

    for (tag, &confidence) in raw {
        if !confidence.is_finite() || confidence < threshold || excluded.contains(tag) {
            continue;
        }
        let shown = display_tag(tag);
        if excluded.contains(&shown) {
            continue;
        }
        let confidence = confidence.clamp(0.0, 1.0);
        let entry = result.entry(shown).or_insert(confidence);
        if confidence > *entry {
            *entry = confidence;
        }
    }

    result
}

/// タガーの標準出力から `{"tag": score}` を取り出す
///
/// 前後にログなどが混ざっていても、最初の `{` から最後の `}` までを使う。
pub fn parse_predictions(output: &str) -> Result<HashMap<String, f32>> {
    let start = output
        .find('{')
        .ok_or_else(|| TagSidecarError::TaggerParse("JSONが見つかりません".into()))?;
    let end = output
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| TagSidecarError::TaggerParse("JSONが閉じていません".into()))?;

    serde_json::from_str(&output[start..=end])
        .map_err(|e| TagSidecarError::TaggerParse(format!("JSONパースエラー: {}", e)))
}
