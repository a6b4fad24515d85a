//! タグ集合モジュール
//!
//! 1枚の画像に付与されたタグを、重複なし・挿入順で保持する。
//! 比較は完全一致のみ（大文字小文字・同義語の正規化はしない）。

use serde::{Deserialize, Serialize};
use std::fmt;

/// タグ区切り（保存時）
pub const TAG_SEPARATOR: &str = ", ";

/// 重複なし・順序保持のタグ集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// カンマ区切りテキストから生成
    ///
    /// 各要素をtrimし、空要素を捨て、最初の出現順で重複を除去する。
    pub fn from_text(text: &str) -> Self {
        text.split(',').collect()
    }

    /// `", "` 区切りのテキストに変換
    pub fn to_text(&self) -> String {
        self.tags.join(TAG_SEPARATOR)
    }

    /// タグを追加（変更があればtrue）
    ///
    /// カンマを含む場合は分割して1つずつ追加する。各要素はカンマを含まないので、
    /// `to_text` → `from_text` で必ず同じ集合に戻る。
    pub fn add(&mut self, tag: &str) -> bool {
        let mut changed = false;
        for part in tag.split(',') {
            let part = part.trim();
            if part.is_empty() || self.contains(part) {
                continue;
            }
            self.tags.push(part.to_string());
            changed = true;
        }
        changed
    }

    /// タグを削除（変更があればtrue）
    pub fn remove(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(index) => {
                self.tags.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.add(tag.as_ref());
        }
        set
    }
}

impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<TagSet> for Vec<String> {
    fn from(set: TagSet) -> Self {
        set.tags
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
