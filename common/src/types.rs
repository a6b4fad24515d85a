//! 共通型定義

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// タガーが返した推薦タグ（信頼度つき）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTag {
    pub tag: String,
    /// 信頼度 (0.0-1.0)
    pub confidence: f32,
}

impl ScoredTag {
    pub fn new(tag: impl Into<String>, confidence: f32) -> Self {
        Self {
            tag: tag.into(),
            confidence,
        }
    }

    /// 表示順: 信頼度の降順、同点はタグ名の昇順
    pub fn display_order(a: &Self, b: &Self) -> Ordering {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.tag.cmp(&b.tag))
    }
}
