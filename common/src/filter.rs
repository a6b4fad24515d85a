//! 推薦タグの冗長フィルタ
//!
//! 付与済みタグから見て情報を増やさない推薦（既に付与済み、または排他カテゴリで
//! 既に1つ決まっているもの）を取り除く。副作用なしの純粋関数。
//!
//! 処理順:
//! 1. 付与済みタグと完全一致する推薦を除去
//! 2. カテゴリを固定順に走査し、各カテゴリで
//!    - 抑制ルールがあれば、現在の推薦集合に対して先に適用
//!    - 付与済みタグがカテゴリに属し、オーバーライドがなければメンバーを全除去

use crate::tag_set::TagSet;
use crate::taxonomy::{taxonomy, Category};
use crate::types::ScoredTag;
use std::collections::{HashMap, HashSet};

/// 冗長な推薦を除去した集合を返す
pub fn filter_redundant(applied: &TagSet, recommendations: &HashSet<String>) -> HashSet<String> {
    let mut remaining: HashSet<String> = recommendations
        .iter()
        .filter(|tag| !applied.contains(tag))
        .cloned()
        .collect();

    for category in taxonomy().iter() {
        prune_category(category, applied, &mut remaining);
    }

    remaining
}

/// 信頼度つき推薦に同じフィルタを適用し、表示順に並べて返す
pub fn filter_scored(applied: &TagSet, recommendations: &HashMap<String, f32>) -> Vec<ScoredTag> {
    let candidates: HashSet<String> = recommendations.keys().cloned().collect();
    let kept = filter_redundant(applied, &candidates);

    let mut scored: Vec<ScoredTag> = recommendations
        .iter()
        .filter(|(tag, _)| kept.contains(tag.as_str()))
        .map(|(tag, &confidence)| ScoredTag::new(tag.clone(), confidence))
        .collect();
    scored.sort_by(ScoredTag::display_order);
    scored
}

fn prune_category(category: &Category, applied: &TagSet, remaining: &mut HashSet<String>) {
    // 抑制ルールは付与済みタグではなく推薦集合で判定する
    if let Some(rule) = category.suppression() {
        if remaining.iter().any(|tag| rule.trigger.contains(tag.as_str())) {
            remaining.remove(rule.suppressed);
        }
    }

    if category.is_exclusive_for(applied) {
        remaining.retain(|tag| !category.contains(tag));
    }
}
