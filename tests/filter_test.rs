//! 冗長フィルタの性質テスト
//!
//! 付与済みタグと推薦の組み合わせに対し、フィルタが満たすべき性質を検証

use std::collections::HashSet;
use tag_sidecar::common::{filter_redundant, taxonomy, TagSet};

fn set(tags: &[&str]) -> HashSet<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

/// 代表的な入力の組み合わせ
fn cases() -> Vec<(TagSet, HashSet<String>)> {
    vec![
        (TagSet::new(), set(&["solo", "red hair", "simple background"])),
        (
            TagSet::from_text("blue hair, long hair"),
            set(&["red hair", "short hair", "twintails", "green eyes", "solo"]),
        ),
        (
            TagSet::from_text("multicolored hair, blue hair"),
            set(&["red hair", "long hair"]),
        ),
        (
            TagSet::from_text("green eyes"),
            set(&["blue eyes", "multicolored eyes", "heterochromia"]),
        ),
        (
            TagSet::from_text("white background"),
            set(&["simple background", "grey background", "gradient background"]),
        ),
        (
            TagSet::from_text("gradient background, blue background"),
            set(&["simple background", "red background", "solo"]),
        ),
        (TagSet::from_text("large breasts"), set(&["small breasts", "cleavage"])),
    ]
}

/// 結果は常に推薦の部分集合
#[test]
fn test_result_is_subset() {
    for (applied, recs) in cases() {
        let result = filter_redundant(&applied, &recs);
        assert!(result.is_subset(&recs), "{:?} -> {:?}", recs, result);
    }
}

/// 付与済みタグは結果に残らない
#[test]
fn test_applied_tags_never_returned() {
    for (applied, recs) in cases() {
        let result = filter_redundant(&applied, &recs);
        for tag in applied.iter() {
            assert!(!result.contains(tag), "{} が残っている", tag);
        }
    }
}

/// 2回適用しても変わらない
#[test]
fn test_idempotent() {
    for (applied, recs) in cases() {
        let once = filter_redundant(&applied, &recs);
        let twice = filter_redundant(&applied, &once);
        assert_eq!(once, twice);
    }
}

/// 排他カテゴリが決まっていれば、そのメンバーは残らない
#[test]
fn test_exclusive_categories_fully_pruned() {
    for (applied, recs) in cases() {
        let result = filter_redundant(&applied, &recs);
        for category in taxonomy().iter() {
            if category.is_exclusive_for(&applied) {
                assert!(
                    result.iter().all(|tag| !category.contains(tag)),
                    "{} のメンバーが残っている: {:?}",
                    category.name(),
                    result
                );
            }
        }
    }
}

/// 付与済みタグが空なら、抑制ルール以外では何も除かれない
#[test]
fn test_empty_applied_keeps_everything_but_suppressed() {
    let recs = set(&["solo", "red hair", "blue hair", "long hair", "short hair"]);
    assert_eq!(filter_redundant(&TagSet::new(), &recs), recs);

    let with_color = set(&["simple background", "white background"]);
    assert_eq!(
        filter_redundant(&TagSet::new(), &with_color),
        set(&["white background"])
    );
}

/// カテゴリに無関係なタグは影響を受けない
#[test]
fn test_uncategorized_tags_survive() {
    let applied = TagSet::from_text("blue hair, long hair, blue eyes, white background");
    let result = filter_redundant(&applied, &set(&["smile", "looking at viewer", "red hair"]));
    assert_eq!(result, set(&["smile", "looking at viewer"]));
}

/// オーバーライドがあると排他にならない
#[test]
fn test_override_disables_pruning() {
    let result = filter_redundant(
        &TagSet::from_text("multicolored hair, blue hair"),
        &set(&["red hair", "long hair"]),
    );
    assert_eq!(result, set(&["red hair", "long hair"]));

    let result = filter_redundant(
        &TagSet::from_text("multicolored eyes"),
        &set(&["blue eyes", "red eyes"]),
    );
    assert_eq!(result, set(&["blue eyes", "red eyes"]));

    // heterochromiaはメンバーなので排他になる
    let result = filter_redundant(
        &TagSet::from_text("heterochromia"),
        &set(&["blue eyes", "red eyes"]),
    );
    assert!(result.is_empty());
}

/// 背景: 推薦に背景色があればsimple backgroundは抑制されるが、逆は起きない
#[test]
fn test_background_asymmetry() {
    let result = filter_redundant(
        &TagSet::new(),
        &set(&["simple background", "blue background"]),
    );
    assert_eq!(result, set(&["blue background"]));

    let result = filter_redundant(
        &TagSet::from_text("simple background"),
        &set(&["blue background"]),
    );
    assert!(result.is_empty());

    let result = filter_redundant(
        &TagSet::from_text("gradient background"),
        &set(&["simple background", "blue background"]),
    );
    assert_eq!(result, set(&["blue background"]));
}

/// テキスト往復でタグ集合が保たれる
#[test]
fn test_tag_text_round_trip() {
    let tags = TagSet::from_text("1girl,  solo ,red hair,, solo");
    assert_eq!(tags.to_text(), "1girl, solo, red hair");
    assert_eq!(TagSet::from_text(&tags.to_text()), tags);
}
