//! タグカテゴリ分類モジュール
//!
//! 相互排他的なタグのグループ（髪の長さ・髪色・髪型・目の色・胸のサイズ・背景）を
//! 組み込みの定数として保持する。実行時の登録・変更はできない。
//!
//! レジストリはプロセス全体で一度だけ初期化される。

use crate::tag_set::TagSet;
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

pub const HAIR_LENGTH: &str = "hair length";
pub const HAIR_COLOR: &str = "hair color";
pub const HAIR_STYLE: &str = "hair style";
pub const EYE_COLOR: &str = "eye color";
pub const BREAST_SIZE: &str = "breast size";
pub const BACKGROUND: &str = "background";

pub const MULTICOLORED_HAIR: &str = "multicolored hair";
pub const MULTICOLORED_EYES: &str = "multicolored eyes";
pub const GRADIENT_BACKGROUND: &str = "gradient background";
pub const SIMPLE_BACKGROUND: &str = "simple background";

const HAIR_LENGTHS: &[&str] = &[
    "very short hair",
    "short hair",
    "medium hair",
    "long hair",
    "very long hair",
    "absurdly long hair",
    "big hair",
    "bald",
];

const HAIR_COLORS: &[&str] = &[
    "aqua hair",
    "black hair",
    "blonde hair",
    "blue hair",
    "light blue hair",
    "dark blue hair",
    "brown hair",
    "light brown hair",
    "green hair",
    "dark green hair",
    "grey hair",
    "orange hair",
    "pink hair",
    "purple hair",
    "light purple hair",
    "red hair",
    "white hair",
];

const HAIR_STYLES: &[&str] = &[
    // 短髪
    "bob cut",
    "inverted bob",
    "bowl cut",
    "buzz cut",
    "chonmage",
    "crew cut",
    "flattop",
    "okappa",
    "pixie cut",
    "undercut",
    "flipped hair",
    "wolf cut",
    "hime cut",
    "mullet",
    // 編み込み・結い上げ
    "bantu knots",
    "bow-shaped hair",
    "shuangyaji",
    "braid",
    "braided bangs",
    "front braid",
    "side braid",
    "french braid",
    "cornrows",
    "crown braid",
    "dreadlocks",
    "single braid",
    "multiple braids",
    "twin braids",
    "low twin braids",
    "tri braids",
    "quad braids",
    "flower-shaped hair",
    "hair bun",
    "braided bun",
    "single hair bun",
    "double bun",
    "cone hair bun",
    "doughnut hair bun",
    "heart hair bun",
    "triple bun",
    "hair rings",
    "feixianji",
    "katsuyamamage",
    "single hair ring",
    "half updo",
    "half up braid",
    "half up half down braid",
    "one side up",
    "two side up",
    "low-braided long hair",
    "low-tied long hair",
    "mizura",
    "multi-tied hair",
    "nihongami",
    // ポニーテール・ツインテール
    "ponytail",
    "folded ponytail",
    "front ponytail",
    "high ponytail",
    "short ponytail",
    "side ponytail",
    "split ponytail",
    "star-shaped hair",
    "topknot",
    "twintails",
    "low twintails",
    "short twintails",
    "uneven twintails",
    "tri tails",
    "quad tails",
    "quin tails",
    "twisted hair",
    // ボリューム系
    "afro",
    "huge afro",
    "beehive hairdo",
    "crested hair",
    "liangbatou",
    "pompadour",
    "quiff",
];

// "multicolored eyes" はメンバー兼オーバーライド
const EYE_COLORS: &[&str] = &[
    "aqua eyes",
    "black eyes",
    "blue eyes",
    "brown eyes",
    "green eyes",
    "grey eyes",
    "orange eyes",
    "purple eyes",
    "pink eyes",
    "red eyes",
    "white eyes",
    "yellow eyes",
    "amber eyes",
    "heterochromia",
    MULTICOLORED_EYES,
];

const BREAST_SIZES: &[&str] = &[
    "flat chest",
    "small breasts",
    "medium breasts",
    "large breasts",
    "huge breasts",
    "gigantic breasts",
];

const BACKGROUND_COLORS: &[&str] = &[
    "aqua background",
    "black background",
    "blue background",
    "brown background",
    "green background",
    "grey background",
    "light brown background",
    "orange background",
    "pink background",
    "purple background",
    "red background",
    "white background",
    "yellow background",
];

/// 推薦集合に依存する抑制ルール
///
/// 推薦集合に `trigger` のいずれかが含まれていれば、`suppressed` を推薦から外す。
/// オーバーライドの有無には左右されない。
#[derive(Debug, Clone)]
pub struct Suppression {
    pub trigger: HashSet<&'static str>,
    pub suppressed: &'static str,
}

/// 相互排他的なタグのカテゴリ
#[derive(Debug, Clone)]
pub struct Category {
    name: &'static str,
    members: HashSet<&'static str>,
    overrides: HashSet<&'static str>,
    suppression: Option<Suppression>,
}

impl Category {
    fn new(name: &'static str, members: &[&'static str], overrides: &[&'static str]) -> Self {
        Self {
            name,
            members: members.iter().copied().collect(),
            overrides: overrides.iter().copied().collect(),
            suppression: None,
        }
    }

    fn with_suppression(mut self, trigger: &[&'static str], suppressed: &'static str) -> Self {
        self.suppression = Some(Suppression {
            trigger: trigger.iter().copied().collect(),
            suppressed,
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn members(&self) -> &HashSet<&'static str> {
        &self.members
    }

    pub fn overrides(&self) -> &HashSet<&'static str> {
        &self.overrides
    }

    pub fn suppression(&self) -> Option<&Suppression> {
        self.suppression.as_ref()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.members.contains(tag)
    }

    /// 付与済みタグにこのカテゴリのメンバーが1つでもあるか
    pub fn is_in_category(&self, tags: &TagSet) -> bool {
        tags.iter().any(|t| self.members.contains(t))
    }

    /// 付与済みタグにオーバーライドタグがあるか（排他性を解除）
    pub fn is_overridden(&self, tags: &TagSet) -> bool {
        tags.iter().any(|t| self.overrides.contains(t))
    }

    /// このカテゴリで排他ルールが有効か
    pub fn is_exclusive_for(&self, tags: &TagSet) -> bool {
        self.is_in_category(tags) && !self.is_overridden(tags)
    }
}

/// 組み込みカテゴリのレジストリ（固定順）
#[derive(Debug)]
pub struct Taxonomy {
    categories: Vec<Category>,
    by_name: HashMap<&'static str, usize>,
}

impl Taxonomy {
    fn builtin() -> Self {
        let backgrounds: Vec<&'static str> = BACKGROUND_COLORS
            .iter()
            .copied()
            .chain([SIMPLE_BACKGROUND, GRADIENT_BACKGROUND])
            .collect();

        let categories = vec![
            Category::new(HAIR_LENGTH, HAIR_LENGTHS, &[]),
            Category::new(HAIR_COLOR, HAIR_COLORS, &[MULTICOLORED_HAIR]),
            Category::new(HAIR_STYLE, HAIR_STYLES, &[]),
            Category::new(EYE_COLOR, EYE_COLORS, &[MULTICOLORED_EYES]),
            Category::new(BREAST_SIZE, BREAST_SIZES, &[]),
            Category::new(BACKGROUND, &backgrounds, &[GRADIENT_BACKGROUND])
                .with_suppression(BACKGROUND_COLORS, SIMPLE_BACKGROUND),
        ];

        let by_name = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name, i))
            .collect();

        Self { categories, by_name }
    }

    /// カテゴリ名で検索
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.by_name.get(name).map(|&i| &self.categories[i])
    }

    /// フィルタ適用順（髪の長さ→髪色→髪型→目→胸→背景）で列挙
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

lazy_static! {
    static ref TAXONOMY: Taxonomy = Taxonomy::builtin();
}

/// 組み込みレジストリを取得
pub fn taxonomy() -> &'static Taxonomy {
    &TAXONOMY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order() {
        let names: Vec<&str> = taxonomy().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![HAIR_LENGTH, HAIR_COLOR, HAIR_STYLE, EYE_COLOR, BREAST_SIZE, BACKGROUND]
        );
    }

    #[test]
    fn test_lookup_by_name() {
        let color = taxonomy().get(HAIR_COLOR).expect("hair color");
        assert!(color.contains("blue hair"));
        assert!(color.overrides().contains(MULTICOLORED_HAIR));
        assert!(taxonomy().get("nose shape").is_none());
    }

    #[test]
    fn test_is_in_category() {
        let length = taxonomy().get(HAIR_LENGTH).unwrap();
        assert!(length.is_in_category(&TagSet::from_text("1girl, long hair")));
        assert!(!length.is_in_category(&TagSet::from_text("1girl, blue hair")));
        assert!(!length.is_in_category(&TagSet::new()));
    }

    #[test]
    fn test_multicolored_hair_is_not_a_hair_color() {
        let color = taxonomy().get(HAIR_COLOR).unwrap();
        let tags = TagSet::from_text(MULTICOLORED_HAIR);
        assert!(!color.is_in_category(&tags));
        assert!(color.is_overridden(&tags));
    }

    #[test]
    fn test_multicolored_eyes_is_member_and_override() {
        let eyes = taxonomy().get(EYE_COLOR).unwrap();
        let tags = TagSet::from_text(MULTICOLORED_EYES);
        assert!(eyes.is_in_category(&tags));
        assert!(!eyes.is_exclusive_for(&tags));
    }

    #[test]
    fn test_background_members_and_suppression() {
        let background = taxonomy().get(BACKGROUND).unwrap();
        assert_eq!(background.members().len(), BACKGROUND_COLORS.len() + 2);
        assert!(background.contains(SIMPLE_BACKGROUND));
        assert!(background.contains(GRADIENT_BACKGROUND));

        let rule = background.suppression().expect("background suppression");
        assert_eq!(rule.suppressed, SIMPLE_BACKGROUND);
        assert!(rule.trigger.contains("blue background"));
        assert!(!rule.trigger.contains(SIMPLE_BACKGROUND));
    }

    #[test]
    fn test_only_background_has_suppression() {
        let with_rule: Vec<&str> = taxonomy()
            .iter()
            .filter(|c| c.suppression().is_some())
            .map(|c| c.name())
            .collect();
        assert_eq!(with_rule, vec![BACKGROUND]);
    }

    #[test]
    fn test_categories_are_independent() {
        let length = taxonomy().get(HAIR_LENGTH).unwrap();
        assert!(!length.contains("blue hair"));
        assert!(!length.is_in_category(&TagSet::from_text("blue hair, ponytail")));
    }
}
