//! Tag Sidecar Common Library
//!
//! タグ集合・カテゴリ分類・推薦フィルタの純粋ロジック（ファイルI/Oなし）

pub mod types;
pub mod tag_set;
pub mod taxonomy;
pub mod filter;

pub use types::ScoredTag;
pub use tag_set::TagSet;
pub use taxonomy::{taxonomy, Category, Suppression, Taxonomy};
pub use filter::{filter_redundant, filter_scored};
