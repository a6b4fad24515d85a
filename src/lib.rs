//! tag-sidecar
//!
//! 画像ごとのタグ・キャプションをサイドカーファイルとして編集し、
//! タガーの推薦から冗長なタグを取り除く。

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod scanner;
pub mod session;
pub mod sidecar;
pub mod tagger;

pub use tag_sidecar_common as common;
