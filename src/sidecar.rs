//! サイドカーファイル入出力モジュール
//!
//! 画像と同じフォルダに置かれる2つのテキストファイルを扱う。
//! - `<stem>.txt`     タグ（`", "` 区切り、1行）
//! - `<stem>.caption` キャプション（自由文）
//!
//! ファイルが無い場合は空として扱い、エラーにしない。
//! 変更判定（dirty）は呼ばれるたびにディスクを読み直す。

use crate::error::{Result, TagSidecarError};
use regex::Regex;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tag_sidecar_common::TagSet;
use tracing::{debug, info, warn};

pub const TAGS_EXTENSION: &str = "txt";
pub const CAPTION_EXTENSION: &str = "caption";

/// 画像に対応するサイドカーファイルのパス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarPaths {
    pub tags: PathBuf,
    pub caption: PathBuf,
}

impl SidecarPaths {
    /// 画像の拡張子を置き換えてパスを導出（拡張子なしなら付与）
    pub fn for_image(image: &Path) -> Self {
        Self {
            tags: image.with_extension(TAGS_EXTENSION),
            caption: image.with_extension(CAPTION_EXTENSION),
        }
    }
}

/// ディスク上のタグとキャプション
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SidecarRecord {
    pub tags: TagSet,
    pub caption: String,
}

/// 保存結果（タグとキャプションは独立して書き込む）
#[derive(Debug)]
pub struct SaveReport {
    pub tags: Result<()>,
    pub caption: Result<()>,
}

impl SaveReport {
    pub fn is_ok(&self) -> bool {
        self.tags.is_ok() && self.caption.is_ok()
    }

    /// 最初の失敗をエラーとして返す
    pub fn into_result(self) -> Result<()> {
        self.tags?;
        self.caption
    }
}

/// 改行を半角スペースに置換し、前後の空白を除去
pub fn normalize_text(text: &str) -> String {
    lazy_static::lazy_static! {
        static ref NEWLINE_RE: Regex = Regex::new(r"\r\n|\r|\n").unwrap();
    }
    NEWLINE_RE.replace_all(text, " ").trim().to_string()
}

/// サイドカーを読み込み（無いファイルは空）
pub fn load(image: &Path) -> Result<SidecarRecord> {
    let paths = SidecarPaths::for_image(image);
    let tags_text = read_optional(&paths.tags)?;
    let caption_text = read_optional(&paths.caption)?;

    let record = SidecarRecord {
        tags: TagSet::from_text(&normalize_text(&tags_text)),
        caption: normalize_text(&caption_text),
    };
    debug!(
        image = %image.display(),
        tags = record.tags.len(),
        caption_len = record.caption.len(),
        "サイドカー読み込み"
    );
    Ok(record)
}

/// サイドカーを保存（常に上書き、無ければ作成）
///
/// 片方の書き込みに失敗しても、もう片方は書き込む。
pub fn save(image: &Path, tags: &TagSet, caption: &str) -> SaveReport {
    let paths = SidecarPaths::for_image(image);
    let report = SaveReport {
        tags: write_file(&paths.tags, &normalize_text(&tags.to_text())),
        caption: write_file(&paths.caption, &normalize_text(caption)),
    };

    if report.is_ok() {
        info!(image = %image.display(), tags = tags.len(), "サイドカー保存");
    }
    report
}

/// メモリ上の値がディスクと異なるか
///
/// タグはタグ集合として、キャプションは正規化した文字列として比較する。
pub fn is_dirty(image: &Path, tags: &TagSet, caption: &str) -> Result<bool> {
    let on_disk = load(image)?;
    let dirty = on_disk.tags != TagSet::from_text(&normalize_text(&tags.to_text()))
        || on_disk.caption != normalize_text(caption);
    debug!(image = %image.display(), dirty, "変更判定");
    Ok(dirty)
}

/// サイドカーの有無（タグ, キャプション）
pub fn exists(image: &Path) -> (bool, bool) {
    let paths = SidecarPaths::for_image(image);
    (paths.tags.is_file(), paths.caption.is_file())
}

fn read_optional(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| {
        warn!(path = %path.display(), error = %source, "サイドカー書き込み失敗");
        TagSidecarError::SidecarWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}
