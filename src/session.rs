//! 編集セッションモジュール
//!
//! 表示中の1枚の画像について、タグ集合・キャプション・推薦を保持する。
//! UI層はこのセッションを通してのみ編集し、フィルタやタガーには
//! セッションが持つ値のコピーを渡す。
//!
//! ## 状態遷移
//! - Clean: 読み込み直後・保存直後（ディスクとメモリが一致）
//! - Dirty: タグ追加/削除・キャプション編集後
//! - 別画像へ移動する際、Dirtyなら `SavePrompt` に保存/破棄/キャンセルを問い合わせる
//!
//! Dirtyかどうかはフラグで持たず、問い合わせのたびにディスクと比較する。

use crate::error::{Result, TagSidecarError};
use crate::sidecar;
use crate::tagger::{Captioner, Tagger};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tag_sidecar_common::{filter_scored, ScoredTag, TagSet};
use tracing::{debug, info, warn};

/// 未保存の変更がある状態で移動するときの選択
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveDecision {
    Save,
    Discard,
    Cancel,
}

/// 未保存確認の問い合わせ先（UI層が実装）
pub trait SavePrompt {
    fn confirm_unsaved(&mut self, image: &Path) -> Result<SaveDecision>;
}

impl<F> SavePrompt for F
where
    F: FnMut(&Path) -> SaveDecision,
{
    fn confirm_unsaved(&mut self, image: &Path) -> Result<SaveDecision> {
        Ok(self(image))
    }
}

/// 画像移動の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// 移動した（`saved` は移動前に保存したか）
    Switched { saved: bool },
    /// キャンセルされ、元の画像に留まった
    Cancelled,
}

/// タガーに渡す依頼内容（セッションの値のコピー）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    pub image: PathBuf,
    pub exclude: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct EditSession {
    image: Option<PathBuf>,
    tags: TagSet,
    caption: String,
    /// タガーの生出力（フィルタ前）
    raw_recommendations: HashMap<String, f32>,
    /// 付与済みタグでフィルタした表示用の推薦
    recommendations: Vec<ScoredTag>,
    caption_suggestion: Option<String>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 画像を読み込み、セッションの内容を置き換える
    ///
    /// 推薦とキャプション候補は破棄される。
    pub fn load_image(&mut self, path: &Path) -> Result<()> {
        let record = sidecar::load(path)?;
        self.image = Some(path.to_path_buf());
        self.tags = record.tags;
        self.caption = record.caption;
        self.raw_recommendations.clear();
        self.recommendations.clear();
        self.caption_suggestion = None;
        debug!(image = %path.display(), tags = self.tags.len(), "画像読み込み");
        Ok(())
    }

    pub fn current_image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// フィルタ済みの推薦（信頼度の降順）
    pub fn recommendations(&self) -> &[ScoredTag] {
        &self.recommendations
    }

    pub fn caption_suggestion(&self) -> Option<&str> {
        self.caption_suggestion.as_deref()
    }

    pub fn add_tag(&mut self, tag: &str) -> bool {
        let changed = self.tags.add(tag);
        if changed {
            self.refilter();
        }
        changed
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let changed = self.tags.remove(tag);
        if changed {
            self.refilter();
        }
        changed
    }

    /// カンマ区切りテキストでタグを置き換える
    pub fn edit_tags_from_text(&mut self, text: &str) {
        self.tags = TagSet::from_text(text);
        self.refilter();
    }

    pub fn set_caption(&mut self, caption: &str) {
        self.caption = caption.to_string();
    }

    /// 推薦タグを付与する（推薦一覧からは消える）
    pub fn apply_recommendation(&mut self, tag: &str) -> bool {
        self.raw_recommendations.remove(tag);
        let changed = self.tags.add(tag);
        self.refilter();
        changed
    }

    /// 現在の推薦をすべて付与する
    ///
    /// 1つ付与するたびにフィルタし直すので、排他カテゴリからは
    /// 信頼度の最も高い1つだけが付与される。
    pub fn apply_all_recommendations(&mut self) -> usize {
        let mut applied = 0;
        while let Some(top) = self.recommendations.first().map(|r| r.tag.clone()) {
            if self.apply_recommendation(&top) {
                applied += 1;
            }
        }
        applied
    }

    /// 現在の画像を保存
    pub fn save_current(&self) -> Result<()> {
        let image = self.image.as_deref().ok_or(TagSidecarError::NoActiveImage)?;
        sidecar::save(image, &self.tags, &self.caption).into_result()
    }

    /// ディスクの内容と異なるか（画像未読み込みならfalse）
    pub fn is_dirty(&self) -> Result<bool> {
        match self.image.as_deref() {
            Some(image) => sidecar::is_dirty(image, &self.tags, &self.caption),
            None => Ok(false),
        }
    }

    /// 別の画像へ移動する
    ///
    /// 未保存の変更があれば `prompt` に問い合わせる。
    /// - Save: 保存してから移動（保存失敗時は移動しない）
    /// - Discard: 保存せずに移動
    /// - Cancel: 移動しない
    pub fn navigate_to<P: SavePrompt>(
        &mut self,
        path: &Path,
        prompt: &mut P,
    ) -> Result<NavigationOutcome> {
        let mut saved = false;

        if self.is_dirty()? {
            let current = self.image.clone().unwrap_or_default();
            match prompt.confirm_unsaved(&current)? {
                SaveDecision::Save => {
                    self.save_current()?;
                    saved = true;
                }
                SaveDecision::Discard => {
                    info!(image = %current.display(), "変更を破棄");
                }
                SaveDecision::Cancel => return Ok(NavigationOutcome::Cancelled),
            }
        }

        self.load_image(path)?;
        Ok(NavigationOutcome::Switched { saved })
    }

    /// タガーへの依頼内容を作る（画像未読み込みならNone）
    pub fn recommendation_request(&self) -> Option<RecommendationRequest> {
        let image = self.image.clone()?;
        Some(RecommendationRequest {
            image,
            exclude: self.tags.iter().map(String::from).collect(),
        })
    }

    /// タガーの結果を受け取る
    ///
    /// 依頼時の画像が現在の画像と異なる場合は古い結果として破棄し、falseを返す。
    pub fn accept_recommendations(&mut self, image: &Path, scores: HashMap<String, f32>) -> bool {
        if self.image.as_deref() != Some(image) {
            warn!(image = %image.display(), "古い推薦結果を破棄");
            return false;
        }
        self.raw_recommendations = scores;
        self.refilter();
        true
    }

    /// タガーを呼び出して推薦を更新
    pub async fn refresh_recommendations<T: Tagger>(&mut self, tagger: &T) -> Result<bool> {
        let request = self
            .recommendation_request()
            .ok_or(TagSidecarError::NoActiveImage)?;
        let scores = tagger.tag_image(&request.image, &request.exclude).await?;
        Ok(self.accept_recommendations(&request.image, scores))
    }

    /// キャプション候補を受け取る（古い結果は破棄）
    pub fn accept_caption_suggestion(&mut self, image: &Path, caption: String) -> bool {
        if self.image.as_deref() != Some(image) {
            warn!(image = %image.display(), "古いキャプション候補を破棄");
            return false;
        }
        self.caption_suggestion = Some(caption);
        true
    }

    /// キャプション生成を呼び出して候補を更新
    pub async fn refresh_caption_suggestion<C: Captioner>(&mut self, captioner: &C) -> Result<bool> {
        let image = self.image.clone().ok_or(TagSidecarError::NoActiveImage)?;
        let caption = captioner.describe_image(&image).await?;
        Ok(self.accept_caption_suggestion(&image, caption))
    }

    /// キャプション候補をキャプションとして採用
    pub fn apply_caption_suggestion(&mut self) -> bool {
        match self.caption_suggestion.take() {
            Some(caption) => {
                self.caption = caption;
                true
            }
            None => false,
        }
    }

    fn refilter(&mut self) {
        self.recommendations = filter_scored(&self.tags, &self.raw_recommendations);
    }
}
