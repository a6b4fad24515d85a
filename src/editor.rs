//! 対話式ブラウズモジュール
//!
//! フォルダ内の画像を1枚ずつ表示し、タグ・キャプションを編集する。
//! 編集はすべて `EditSession` 経由で行い、移動時の未保存確認は
//! `DialoguerPrompt` が担当する。

use crate::config::Config;
use crate::error::{Result, TagSidecarError};
use crate::scanner::{self, ImageInfo};
use crate::session::{EditSession, NavigationOutcome, SaveDecision, SavePrompt};
use crate::tagger::{CommandCaptioner, CommandTagger};
use dialoguer::{Input, Select};
use std::path::Path;
use tracing::warn;

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// 次の画像へ
    Next,
    /// 前の画像へ
    Previous,
    /// タグを追加
    Add(String),
    /// タグを削除
    Remove(String),
    /// タグをテキストで置き換え
    SetTags(String),
    /// キャプションを設定
    Caption(String),
    /// タガーで推薦を取得
    Recommend,
    /// N番目の推薦を付与（1始まり）
    Apply(usize),
    /// すべての推薦を付与
    ApplyAll,
    /// キャプション候補を生成
    Describe,
    /// キャプション候補を採用
    UseSuggestion,
    /// 保存
    Save,
    Help,
    /// 終了
    Quit,
    Unknown(String),
}

/// 入力行をアクションに変換
pub fn parse_action(input: &str) -> EditorAction {
    let trimmed = input.trim();

    if let Some(tag) = trimmed.strip_prefix('+') {
        return EditorAction::Add(tag.trim().to_string());
    }
    if let Some(tag) = trimmed.strip_prefix('-') {
        return EditorAction::Remove(tag.trim().to_string());
    }

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    match command {
        "" | "n" => EditorAction::Next,
        "p" => EditorAction::Previous,
        "t" => EditorAction::SetTags(rest.to_string()),
        "c" => EditorAction::Caption(rest.to_string()),
        "r" => EditorAction::Recommend,
        "a" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => EditorAction::Apply(n),
            _ => EditorAction::Unknown(trimmed.to_string()),
        },
        "A" => EditorAction::ApplyAll,
        "d" => EditorAction::Describe,
        "u" => EditorAction::UseSuggestion,
        "w" => EditorAction::Save,
        "?" | "h" => EditorAction::Help,
        "q" | "Q" => EditorAction::Quit,
        _ => EditorAction::Unknown(trimmed.to_string()),
    }
}

/// 未保存確認（保存/破棄/キャンセル）
pub struct DialoguerPrompt;

impl SavePrompt for DialoguerPrompt {
    fn confirm_unsaved(&mut self, image: &Path) -> Result<SaveDecision> {
        let name = image
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let choice = Select::new()
            .with_prompt(format!("{} に未保存の変更があります", name))
            .items(&["保存", "破棄", "キャンセル"])
            .default(0)
            .interact()
            .map_err(|e| TagSidecarError::CliExecution(e.to_string()))?;

        Ok(match choice {
            0 => SaveDecision::Save,
            1 => SaveDecision::Discard,
            _ => SaveDecision::Cancel,
        })
    }
}

/// 対話式でフォルダを閲覧・編集
pub async fn run_browse(folder: &Path, config: &Config) -> Result<()> {
    let images = scanner::scan_folder(folder)?;
    if images.is_empty() {
        return Err(TagSidecarError::NoImagesFound(folder.display().to_string()));
    }

    let tagger = CommandTagger::from_config(config).ok();
    let captioner = CommandCaptioner::from_config(config).ok();
    let mut prompt = DialoguerPrompt;
    let mut session = EditSession::new();
    let mut index = 0;

    session.load_image(&images[index].path)?;
    print_help();

    loop {
        print_status(&session, &images, index);

        let input: String = Input::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| TagSidecarError::CliExecution(e.to_string()))?;

        match parse_action(&input) {
            EditorAction::Next => {
                if index + 1 >= images.len() {
                    println!("  最後の画像です");
                } else if move_to(&mut session, &images[index + 1], &mut prompt) {
                    index += 1;
                }
            }
            EditorAction::Previous => {
                if index == 0 {
                    println!("  最初の画像です");
                } else if move_to(&mut session, &images[index - 1], &mut prompt) {
                    index -= 1;
                }
            }
            EditorAction::Add(tag) => {
                if !session.add_tag(&tag) {
                    println!("  追加されませんでした（空または既存）: {}", tag);
                }
            }
            EditorAction::Remove(tag) => {
                if !session.remove_tag(&tag) {
                    println!("  タグがありません: {}", tag);
                }
            }
            EditorAction::SetTags(text) => session.edit_tags_from_text(&text),
            EditorAction::Caption(text) => session.set_caption(&text),
            EditorAction::Recommend => match &tagger {
                Some(tagger) => {
                    println!("  タガー実行中...");
                    if let Err(e) = session.refresh_recommendations(tagger).await {
                        println!("  ✗ {}", e);
                    }
                }
                None => println!("  ✗ {}", TagSidecarError::MissingTaggerCommand),
            },
            EditorAction::Apply(n) => {
                match session.recommendations().get(n - 1).map(|r| r.tag.clone()) {
                    Some(tag) => {
                        session.apply_recommendation(&tag);
                        println!("  → {}", tag);
                    }
                    None => println!("  推薦 {} はありません", n),
                }
            }
            EditorAction::ApplyAll => {
                let applied = session.apply_all_recommendations();
                println!("  → {}件付与", applied);
            }
            EditorAction::Describe => match &captioner {
                Some(captioner) => {
                    println!("  キャプション生成中...");
                    if let Err(e) = session.refresh_caption_suggestion(captioner).await {
                        println!("  ✗ {}", e);
                    }
                }
                None => println!("  ✗ {}", TagSidecarError::MissingCaptionerCommand),
            },
            EditorAction::UseSuggestion => {
                if !session.apply_caption_suggestion() {
                    println!("  キャプション候補がありません");
                }
            }
            EditorAction::Save => match session.save_current() {
                Ok(()) => println!("  ✔ 保存しました"),
                Err(e) => println!("  ✗ {}", e),
            },
            EditorAction::Help => print_help(),
            EditorAction::Quit => {
                if confirm_quit(&session, &mut prompt) {
                    break;
                }
            }
            EditorAction::Unknown(input) => println!("  不明な操作: {} (?でヘルプ)", input),
        }
    }

    Ok(())
}

/// 画像を移動（移動できたらtrue）
///
/// 保存失敗などのエラーは表示して現在の画像に留まる。編集内容はセッションに残る。
fn move_to<P: SavePrompt>(session: &mut EditSession, image: &ImageInfo, prompt: &mut P) -> bool {
    match session.navigate_to(&image.path, prompt) {
        Ok(NavigationOutcome::Switched { saved }) => {
            if saved {
                println!("  ✔ 保存しました");
            }
            true
        }
        Ok(NavigationOutcome::Cancelled) => false,
        Err(e) => {
            println!("  ✗ {}", e);
            false
        }
    }
}

/// 終了してよいか（エラー時は終了しない）
fn confirm_quit<P: SavePrompt>(session: &EditSession, prompt: &mut P) -> bool {
    match try_confirm_quit(session, prompt) {
        Ok(quit) => quit,
        Err(e) => {
            println!("  ✗ {}", e);
            false
        }
    }
}

fn try_confirm_quit<P: SavePrompt>(session: &EditSession, prompt: &mut P) -> Result<bool> {
    if !session.is_dirty()? {
        return Ok(true);
    }
    let image = session.current_image().unwrap_or(Path::new(""));
    match prompt.confirm_unsaved(image)? {
        SaveDecision::Save => {
            session.save_current()?;
            println!("  ✔ 保存しました");
            Ok(true)
        }
        SaveDecision::Discard => Ok(true),
        SaveDecision::Cancel => Ok(false),
    }
}

/// ステータス行の未保存マーカー
fn dirty_marker(session: &EditSession) -> &'static str {
    match session.is_dirty() {
        Ok(true) => " *",
        Ok(false) => "",
        Err(e) => {
            let image = session.current_image().unwrap_or(Path::new(""));
            warn!(image = %image.display(), error = %e, "変更判定に失敗");
            " (変更判定エラー)"
        }
    }
}

fn print_status(session: &EditSession, images: &[ImageInfo], index: usize) {
    println!(
        "\n[{}/{}] {}{}",
        index + 1,
        images.len(),
        images[index].file_name,
        dirty_marker(session)
    );
    println!("  タグ: {}", session.tags());
    println!("  キャプション: {}", session.caption());

    if let Some(suggestion) = session.caption_suggestion() {
        println!("  キャプション候補: {}", suggestion);
    }
    if !session.recommendations().is_empty() {
        println!("  推薦:");
        for (i, rec) in session.recommendations().iter().enumerate() {
            println!("    {:>2}) {} ({:.2})", i + 1, rec.tag, rec.confidence);
        }
    }
}

fn print_help() {
    println!("---");
    println!("操作: [Enter/n]次 [p]前 [+タグ]追加 [-タグ]削除 [t テキスト]タグ置換 [c テキスト]キャプション");
    println!("      [r]推薦 [a N]推薦を付与 [A]全推薦を付与 [d]キャプション候補 [u]候補を採用 [w]保存 [q]終了");
    println!("---");
}
