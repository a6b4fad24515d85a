use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tag_sidecar::{cli, config, editor, error, logging, scanner, session, sidecar, tagger};
use tag_sidecar::common::{filter_redundant, taxonomy, TagSet};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use session::EditSession;
use tagger::CommandTagger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Scan { folder, json } => {
            let images = scanner::scan_folder(&folder)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&images)?);
                return Ok(());
            }

            println!("📁 {} ({}枚)\n", folder.display(), images.len());
            for image in &images {
                let record = sidecar::load(&image.path)?;
                println!(
                    "  {} {} {:>3}タグ  {}",
                    if image.has_tags { "T" } else { "-" },
                    if image.has_caption { "C" } else { "-" },
                    record.tags.len(),
                    image.file_name
                );
            }
        }

        Commands::Show { image, json } => {
            require_file(&image)?;
            let record = sidecar::load(&image)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("タグ: {}", record.tags);
                println!("キャプション: {}", record.caption);
            }
        }

        Commands::Edit { image, add, remove, set, caption } => {
            require_file(&image)?;
            let mut session = EditSession::new();
            session.load_image(&image)?;

            if let Some(text) = set {
                session.edit_tags_from_text(&text);
            }
            for tag in &add {
                session.add_tag(tag);
            }
            for tag in &remove {
                session.remove_tag(tag);
            }
            if let Some(text) = caption {
                session.set_caption(&text);
            }

            if session.is_dirty()? {
                session.save_current()?;
                println!("✔ 保存しました: {}", image.display());
            } else {
                println!("変更はありません");
            }
            println!("タグ: {}", session.tags());
        }

        Commands::Recommend { path, threshold, apply } => {
            let mut tagger = CommandTagger::from_config(&config)?;
            if let Some(threshold) = threshold {
                config::validate_threshold(threshold)?;
                tagger = tagger.with_threshold(threshold);
            }

            if path.is_dir() {
                recommend_folder(&path, &tagger, apply).await?;
            } else {
                require_file(&path)?;
                recommend_image(&path, &tagger, apply).await?;
            }
        }

        Commands::Filter { tags, recommend } => {
            let applied = TagSet::from_text(&tags);
            let candidates: HashSet<String> = TagSet::from_text(&recommend)
                .iter()
                .map(String::from)
                .collect();

            let kept = filter_redundant(&applied, &candidates);
            // 入力順で表示
            let ordered: TagSet = TagSet::from_text(&recommend)
                .iter()
                .filter(|t| kept.contains(*t))
                .collect();
            println!("{}", ordered);
        }

        Commands::Categories => {
            for category in taxonomy().iter() {
                let mut members: Vec<&str> = category.members().iter().copied().collect();
                members.sort_unstable();
                println!("■ {} ({}件)", category.name(), members.len());
                if !category.overrides().is_empty() {
                    let mut overrides: Vec<&str> = category.overrides().iter().copied().collect();
                    overrides.sort_unstable();
                    println!("  オーバーライド: {}", overrides.join(", "));
                }
                if let Some(rule) = category.suppression() {
                    println!("  推薦に背景色があれば除外: {}", rule.suppressed);
                }
                println!("  {}\n", members.join(", "));
            }
        }

        Commands::Browse { folder } => {
            editor::run_browse(&folder, &config).await?;
        }

        Commands::Config { set_tagger, set_captioner, set_threshold, show } => {
            let mut config = config;

            if let Some(command) = set_tagger {
                config.set_tagger_command(&command)?;
                println!("✔ タガーコマンドを設定しました");
            }

            if let Some(command) = set_captioner {
                config.set_captioner_command(&command)?;
                println!("✔ キャプション生成コマンドを設定しました");
            }

            if let Some(threshold) = set_threshold {
                config.set_threshold(threshold)?;
                println!("✔ 閾値を設定しました");
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!("  タガー: {}", display_command(&config.tagger_command()));
                println!("  キャプション生成: {}", display_command(&config.captioner_command));
                println!("  閾値: {}", config.threshold);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(())
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(error::TagSidecarError::FileNotFound(path.display().to_string()))
    }
}

fn display_command(command: &[String]) -> String {
    if command.is_empty() {
        "未設定".to_string()
    } else {
        command.join(" ")
    }
}

async fn recommend_image(image: &Path, tagger: &CommandTagger, apply: bool) -> Result<()> {
    let mut session = EditSession::new();
    session.load_image(image)?;
    session.refresh_recommendations(tagger).await?;

    println!("タグ: {}", session.tags());
    if session.recommendations().is_empty() {
        println!("推薦はありません");
    } else {
        println!("推薦:");
        for rec in session.recommendations() {
            println!("  {:.2}  {}", rec.confidence, rec.tag);
        }
    }

    if apply {
        let applied = session.apply_all_recommendations();
        if applied > 0 {
            session.save_current()?;
        }
        println!("✔ {}件付与: {}", applied, session.tags());
    }
    Ok(())
}

async fn recommend_folder(folder: &Path, tagger: &CommandTagger, apply: bool) -> Result<()> {
    let images = scanner::scan_folder(folder)?;
    if images.is_empty() {
        return Err(error::TagSidecarError::NoImagesFound(folder.display().to_string()));
    }

    let progress = ProgressBar::new(images.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut failed: Vec<(PathBuf, String)> = Vec::new();
    let mut total_applied = 0;

    for image in &images {
        progress.set_message(image.file_name.clone());

        let mut session = EditSession::new();
        let result = async {
            session.load_image(&image.path)?;
            session.refresh_recommendations(tagger).await?;
            if apply {
                let applied = session.apply_all_recommendations();
                if applied > 0 {
                    session.save_current()?;
                }
                total_applied += applied;
            }
            Ok::<_, error::TagSidecarError>(())
        }
        .await;

        match result {
            Ok(()) if !apply => {
                let tags: Vec<&str> = session.recommendations().iter().map(|r| r.tag.as_str()).collect();
                progress.println(format!("{}: {}", image.file_name, tags.join(", ")));
            }
            Ok(()) => {}
            Err(e) => failed.push((image.path.clone(), e.to_string())),
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if apply {
        println!("✔ {}枚処理、{}件付与", images.len() - failed.len(), total_applied);
    }
    for (path, message) in &failed {
        println!("✗ {}: {}", path.display(), message);
    }
    Ok(())
}
