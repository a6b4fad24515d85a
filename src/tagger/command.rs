//! 外部コマンドによるタガー
//!
//! 設定されたコマンドに画像パスを付けて実行し、標準出力の
//! `{"tag": score}` JSONを読み取る。

use super::postprocess::{parse_predictions, postprocess_tags};
use super::Tagger;
use crate::config::Config;
use crate::error::{Result, TagSidecarError};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct CommandTagger {
    program: String,
    args: Vec<String>,
    threshold: f32,
    timeout: Duration,
}

impl CommandTagger {
    /// `command` はプログラムと引数（画像パスは末尾に追加される）
    pub fn new(command: &[String], threshold: f32, timeout: Duration) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or(TagSidecarError::MissingTaggerCommand)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            threshold,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.tagger_command(),
            config.threshold,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

impl Tagger for CommandTagger {
    async fn tag_image(
        &self,
        image: &Path,
        exclude: &HashSet<String>,
    ) -> Result<HashMap<String, f32>> {
        let output = run_command(
            &self.program,
            &self.args,
            image,
            self.timeout,
            TagSidecarError::TaggerUnavailable,
        )
        .await?;

        let raw = parse_predictions(&output)?;
        let tags = postprocess_tags(&raw, self.threshold, exclude);
        info!(
            image = %image.display(),
            raw = raw.len(),
            kept = tags.len(),
            "タガー実行完了"
        );
        Ok(tags)
    }
}

/// コマンドを実行して標準出力を返す
///
/// 起動失敗・異常終了・タイムアウトは `on_error` で変換したエラーになる。
pub(crate) async fn run_command(
    program: &str,
    args: &[String],
    image: &Path,
    timeout: Duration,
    on_error: fn(String) -> TagSidecarError,
) -> Result<String> {
    debug!(program, ?args, image = %image.display(), "外部コマンド実行");

    let child = Command::new(program)
        .args(args)
        .arg(image)
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(timeout, child)
        .await
        .map_err(|_| on_error(format!("{}がタイムアウトしました ({}秒)", program, timeout.as_secs())))?
        .map_err(|e| on_error(format!("{}の起動に失敗: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(on_error(format!(
            "{}が異常終了 (code {:?}): {}",
            program,
            output.status.code(),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_program() {
        let result = CommandTagger::new(&[], 0.35, Duration::from_secs(1));
        assert!(matches!(result, Err(TagSidecarError::MissingTaggerCommand)));
    }

    #[test]
    fn test_new_splits_program_and_args() {
        let command = vec!["python".to_string(), "tagger.py".to_string()];
        let tagger = CommandTagger::new(&command, 0.5, Duration::from_secs(1)).unwrap();
        assert_eq!(tagger.program, "python");
        assert_eq!(tagger.args, vec!["tagger.py".to_string()]);
        assert_eq!(tagger.threshold(), 0.5);
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let command = vec!["tag-sidecar-no-such-program-xyz".to_string()];
        let tagger = CommandTagger::new(&command, 0.35, Duration::from_secs(5)).unwrap();
        let result = tagger.tag_image(Path::new("img.png"), &HashSet::new()).await;
        assert!(matches!(result, Err(TagSidecarError::TaggerUnavailable(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_echo_tagger_output() {
        // sh -c '<script>' <$0=image>
        let command = vec![
            "sh".to_string(),
            "-c".to_string(),
            r#"echo '{"blue_hair": 0.9, "solo": 0.8, "hat": 0.1}'"#.to_string(),
        ];
        let tagger = CommandTagger::new(&command, 0.35, Duration::from_secs(5)).unwrap();
        let exclude: HashSet<String> = ["solo".to_string()].into_iter().collect();
        let result = tagger.tag_image(Path::new("img.png"), &exclude).await.unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.contains_key("blue hair"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command() {
        let command = vec!["sh".to_string(), "-c".to_string(), "exit 3".to_string()];
        let tagger = CommandTagger::new(&command, 0.35, Duration::from_secs(5)).unwrap();
        let result = tagger.tag_image(Path::new("img.png"), &HashSet::new()).await;
        assert!(matches!(result, Err(TagSidecarError::TaggerUnavailable(_))));
    }
}
