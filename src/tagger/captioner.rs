//! キャプション候補の生成
//!
//! 画像説明モデルも外部コマンドとして扱い、標準出力をキャプション候補とする。

use super::command::run_command;
use crate::config::Config;
use crate::error::{Result, TagSidecarError};
use crate::sidecar::normalize_text;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// キャプション候補の提供元
pub trait Captioner {
    fn describe_image(&self, image: &Path) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Clone)]
pub struct CommandCaptioner {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandCaptioner {
    pub fn new(command: &[String], timeout: Duration) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or(TagSidecarError::MissingCaptionerCommand)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.captioner_command,
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

impl Captioner for CommandCaptioner {
    async fn describe_image(&self, image: &Path) -> Result<String> {
        let output = run_command(
            &self.program,
            &self.args,
            image,
            self.timeout,
            TagSidecarError::CaptionerUnavailable,
        )
        .await?;
        Ok(normalize_text(&output))
    }
}
