use crate::error::{Result, TagSidecarError};
use crate::tagger::DEFAULT_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// タガーコマンドを上書きする環境変数
pub const TAGGER_ENV: &str = "TAG_SIDECAR_TAGGER";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// タガーのプログラムと引数（画像パスは末尾に追加）
    pub tagger_command: Vec<String>,
    /// キャプション生成のプログラムと引数
    pub captioner_command: Vec<String>,
    /// 推薦の信頼度閾値
    pub threshold: f32,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tagger_command: Vec::new(),
            captioner_command: Vec::new(),
            threshold: DEFAULT_THRESHOLD,
            timeout_seconds: 120,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TagSidecarError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("tag-sidecar").join("config.json"))
    }

    /// タガーコマンドを取得（環境変数を優先）
    pub fn tagger_command(&self) -> Vec<String> {
        match std::env::var(TAGGER_ENV) {
            Ok(value) if !value.trim().is_empty() => split_command(&value),
            _ => self.tagger_command.clone(),
        }
    }

    pub fn set_tagger_command(&mut self, command: &str) -> Result<()> {
        self.tagger_command = split_command(command);
        self.save()
    }

    pub fn set_captioner_command(&mut self, command: &str) -> Result<()> {
        self.captioner_command = split_command(command);
        self.save()
    }

    pub fn set_threshold(&mut self, threshold: f32) -> Result<()> {
        validate_threshold(threshold)?;
        self.threshold = threshold;
        self.save()
    }
}

/// 閾値が 0.0-1.0 の範囲か検証
pub fn validate_threshold(threshold: f32) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(TagSidecarError::Config(format!(
            "閾値は0.0-1.0で指定してください: {}",
            threshold
        )))
    }
}

/// 空白区切りでコマンドを分割
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.tagger_command.is_empty());
        assert_eq!(config.threshold, 0.35);
        assert_eq!(config.timeout_seconds, 120);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"threshold": 0.5}"#).unwrap();
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.timeout_seconds, 120);
        assert!(config.captioner_command.is_empty());
    }

    #[test]
    fn test_split_command() {
        assert_eq!(
            split_command("  python  tagger.py --cpu "),
            vec!["python", "tagger.py", "--cpu"]
        );
        assert!(split_command("   ").is_empty());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(validate_threshold(-0.1).is_err());
        assert!(validate_threshold(1.5).is_err());
        assert!(validate_threshold(f32::NAN).is_err());
    }
}
