use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagSidecarError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("タガーコマンドが設定されていません。`tag-sidecar config --set-tagger \"COMMAND\"` で設定してください")]
    MissingTaggerCommand,

    #[error("キャプション生成コマンドが設定されていません。`tag-sidecar config --set-captioner \"COMMAND\"` で設定してください")]
    MissingCaptionerCommand,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像が読み込まれていません")]
    NoActiveImage,

    #[error("サイドカー書き込みエラー ({}): {source}", .path.display())]
    SidecarWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("タガー実行エラー: {0}")]
    TaggerUnavailable(String),

    #[error("タガー出力のパースに失敗: {0}")]
    TaggerParse(String),

    #[error("キャプション生成エラー: {0}")]
    CaptionerUnavailable(String),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TagSidecarError>;
