//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use std::path::Path;
use std::time::Duration;
use tag_sidecar::error::TagSidecarError;
use tag_sidecar::scanner;
use tag_sidecar::tagger::{parse_predictions, CommandCaptioner, CommandTagger};
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, TagSidecarError::FolderNotFound(_)));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_folder(dir.path());

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    // サイドカーのみ作成
    std::fs::write(dir.path().join("test.txt"), "solo").unwrap();
    std::fs::write(dir.path().join("test.caption"), "hello").unwrap();

    let result = scanner::scan_folder(dir.path());
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// TagSidecarErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        TagSidecarError::Config("テスト設定エラー".to_string()),
        TagSidecarError::FileNotFound("test.png".to_string()),
        TagSidecarError::FolderNotFound("/path/to/folder".to_string()),
        TagSidecarError::NoImagesFound("フォルダ".to_string()),
        TagSidecarError::NoActiveImage,
        TagSidecarError::TaggerUnavailable("exit 1".to_string()),
        TagSidecarError::TaggerParse("not json".to_string()),
        TagSidecarError::CaptionerUnavailable("timeout".to_string()),
        TagSidecarError::CliExecution("tty".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// タガー未設定エラーのメッセージ確認
#[test]
fn test_missing_tagger_message() {
    let err = CommandTagger::new(&[], 0.35, Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, TagSidecarError::MissingTaggerCommand));

    let display = format!("{}", err);
    assert!(display.contains("タガー"));
    assert!(display.contains("tag-sidecar config"));
}

#[test]
fn test_missing_captioner_message() {
    let err = CommandCaptioner::new(&[], Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, TagSidecarError::MissingCaptionerCommand));
    assert!(format!("{}", err).contains("--set-captioner"));
}

/// 書き込みエラーはパスを含む
#[test]
fn test_sidecar_write_display() {
    let err = TagSidecarError::SidecarWrite {
        path: "dir/a.txt".into(),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    let display = format!("{}", err);

    assert!(display.contains("a.txt"));
    assert!(display.contains("denied"));
    assert!(std::error::Error::source(&err).is_some());
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: TagSidecarError = io_err.into();

    assert!(matches!(err, TagSidecarError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: TagSidecarError = json_err.into();

    assert!(matches!(err, TagSidecarError::JsonParse(_)));
}

/// タガー出力が壊れている場合
#[test]
fn test_tagger_output_parse_error() {
    let err = parse_predictions("loading model...").unwrap_err();
    assert!(matches!(err, TagSidecarError::TaggerParse(_)));
}
