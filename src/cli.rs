use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tag-sidecar")]
#[command(about = "画像タグ・キャプションのサイドカー編集ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// フォルダ内の画像とサイドカーの状態を一覧
    Scan {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 画像のタグとキャプションを表示
    Show {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// タグ・キャプションを編集して保存
    Edit {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 追加するタグ（複数指定可）
        #[arg(short, long)]
        add: Vec<String>,

        /// 削除するタグ（複数指定可）
        #[arg(short, long)]
        remove: Vec<String>,

        /// タグをカンマ区切りテキストで置き換え
        #[arg(long)]
        set: Option<String>,

        /// キャプションを設定
        #[arg(short, long)]
        caption: Option<String>,
    },

    /// タガーで推薦タグを取得（画像またはフォルダ）
    Recommend {
        /// 画像ファイルまたはフォルダのパス
        #[arg(required = true)]
        path: PathBuf,

        /// 信頼度閾値（省略時は設定値）
        #[arg(short, long)]
        threshold: Option<f32>,

        /// 推薦を付与して保存
        #[arg(long)]
        apply: bool,
    },

    /// 付与済みタグで推薦を絞り込む（タガーなし）
    Filter {
        /// 付与済みタグ（カンマ区切り）
        #[arg(short, long, default_value = "")]
        tags: String,

        /// 推薦タグ（カンマ区切り）
        #[arg(short, long, required = true)]
        recommend: String,
    },

    /// 組み込みのタグカテゴリを表示
    Categories,

    /// フォルダを対話的に閲覧・編集
    Browse {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// タガーコマンドを設定（画像パスは末尾に追加される）
        #[arg(long)]
        set_tagger: Option<String>,

        /// キャプション生成コマンドを設定
        #[arg(long)]
        set_captioner: Option<String>,

        /// 信頼度閾値を設定
        #[arg(long)]
        set_threshold: Option<f32>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
