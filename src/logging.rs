//! ログ初期化
//!
//! ライブラリ側は `tracing` マクロで出力し、ここでsubscriberを設定する。
//! `RUST_LOG` が指定されていればそちらを優先する。

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // 二重初期化（テスト等）は無視する
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
