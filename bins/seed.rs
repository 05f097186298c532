use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use service::{seeder, storage::JsonFileStore};

/// Write the default question banks into the configured storage file.
#[derive(Debug, Parser)]
#[command(name = "seed", version)]
struct Args {
    /// Storage file to write (overrides storage.path and STORAGE_PATH)
    #[arg(long)]
    storage: Option<String>,
}

fn init_logging() {
    // 提前加载 .env，使得 RUST_LOG / STORAGE_PATH 等环境变量生效
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
}

// 单线程运行时：两次写入严格按顺序执行；写入失败直接返回错误，不做重试
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging();

    let mut cfg = configs::AppConfig::load_and_validate()?;
    if let Some(path) = args.storage {
        cfg.override_storage_path(path)?;
    }

    let store = JsonFileStore::open_with_quota(&cfg.storage.path, cfg.storage.quota_bytes).await?;
    info!(service = "seed", path = %store.path().display(), "storage opened");
    seeder::seed(store.as_ref()).await?;
    Ok(())
}
