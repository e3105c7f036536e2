//! # PWA 图标生成入口
//!
//! 从 `assets/logo_base.png`（或 `ASSETGEN_BASE_LOGO`）生成全部 PWA 图标、
//! Apple touch icon、favicon 与居中 OG 图，写入 `public/`（或 `ASSETGEN_PUBLIC_DIR`）。
//! 任何致命错误记录后以退出码 1 结束。

use pwa_assets::AssetError;
use pwa_assets::config::AssetConfig;
use pwa_assets::icons::generate_assets;

fn run() -> Result<(), AssetError> {
    let config = AssetConfig::load()?;
    log::info!(
        "🚀 开始生成图标：{} → {}（profile={}）",
        config.paths.base_logo.display(),
        config.paths.public_dir.display(),
        config.resize_profile.as_str()
    );

    let generated = generate_assets(&config)?;
    log::info!("✅ 图标生成完成，共 {} 个文件", generated.files.len());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("❌ 图标生成失败: {err}");
        std::process::exit(1);
    }
}
