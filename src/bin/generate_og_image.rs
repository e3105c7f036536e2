//! # OG 预览图生成入口
//!
//! 读取 `public/pwa-512x512.png`（存在时），合成 1200×630 品牌预览图写入
//! `public/og-image.png`。系统字体缺失时使用内嵌字体继续生成。

use pwa_assets::AssetError;
use pwa_assets::config::AssetConfig;
use pwa_assets::og::generate_og_image;

fn run() -> Result<(), AssetError> {
    let config = AssetConfig::load()?;
    generate_og_image(&config)?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("❌ OG 图生成失败: {err}");
        std::process::exit(1);
    }
}
