//! # 图标生成编排模块
//!
//! ## 设计思路
//!
//! `IconGenerator` 只负责流程编排，不直接接触解码器与编码器。处理链路固定为：
//! 1. 创建输出目录（`public/` 与 `public/icons/`）
//! 2. 加载并校验源 logo
//! 3. 按尺寸列表输出 `icons/pwa-{s}x{s}.png`
//! 4. 输出根目录 PWA 图标、Apple touch icon、favicon
//! 5. 输出居中 logo 的简易 OG 图
//!
//! ## 实现思路
//!
//! - 同一尺寸只缩放一次（192 / 512 / 48 会被多个产物复用）。
//! - 放大或非正方形源图不会中断流程，只打印警告。
//! - 记录 `load/resize+write/total` 阶段耗时，便于性能诊断。
//! - `manifest_icons` 输出与 Web Manifest 同结构的条目，便于核对尺寸列表是否一致。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use serde::Serialize;

use crate::config::{AssetConfig, FaviconFormat, IconConfig, LoaderLimits};
use crate::error::AssetError;
use crate::image_ops::{SourceImage, ensure_dir, load_source_image, resize_square, save_ico, save_png};
use crate::og::centered_offset;

/// 尺寸图标所在的子目录。
pub const ICONS_DIR: &str = "icons";
pub const APPLE_TOUCH_ICON: &str = "apple-touch-icon.png";
pub const FAVICON: &str = "favicon.ico";
pub const OG_IMAGE: &str = "og-image.png";

/// `pwa-{size}x{size}.png`
pub fn pwa_icon_file_name(size: u32) -> String {
    format!("pwa-{size}x{size}.png")
}

/// Web Manifest 中的一条图标声明。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// 与尺寸列表一一对应的 Manifest 图标条目。
pub fn manifest_icons(config: &IconConfig) -> Vec<ManifestIcon> {
    config
        .sizes
        .iter()
        .map(|&size| ManifestIcon {
            src: format!("{ICONS_DIR}/{}", pwa_icon_file_name(size)),
            sizes: format!("{size}x{size}"),
            mime_type: "image/png".to_string(),
        })
        .collect()
}

/// 一次生成的全部产物路径（按写入顺序）。
#[derive(Debug, Clone, Default)]
pub struct GeneratedAssets {
    pub files: Vec<PathBuf>,
}

impl GeneratedAssets {
    /// 记录一个已写入的文件，每个产物一行日志。
    fn record(&mut self, path: PathBuf) {
        log::info!("🧩 已生成 {}", path.display());
        self.files.push(path);
    }
}

/// 图标生成器。
pub struct IconGenerator<'a> {
    config: &'a IconConfig,
    filter: FilterType,
}

impl<'a> IconGenerator<'a> {
    pub fn new(config: &'a IconConfig, filter: FilterType) -> Self {
        Self { config, filter }
    }

    /// 基于已加载的源图生成全部产物；`output_dir` 及 `icons/` 子目录需已存在。
    pub fn generate(
        &self,
        source: &SourceImage,
        output_dir: &Path,
    ) -> Result<GeneratedAssets, AssetError> {
        self.warn_on_lossy_source(source);

        let mut cache = ResizeCache::new(source.image(), self.filter);
        let mut generated = GeneratedAssets::default();
        let icons_dir = output_dir.join(ICONS_DIR);

        for &size in &self.config.sizes {
            let path = icons_dir.join(pwa_icon_file_name(size));
            save_png(cache.square(size), &path)?;
            generated.record(path);
        }

        for &size in &self.config.root_sizes {
            let path = output_dir.join(pwa_icon_file_name(size));
            save_png(cache.square(size), &path)?;
            generated.record(path);
        }

        let apple = output_dir.join(APPLE_TOUCH_ICON);
        save_png(cache.square(self.config.apple_touch_size), &apple)?;
        generated.record(apple);

        let favicon = output_dir.join(FAVICON);
        self.write_favicon(source.image(), &mut cache, &favicon)?;
        generated.record(favicon);

        let og = output_dir.join(OG_IMAGE);
        let og_image = self.render_centered_og(cache.square(self.config.og_logo_size));
        save_png(&og_image, &og)?;
        generated.record(og);

        Ok(generated)
    }

    /// 背景纯色、logo 居中的 OG 图；logo 带 alpha 时按 alpha 混合，否则直接覆盖。
    pub fn render_centered_og(&self, logo: &DynamicImage) -> DynamicImage {
        let [r, g, b] = self.config.og_background;
        let mut canvas = RgbaImage::from_pixel(
            self.config.og_width,
            self.config.og_height,
            image::Rgba([r, g, b, 255]),
        );

        let x = centered_offset(self.config.og_width, logo.width());
        let y = centered_offset(self.config.og_height, logo.height());
        imageops::overlay(&mut canvas, &logo.to_rgba8(), x, y);

        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
    }

    fn write_favicon(
        &self,
        source: &DynamicImage,
        cache: &mut ResizeCache<'_>,
        path: &Path,
    ) -> Result<(), AssetError> {
        match self.config.favicon_format {
            FaviconFormat::Ico => {
                let frames: Vec<u32> = self
                    .config
                    .favicon_extra_frames
                    .iter()
                    .copied()
                    .filter(|&s| s < self.config.favicon_size)
                    .chain(std::iter::once(self.config.favicon_size))
                    .collect();
                save_ico(source, &frames, self.filter, path)
            }
            FaviconFormat::RenamedPng => save_png(cache.square(self.config.favicon_size), path),
        }
    }

    fn warn_on_lossy_source(&self, source: &SourceImage) {
        let (width, height) = source.dimensions();

        if !source.is_square() {
            log::warn!(
                "⚠️ 源图不是正方形（{}x{}），输出图标会被拉伸",
                width,
                height
            );
        }

        let largest = self
            .config
            .sizes
            .iter()
            .chain(&self.config.root_sizes)
            .chain([&self.config.apple_touch_size, &self.config.og_logo_size])
            .copied()
            .max()
            .unwrap_or(0);
        if largest > width.min(height) {
            log::warn!(
                "⚠️ 源图 {}x{} 小于最大目标尺寸 {}，部分图标将被放大",
                width,
                height,
                largest
            );
        }
    }
}

/// 按尺寸缓存缩放结果，同一尺寸只重采样一次。
struct ResizeCache<'a> {
    source: &'a DynamicImage,
    filter: FilterType,
    resized: HashMap<u32, DynamicImage>,
}

impl<'a> ResizeCache<'a> {
    fn new(source: &'a DynamicImage, filter: FilterType) -> Self {
        Self {
            source,
            filter,
            resized: HashMap::new(),
        }
    }

    fn square(&mut self, size: u32) -> &DynamicImage {
        let (source, filter) = (self.source, self.filter);
        self.resized
            .entry(size)
            .or_insert_with(|| resize_square(source, size, filter))
    }
}

/// 图标生成器入口：创建目录、加载源图并写出全部产物。
pub fn generate_assets(config: &AssetConfig) -> Result<GeneratedAssets, AssetError> {
    generate_assets_from(
        &config.paths.base_logo,
        &config.paths.public_dir,
        &config.icons,
        &config.limits,
        config.resize_filter(),
    )
}

/// 以显式参数运行图标生成器。
pub fn generate_assets_from(
    source_path: &Path,
    output_dir: &Path,
    icons: &IconConfig,
    limits: &LoaderLimits,
    filter: FilterType,
) -> Result<GeneratedAssets, AssetError> {
    let started = Instant::now();

    ensure_dir(output_dir)?;
    ensure_dir(&output_dir.join(ICONS_DIR))?;

    let source = load_source_image(source_path, limits)?;
    let load_ms = started.elapsed().as_millis();

    let generated = IconGenerator::new(icons, filter).generate(&source, output_dir)?;
    let total_ms = started.elapsed().as_millis();

    log::info!(
        "⏱️ 图标生成阶段耗时 - load: {}ms resize+write: {}ms total: {}ms（filter={:?}，共 {} 个文件）",
        load_ms,
        total_ms - load_ms,
        total_ms,
        filter,
        generated.files.len()
    );

    match serde_json::to_string(&manifest_icons(icons)) {
        Ok(json) => log::debug!("📋 对应 manifest icons：{}", json),
        Err(err) => log::debug!("📋 manifest icons 序列化失败：{}", err),
    }

    Ok(generated)
}
