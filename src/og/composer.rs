//! # OG 合成编排
//!
//! ## 设计思路
//!
//! `OgComposer` 只负责按固定顺序修改画布，不做任何 I/O，便于在测试中直接检查像素；
//! `generate_og_image` 负责字体加载、logo 读取与最终落盘。
//!
//! 绘制顺序固定为：
//! 1. 背景填充
//! 2. logo（存在时）
//! 3. 标题、标语
//! 4. 竖直分隔线
//! 5. 特性列表（勾号 + 文字）
//!
//! ## 实现思路
//!
//! - 画布使用 RGBA 以便 alpha 混合粘贴 logo，落盘前压平为 RGB。
//! - logo 缺失不是错误，仅记录 debug 日志；logo 存在但损坏则按致命错误上抛。
//! - 记录 `fonts/logo/compose/write/total` 阶段耗时，便于诊断。

use std::path::PathBuf;
use std::time::Instant;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

use super::draw::{draw_thick_polyline, fill_rect};
use super::fonts::FontSet;
use crate::config::{AssetConfig, OgConfig, Rgb};
use crate::error::AssetError;
use crate::image_ops::{SourceImage, ensure_dir, load_source_image, resize_square, save_png};

/// 把配置中的 RGB 三元组转换为不透明像素。
pub(crate) fn opaque(color: Rgb) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}

/// OG 图合成器。
pub struct OgComposer<'a> {
    config: &'a OgConfig,
    fonts: &'a FontSet,
    filter: FilterType,
}

impl<'a> OgComposer<'a> {
    pub fn new(config: &'a OgConfig, fonts: &'a FontSet, filter: FilterType) -> Self {
        Self {
            config,
            fonts,
            filter,
        }
    }

    /// 合成完整画布；`logo` 为 `None` 时跳过 logo。
    pub fn compose(&self, logo: Option<&DynamicImage>) -> RgbaImage {
        let layout = &self.config.layout;
        let palette = &self.config.palette;

        let mut canvas = RgbaImage::from_pixel(
            layout.canvas_width,
            layout.canvas_height,
            opaque(palette.background),
        );

        if let Some(logo) = logo {
            self.paste_logo(&mut canvas, logo);
        }
        self.draw_headline(&mut canvas);
        fill_rect(&mut canvas, layout.separator_rect(), opaque(palette.separator));
        self.draw_features(&mut canvas);

        canvas
    }

    fn paste_logo(&self, canvas: &mut RgbaImage, logo: &DynamicImage) {
        let layout = &self.config.layout;
        let resized = resize_square(logo, layout.logo_size, self.filter).to_rgba8();
        imageops::overlay(
            canvas,
            &resized,
            i64::from(layout.logo_x),
            i64::from(layout.logo_y),
        );
    }

    fn draw_headline(&self, canvas: &mut RgbaImage) {
        let layout = &self.config.layout;
        let palette = &self.config.palette;
        let texts = &self.config.texts;

        let (x, y) = layout.title_origin();
        self.fonts
            .title
            .draw(canvas, opaque(palette.title), x, y, &texts.title);

        let (x, y) = layout.tagline_origin();
        self.fonts
            .subtitle
            .draw(canvas, opaque(palette.tagline), x, y, &texts.tagline);
    }

    fn draw_features(&self, canvas: &mut RgbaImage) {
        let layout = &self.config.layout;
        let palette = &self.config.palette;

        for (index, feature) in self.config.texts.features.iter().enumerate() {
            draw_thick_polyline(
                canvas,
                &layout.checkmark_points(index),
                layout.check_stroke,
                opaque(palette.checkmark),
            );

            let (x, y) = layout.feature_text_origin(index);
            self.fonts
                .feature
                .draw(canvas, opaque(palette.feature_text), x, y, feature);
        }
    }
}

/// 生成品牌 OG 图并写入 `public/og-image.png`，返回输出路径。
pub fn generate_og_image(config: &AssetConfig) -> Result<PathBuf, AssetError> {
    let started = Instant::now();

    let fonts = FontSet::load(&config.og.fonts)?;
    let fonts_ms = started.elapsed().as_millis();

    let logo_path = config.og_logo_path();
    let logo = if logo_path.is_file() {
        Some(load_source_image(&logo_path, &config.limits)?)
    } else {
        log::debug!("🖼️ 未找到 logo，跳过粘贴：{}", logo_path.display());
        None
    };
    let logo_ms = started.elapsed().as_millis();

    let canvas = OgComposer::new(&config.og, &fonts, config.resize_filter())
        .compose(logo.as_ref().map(SourceImage::image));
    let compose_ms = started.elapsed().as_millis();

    let output = config.og_output_path();
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let flattened = DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8());
    save_png(&flattened, &output)?;
    let total_ms = started.elapsed().as_millis();

    log::info!(
        "⏱️ OG 合成阶段耗时 - fonts: {}ms logo: {}ms compose: {}ms write: {}ms total: {}ms（回退字体: {}）",
        fonts_ms,
        logo_ms - fonts_ms,
        compose_ms - logo_ms,
        total_ms - compose_ms,
        total_ms,
        fonts.is_fallback()
    );
    log::info!("✅ 已生成 OG 图：{}", output.display());

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn composer_parts() -> (OgConfig, FontSet) {
        let config = OgConfig::default();
        let fonts = FontSet::embedded(&config.fonts).expect("embedded font");
        (config, fonts)
    }

    #[test]
    fn canvas_has_fixed_size_and_background() {
        let (config, fonts) = composer_parts();
        let canvas = OgComposer::new(&config, &fonts, FilterType::Lanczos3).compose(None);

        assert_eq!(canvas.dimensions(), (1200, 630));
        assert_eq!(*canvas.get_pixel(5, 5), opaque([15, 23, 42]));
        assert_eq!(*canvas.get_pixel(1195, 625), opaque([15, 23, 42]));
    }

    #[test]
    fn separator_is_drawn_at_fixed_x() {
        let (config, fonts) = composer_parts();
        let canvas = OgComposer::new(&config, &fonts, FilterType::Lanczos3).compose(None);

        let separator = opaque([51, 65, 85]);
        assert_eq!(*canvas.get_pixel(550, 60), separator);
        assert_eq!(*canvas.get_pixel(549, 300), separator);
        assert_eq!(*canvas.get_pixel(550, 570), separator);
        assert_ne!(*canvas.get_pixel(550, 59), separator);
        assert_ne!(*canvas.get_pixel(550, 571), separator);
    }

    #[test]
    fn checkmarks_use_emerald_for_every_row() {
        let (config, fonts) = composer_parts();
        let canvas = OgComposer::new(&config, &fonts, FilterType::Lanczos3).compose(None);

        let emerald = opaque([52, 211, 153]);
        for index in 0..config.texts.features.len() {
            let [_, (mx, my), _] = config.layout.checkmark_points(index);
            assert_eq!(
                *canvas.get_pixel(mx.round() as u32, my.round() as u32),
                emerald,
                "第 {index} 行勾号拐点未绘制"
            );
        }
    }

    #[test]
    fn logo_is_pasted_with_alpha() {
        let (config, fonts) = composer_parts();
        // 左半透明、右半不透明红色
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_fn(512, 512, |x, _| {
            if x < 256 {
                Rgba([255, 0, 0, 0])
            } else {
                Rgba([255, 0, 0, 255])
            }
        }));

        let canvas = OgComposer::new(&config, &fonts, FilterType::Lanczos3).compose(Some(&logo));

        // logo 区域 (60, 80)..(260, 280)
        assert_eq!(*canvas.get_pixel(80, 180), opaque([15, 23, 42]));
        assert_eq!(*canvas.get_pixel(240, 180), opaque([255, 0, 0]));
    }

    #[test]
    fn opaque_rgb_logo_is_copied_verbatim() {
        let (config, fonts) = composer_parts();
        let logo = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, image::Rgb([1, 2, 3])));

        let canvas = OgComposer::new(&config, &fonts, FilterType::Lanczos3).compose(Some(&logo));
        assert_eq!(*canvas.get_pixel(160, 180), opaque([1, 2, 3]));
        assert_eq!(*canvas.get_pixel(59, 180), opaque([15, 23, 42]));
    }

    #[test]
    fn headline_ink_stays_in_left_column_below_logo() {
        let (config, fonts) = composer_parts();
        let canvas = OgComposer::new(&config, &fonts, FilterType::Lanczos3).compose(None);

        let layout = &config.layout;
        let background = opaque(config.palette.background);
        let separator_left = layout.separator_rect().x as u32;
        let (_, title_y) = layout.title_origin();
        let (_, tagline_y) = layout.tagline_origin();

        let ink: Vec<(u32, u32)> = (0..separator_left)
            .flat_map(|x| (0..layout.canvas_height).map(move |y| (x, y)))
            .filter(|&(x, y)| *canvas.get_pixel(x, y) != background)
            .collect();
        assert!(!ink.is_empty());

        let min_x = ink.iter().map(|p| p.0).min().unwrap_or(0);
        let min_y = ink.iter().map(|p| p.1).min().unwrap_or(0);
        assert!(min_x >= layout.logo_x as u32, "ink starts at x={min_x}");
        assert!(min_y >= title_y as u32, "ink starts at y={min_y}");

        // 标题行内有纯白像素，且不越过标语起点
        let white = opaque(config.palette.title);
        let title_ink: Vec<u32> = ink
            .iter()
            .filter(|&&(x, y)| *canvas.get_pixel(x, y) == white)
            .map(|p| p.1)
            .collect();
        assert!(!title_ink.is_empty());
        assert!(title_ink.iter().all(|&y| y < tagline_y as u32));

        // 标语墨迹出现在标语起点之下
        assert!(ink.iter().any(|&(_, y)| y >= tagline_y as u32));
    }
}
