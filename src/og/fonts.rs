//! # 字体加载模块
//!
//! ## 设计思路
//!
//! OG 图需要三种字面：粗体标题、细体副标题、细体特性文字。
//! 任一系统字体文件缺失或无法解析时，三者整体切换到编译进二进制的 DejaVu Sans 并打印警告，
//! 这是整个生成流程中唯一被“吞掉”的错误。
//!
//! ## 实现思路
//!
//! - 字号按 em 像素理解，通过 `units_per_em` 换算成 `ab_glyph` 的 `PxScale`。
//! - 同一字体文件只读取一次，`FontArc` 在多个字面之间共享。
//! - 回退字体与系统字体走同一条 TrueType 绘制路径，字号配置不变。

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use serde::Deserialize;

use crate::error::AssetError;

/// 回退字体（DejaVu Sans，许可见 `assets/fonts/LICENSE-DejaVu.txt`）。
const EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// 字体路径与字号。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub bold_path: PathBuf,
    pub light_path: PathBuf,
    /// 标题 em 字号（像素）。
    pub title_size: f32,
    pub subtitle_size: f32,
    pub feature_size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            bold_path: PathBuf::from("/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf"),
            light_path: PathBuf::from("/usr/share/fonts/truetype/noto/NotoSans-Light.ttf"),
            title_size: 80.0,
            subtitle_size: 38.0,
            feature_size: 34.0,
        }
    }
}

/// 字体 + 字号。
#[derive(Clone)]
pub struct TextFace {
    font: FontArc,
    scale: PxScale,
}

impl std::fmt::Debug for TextFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextFace")
            .field("scale_x", &self.scale.x)
            .field("scale_y", &self.scale.y)
            .finish()
    }
}

impl TextFace {
    /// 以 em 像素字号创建字面。
    pub fn new(font: FontArc, em_px: f32) -> Self {
        let scale = em_scale(&font, em_px);
        Self { font, scale }
    }

    pub fn scale(&self) -> PxScale {
        self.scale
    }

    /// 以 `(x, y)` 为文本左上角（上伸部顶线）绘制。
    pub fn draw(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }

    /// 文本包围盒 `(宽, 高)`。
    pub fn measure(&self, text: &str) -> (u32, u32) {
        text_size(self.scale, &self.font, text)
    }
}

/// OG 图使用的三种字面。
#[derive(Debug, Clone)]
pub struct FontSet {
    pub title: TextFace,
    pub subtitle: TextFace,
    pub feature: TextFace,
    fallback: bool,
}

impl FontSet {
    /// 加载系统字体，失败时回退到内嵌字体。
    ///
    /// 只有内嵌字体本身无法解析时才返回错误。
    pub fn load(config: &FontConfig) -> Result<Self, AssetError> {
        match Self::try_load(config) {
            Ok(fonts) => {
                log::info!(
                    "🔤 字体加载成功 - 粗体: {} 细体: {}",
                    config.bold_path.display(),
                    config.light_path.display()
                );
                Ok(fonts)
            }
            Err(err) => {
                log::warn!("⚠️ 字体加载失败，改用内嵌 DejaVu Sans：{}", err);
                Self::embedded(config)
            }
        }
    }

    /// 严格加载系统字体，任一失败即返回错误。
    pub fn try_load(config: &FontConfig) -> Result<Self, AssetError> {
        let bold = load_font_file(&config.bold_path)?;
        let light = load_font_file(&config.light_path)?;
        Ok(Self::from_fonts(bold, light, config, false))
    }

    /// 三种字面全部使用内嵌字体，字号沿用配置。
    pub fn embedded(config: &FontConfig) -> Result<Self, AssetError> {
        let font = FontArc::try_from_slice(EMBEDDED_FONT)
            .map_err(|e| AssetError::Font(format!("内嵌字体解析失败：{}", e)))?;
        Ok(Self::from_fonts(font.clone(), font, config, true))
    }

    fn from_fonts(bold: FontArc, light: FontArc, config: &FontConfig, fallback: bool) -> Self {
        Self {
            title: TextFace::new(bold, config.title_size),
            subtitle: TextFace::new(light.clone(), config.subtitle_size),
            feature: TextFace::new(light, config.feature_size),
            fallback,
        }
    }

    /// 是否处于回退状态。
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

fn load_font_file(path: &Path) -> Result<FontArc, AssetError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AssetError::Font(format!("无法读取字体 {}：{}", path.display(), e)))?;

    FontArc::try_from_vec(bytes)
        .map_err(|e| AssetError::Font(format!("无法解析字体 {}：{}", path.display(), e)))
}

/// 把 em 像素字号换算为 `PxScale`（`ab_glyph` 以“上伸部到下伸部”的高度计量）。
fn em_scale(font: &FontArc, em_px: f32) -> PxScale {
    match font.units_per_em() {
        Some(units_per_em) if units_per_em > 0.0 => {
            PxScale::from(em_px * font.height_unscaled() / units_per_em)
        }
        _ => PxScale::from(em_px),
    }
}
