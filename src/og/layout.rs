//! # OG 版式几何
//!
//! ## 设计思路
//!
//! OG 图中唯一真正的“设计决策”就是版式坐标。这里把所有坐标、间距、颜色、文案
//! 都做成具名配置，并把派生位置（标题、标语、分隔线、每行特性）写成纯函数，
//! 使版式可以脱离画布单独测试。
//!
//! ## 实现思路
//!
//! - 坐标统一用 `i32`，与 `imageproc` 的绘制接口一致。
//! - 特性行纵坐标为等差数列 `features_y + index * line_height`，不做重叠检测。
//! - 勾号三点：左中 → 底部偏左 → 右上。

use serde::Deserialize;

use crate::config::Rgb;
use crate::error::AssetError;

/// 把边长为 `inner` 的内容放在 `outer` 中居中时的起点偏移。
///
/// 内容大于容器时返回负数，由粘贴逻辑负责裁剪。
pub fn centered_offset(outer: u32, inner: u32) -> i64 {
    (i64::from(outer) - i64::from(inner)) / 2
}

/// OG 合成图的版式常量。
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct OgLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub logo_size: u32,
    pub logo_x: i32,
    pub logo_y: i32,
    /// logo 底边到标题顶部的距离。
    pub title_gap: i32,
    /// 标题顶部到标语顶部的距离。
    pub tagline_gap: i32,
    pub separator_x: i32,
    pub separator_top: i32,
    pub separator_bottom: i32,
    pub separator_width: u32,
    pub features_x: i32,
    pub features_y: i32,
    pub line_height: i32,
    pub check_size: f32,
    /// 勾号相对文字行顶部的下移量，使其与 34px 文字大致居中。
    pub check_offset_y: i32,
    pub check_stroke: u32,
    /// 特性文字相对勾号起点的水平偏移。
    pub feature_text_offset: i32,
}

impl Default for OgLayout {
    fn default() -> Self {
        Self {
            canvas_width: 1200,
            canvas_height: 630,
            logo_size: 200,
            logo_x: 60,
            logo_y: 80,
            title_gap: 30,
            tagline_gap: 110,
            separator_x: 550,
            separator_top: 60,
            separator_bottom: 570,
            separator_width: 2,
            features_x: 600,
            features_y: 140,
            line_height: 80,
            check_size: 30.0,
            check_offset_y: 5,
            check_stroke: 5,
            feature_text_offset: 60,
        }
    }
}

/// 轴对齐的像素矩形（左上角 + 尺寸）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl OgLayout {
    /// 标题起点：紧贴 logo 底边下方。
    pub fn title_origin(&self) -> (i32, i32) {
        (self.logo_x, self.logo_bottom() + self.title_gap)
    }

    /// 标语起点：标题下方固定偏移。
    pub fn tagline_origin(&self) -> (i32, i32) {
        let (x, y) = self.title_origin();
        (x, y + self.tagline_gap)
    }

    pub fn logo_bottom(&self) -> i32 {
        self.logo_y + self.logo_size as i32
    }

    /// 第 `index` 行特性的顶部纵坐标。
    pub fn row_y(&self, index: usize) -> i32 {
        self.features_y + index as i32 * self.line_height
    }

    /// 第 `index` 行勾号包围盒的左上角。
    pub fn checkmark_origin(&self, index: usize) -> (i32, i32) {
        (self.features_x, self.row_y(index) + self.check_offset_y)
    }

    /// 第 `index` 行特性文字的起点。
    pub fn feature_text_origin(&self, index: usize) -> (i32, i32) {
        (self.features_x + self.feature_text_offset, self.row_y(index))
    }

    /// 第 `index` 行勾号折线的三个顶点。
    pub fn checkmark_points(&self, index: usize) -> [(f32, f32); 3] {
        let (x, y) = self.checkmark_origin(index);
        checkmark_points(x as f32, y as f32, self.check_size)
    }

    /// 竖直分隔线覆盖的像素区域，线宽以 `separator_x` 为中心展开。
    pub fn separator_rect(&self) -> PixelRect {
        let width = self.separator_width.max(1);
        PixelRect {
            x: self.separator_x - (width / 2) as i32,
            y: self.separator_top,
            width,
            height: (self.separator_bottom - self.separator_top + 1) as u32,
        }
    }

    pub fn validate(&self) -> Result<(), AssetError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(AssetError::Config("OG 画布尺寸必须大于 0".to_string()));
        }
        if self.logo_size == 0 || self.logo_size > self.canvas_width.min(self.canvas_height) {
            return Err(AssetError::Config(format!(
                "OG logo 尺寸 {} 非法（画布 {}x{}）",
                self.logo_size, self.canvas_width, self.canvas_height
            )));
        }
        if self.separator_bottom < self.separator_top {
            return Err(AssetError::Config("分隔线底端不能高于顶端".to_string()));
        }
        if self.line_height <= 0 {
            return Err(AssetError::Config("特性行高必须大于 0".to_string()));
        }
        if !(self.check_size.is_finite() && self.check_size > 0.0) || self.check_stroke == 0 {
            return Err(AssetError::Config("勾号尺寸与线宽必须大于 0".to_string()));
        }
        Ok(())
    }
}

/// 以 `(x, y)` 为左上角、边长 `size` 的勾号折线顶点。
///
/// 起点在左侧中部，拐点在底部 35% 处，终点在右上角。
pub fn checkmark_points(x: f32, y: f32, size: f32) -> [(f32, f32); 3] {
    [
        (x, y + size * 0.5),
        (x + size * 0.35, y + size),
        (x + size, y),
    ]
}

/// OG 图配色（Tailwind slate / emerald 色阶）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OgPalette {
    pub background: Rgb,
    pub title: Rgb,
    pub tagline: Rgb,
    pub separator: Rgb,
    pub checkmark: Rgb,
    pub feature_text: Rgb,
}

impl Default for OgPalette {
    fn default() -> Self {
        Self {
            background: [15, 23, 42],
            title: [255, 255, 255],
            tagline: [148, 163, 184],
            separator: [51, 65, 85],
            checkmark: [52, 211, 153],
            feature_text: [226, 232, 240],
        }
    }
}

/// OG 图文案。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OgTexts {
    pub title: String,
    pub tagline: String,
    pub features: Vec<String>,
}

impl Default for OgTexts {
    fn default() -> Self {
        Self {
            title: "i8·e10".to_string(),
            tagline: "Offline Expense Tracker".to_string(),
            features: vec![
                "Offline First".to_string(),
                "100% Private (Local DB)".to_string(),
                "Zero Ads / No Tracking".to_string(),
                "Expense & Debt Tracking".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_positions_follow_logo() {
        let layout = OgLayout::default();
        assert_eq!(layout.title_origin(), (60, 310));
        assert_eq!(layout.tagline_origin(), (60, 420));
    }

    #[test]
    fn rows_form_arithmetic_progression() {
        let layout = OgLayout::default();
        let rows: Vec<i32> = (0..4).map(|i| layout.row_y(i)).collect();
        assert_eq!(rows, vec![140, 220, 300, 380]);
        assert_eq!(layout.checkmark_origin(2), (600, 305));
        assert_eq!(layout.feature_text_origin(3), (660, 380));
    }

    #[test]
    fn checkmark_points_match_reference_shape() {
        let points = checkmark_points(600.0, 145.0, 30.0);
        assert_eq!(points[0], (600.0, 160.0));
        assert!((points[1].0 - 610.5).abs() < 1e-3);
        assert_eq!(points[1].1, 175.0);
        assert_eq!(points[2], (630.0, 145.0));
    }

    #[test]
    fn separator_spans_most_of_canvas() {
        let rect = OgLayout::default().separator_rect();
        assert_eq!(rect, PixelRect { x: 549, y: 60, width: 2, height: 511 });
    }

    #[test]
    fn centered_offset_matches_og_logo_slot() {
        assert_eq!(centered_offset(1200, 400), 400);
        assert_eq!(centered_offset(630, 400), 115);
        assert_eq!(centered_offset(100, 300), -100);
    }

    #[test]
    fn validate_rejects_degenerate_layouts() {
        assert!(OgLayout::default().validate().is_ok());

        let mut layout = OgLayout::default();
        layout.line_height = 0;
        assert!(layout.validate().is_err());

        let mut layout = OgLayout::default();
        layout.logo_size = 1000;
        assert!(layout.validate().is_err());

        let mut layout = OgLayout::default();
        layout.check_size = f32::NAN;
        assert!(layout.validate().is_err());
    }

    #[test]
    fn default_texts_have_four_features() {
        let texts = OgTexts::default();
        assert_eq!(texts.features.len(), 4);
        assert_eq!(texts.title, "i8·e10");
    }
}
