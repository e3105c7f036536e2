//! # OG 预览图合成模块
//!
//! ## 设计思路
//!
//! 生成社交平台分享链接时展示的 1200×630 品牌预览图：左侧 logo + 标题 + 标语，
//! 中间竖直分隔线，右侧四行带勾号的特性列表。
//!
//! - `layout`：版式常量与派生坐标（纯函数，可单独测试）
//! - `fonts`：TrueType 字体加载与内嵌字体回退
//! - `draw`：粗线、勾号、矩形
//! - `composer`：画布编排与落盘

mod composer;
mod draw;
mod fonts;
mod layout;

pub use composer::{OgComposer, generate_og_image};
pub use draw::{draw_thick_polyline, draw_thick_segment, fill_rect};
pub use fonts::{FontConfig, FontSet, TextFace};
pub use layout::{OgLayout, OgPalette, OgTexts, PixelRect, centered_offset, checkmark_points};
