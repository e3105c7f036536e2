//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“磁盘上的文件”和“流水线中间结果”解耦：
//! - `RawImageData` 表示已读取但未解码的字节
//! - `SourceImage` 表示解码完成、可供缩放的只读图像

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};

/// 加载阶段输出：原始字节与来源路径。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源路径（用于日志与诊断）。
    pub(crate) path: PathBuf,
}

/// 解码后的源图像。
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    path: PathBuf,
}

impl SourceImage {
    pub fn new(image: DynamicImage, path: impl Into<PathBuf>) -> Self {
        Self {
            image,
            path: path.into(),
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// 是否带 alpha 通道；决定输出色彩模型以及 OG 粘贴是否使用蒙版。
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    pub fn is_square(&self) -> bool {
        let (width, height) = self.dimensions();
        width == height
    }
}
