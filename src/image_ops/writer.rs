//! # 落盘模块
//!
//! ## 设计思路
//!
//! 统一管理输出目录与文件编码。目录不存在时自动 `create_dir_all`，避免上层判断；
//! 所有写入都显式指定格式，不依赖扩展名推断（`favicon.ico` 可能是 PNG 也可能是 ICO）。
//!
//! ## 实现思路
//!
//! - PNG：`DynamicImage::save_with_format`。
//! - ICO：每一帧先缩放为 RGBA，再经 `ico` crate 编码后写入多尺寸容器。
//! - 编码失败映射为 `AssetError::Encode` 并带上路径；目录、文件创建失败直接以 `Io` 上抛，路径记录在日志中。

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use super::pipeline::resize_square;
use crate::error::AssetError;

/// 确保目录存在（递归创建，幂等）。
pub fn ensure_dir(path: &Path) -> Result<(), AssetError> {
    if path.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(path)
        .inspect_err(|e| log::error!("❌ 创建目录 '{}' 失败: {}", path.display(), e))?;
    log::debug!("📂 已创建目录：{}", path.display());
    Ok(())
}

/// 以 PNG 格式写入，忽略文件扩展名。
///
/// PNG 不支持浮点像素，`Rgb32F` / `Rgba32F` 先量化为 8 位。
pub fn save_png(image: &DynamicImage, path: &Path) -> Result<(), AssetError> {
    let quantized;
    let image = match image {
        DynamicImage::ImageRgb32F(_) => {
            quantized = DynamicImage::ImageRgb8(image.to_rgb8());
            &quantized
        }
        DynamicImage::ImageRgba32F(_) => {
            quantized = DynamicImage::ImageRgba8(image.to_rgba8());
            &quantized
        }
        _ => image,
    };

    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| AssetError::Encode(format!("写入 PNG {} 失败：{}", path.display(), e)))
}

/// 把 `sizes` 中每个尺寸缩放成一帧，写入多尺寸 ICO 容器。
///
/// 帧按尺寸升序排列并去重；尺寸上限 256（ICO 目录项的限制）。
pub fn save_ico(
    image: &DynamicImage,
    sizes: &[u32],
    filter: FilterType,
    path: &Path,
) -> Result<(), AssetError> {
    let mut frames: Vec<u32> = sizes.to_vec();
    frames.sort_unstable();
    frames.dedup();

    if frames.is_empty() {
        return Err(AssetError::Encode("ICO 至少需要一帧".to_string()));
    }
    if let Some(&too_big) = frames.iter().find(|&&s| s == 0 || s > 256) {
        return Err(AssetError::Encode(format!("ICO 帧尺寸非法：{}", too_big)));
    }

    let mut icon_dir = IconDir::new(ResourceType::Icon);
    for size in frames {
        let rgba = resize_square(image, size, filter).to_rgba8();
        let frame = IconImage::from_rgba_data(size, size, rgba.into_raw());
        let entry = IconDirEntry::encode(&frame)
            .map_err(|e| AssetError::Encode(format!("编码 {size}px ICO 帧失败：{}", e)))?;
        icon_dir.add_entry(entry);
    }

    let file = fs::File::create(path)
        .inspect_err(|e| log::error!("❌ 创建 {} 失败：{}", path.display(), e))?;
    let mut writer = BufWriter::new(file);
    icon_dir
        .write(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| AssetError::Encode(format!("写入 ICO {} 失败：{}", path.display(), e)))
}
