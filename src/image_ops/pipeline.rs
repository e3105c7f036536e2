//! # 缩放流水线模块
//!
//! ## 设计思路
//!
//! 所有资源都由“源图 → 精确尺寸”的缩放得到，这里集中管理重采样。
//! 优先走 `fast_image_resize` 的 SIMD 卷积，失败时回退 `image::resize_exact`，
//! 保证缩放本身永不成为致命错误。
//!
//! ## 实现思路
//!
//! 1. 目标缓冲按源图的 `ColorType` 创建（L8 / LA8 / RGB / RGBA 及其 16 位、浮点版本）
//! 2. 借助 fast_image_resize 的 `image` 特性直接在 `DynamicImage` 上卷积，
//!    alpha 预乘与反预乘由库内部处理
//! 3. 输出与源图色彩模型、位深保持一致

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::error::AssetError;

/// 将图像缩放到精确的 `width x height`（不保持宽高比），色彩模型与源图一致。
pub fn resize_exact(
    image: &DynamicImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> DynamicImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }

    match resize_with_fast_image_resize(image, width, height, filter) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!(
                "⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}",
                err
            );
            image.resize_exact(width, height, filter)
        }
    }
}

/// 缩放为 `size x size` 的正方形；非正方形源图会被拉伸。
pub fn resize_square(image: &DynamicImage, size: u32, filter: FilterType) -> DynamicImage {
    resize_exact(image, size, size, filter)
}

fn resize_with_fast_image_resize(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<DynamicImage, AssetError> {
    let mut resized = DynamicImage::new(target_width, target_height, image.color());

    let mut resizer = fr::Resizer::new();
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    resizer
        .resize(image, &mut resized, Some(&options))
        .map_err(|e| AssetError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

    Ok(resized)
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}
