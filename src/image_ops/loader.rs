//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理源图片从磁盘到 `SourceImage` 的全过程，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! 1. 存在性 + metadata 体积限制
//! 2. 读取字节并通过文件签名（magic bytes）确认是图片
//! 3. 读取 header 尺寸，按像素上限快速拒绝
//! 4. 完整解码

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use image::{GenericImageView, ImageReader};

use super::source::{RawImageData, SourceImage};
use crate::config::LoaderLimits;
use crate::error::AssetError;

/// 从本地路径加载并解码源图片。
pub fn load_source_image(path: &Path, limits: &LoaderLimits) -> Result<SourceImage, AssetError> {
    let started = Instant::now();
    log::info!("📁 开始读取源图片 - 路径: {}", path.display());

    let raw = read_raw(path, limits)?;
    validate_image_signature(&raw.bytes)?;

    let (header_width, header_height) = inspect_dimensions_from_memory(&raw.bytes)?;
    validate_pixel_limits(limits, header_width, header_height)?;

    let image = image::load_from_memory(&raw.bytes)
        .map_err(|e| AssetError::Decode(format!("图片解码失败 {}：{}", raw.path.display(), e)))?;

    let (width, height) = image.dimensions();
    validate_pixel_limits(limits, width, height)?;

    log::info!(
        "✅ 源图片解码成功 - 尺寸: {}x{} 色彩: {:?} 耗时: {}ms",
        width,
        height,
        image.color(),
        started.elapsed().as_millis()
    );

    Ok(SourceImage::new(image, raw.path))
}

fn read_raw(path: &Path, limits: &LoaderLimits) -> Result<RawImageData, AssetError> {
    if !path.exists() {
        return Err(AssetError::FileSystem(format!("文件不存在：{}", path.display())));
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| AssetError::FileSystem(format!("无法读取文件信息：{}", e)))?;

    if metadata.len() > limits.max_file_size {
        return Err(AssetError::ResourceLimit(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            metadata.len() as f64 / 1024.0 / 1024.0,
            limits.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| AssetError::FileSystem(format!("无法读取图片文件：{}", e)))?;

    Ok(RawImageData {
        bytes,
        path: path.to_path_buf(),
    })
}

/// 通过文件签名（magic bytes）校验输入是否为图片。
fn validate_image_signature(bytes: &[u8]) -> Result<(), AssetError> {
    if bytes.is_empty() {
        return Err(AssetError::InvalidFormat("图片内容为空".to_string()));
    }

    let kind = infer::get(bytes)
        .ok_or_else(|| AssetError::InvalidFormat("无法识别图片类型".to_string()))?;

    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(AssetError::InvalidFormat(format!(
            "文件签名不是图片类型：{}",
            kind.mime_type()
        )));
    }

    Ok(())
}

/// 仅通过内存中的图片头信息读取宽高。
fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), AssetError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AssetError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

    reader
        .into_dimensions()
        .map_err(|e| AssetError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
}

/// 校验像素数量是否超过配置上限。
fn validate_pixel_limits(limits: &LoaderLimits, width: u32, height: u32) -> Result<(), AssetError> {
    if width == 0 || height == 0 {
        return Err(AssetError::InvalidFormat(format!(
            "图片尺寸非法：{}x{}",
            width, height
        )));
    }

    let pixels = u64::from(width) * u64::from(height);
    if pixels > limits.max_decoded_pixels {
        return Err(AssetError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, limits.max_decoded_pixels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, 128, 255])
        });
        let path = dir.join(name);
        DynamicImage::ImageRgba8(img)
            .save_with_format(&path, ImageFormat::Png)
            .expect("failed to write test image");
        path
    }

    #[test]
    fn loads_valid_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_png(dir.path(), "logo.png", 64, 32);

        let source = load_source_image(&path, &LoaderLimits::default()).expect("load failed");
        assert_eq!(source.dimensions(), (64, 32));
        assert!(source.has_alpha());
        assert!(!source.is_square());
        assert_eq!(source.path(), path.as_path());
    }

    #[test]
    fn missing_file_is_filesystem_error() {
        let result = load_source_image(Path::new("/nonexistent/logo.png"), &LoaderLimits::default());
        assert!(matches!(result, Err(AssetError::FileSystem(_))));
    }

    #[test]
    fn non_image_payload_is_rejected_by_signature() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"%PDF-1.7 not an image at all").expect("write");

        let result = load_source_image(&path, &LoaderLimits::default());
        assert!(matches!(result, Err(AssetError::InvalidFormat(_))));
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(
            validate_image_signature(&[]),
            Err(AssetError::InvalidFormat(_))
        ));
    }

    #[test]
    fn file_size_limit_is_enforced_before_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_png(dir.path(), "logo.png", 32, 32);
        let limits = LoaderLimits {
            max_file_size: 16,
            ..LoaderLimits::default()
        };

        assert!(matches!(
            load_source_image(&path, &limits),
            Err(AssetError::ResourceLimit(_))
        ));
    }

    #[test]
    fn pixel_limit_is_enforced_from_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_png(dir.path(), "logo.png", 100, 100);
        let limits = LoaderLimits {
            max_decoded_pixels: 9_999,
            ..LoaderLimits::default()
        };

        assert!(matches!(
            load_source_image(&path, &limits),
            Err(AssetError::ResourceLimit(_))
        ));
    }

    #[test]
    fn truncated_png_fails_to_decode() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_png(dir.path(), "logo.png", 64, 64);
        let bytes = std::fs::read(&path).expect("read");
        std::fs::write(&path, &bytes[..bytes.len() / 2]).expect("truncate");

        let result = load_source_image(&path, &LoaderLimits::default());
        assert!(matches!(
            result,
            Err(AssetError::Decode(_)) | Err(AssetError::InvalidFormat(_))
        ));
    }
}
