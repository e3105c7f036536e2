//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“固定常量”集中到 `AssetConfig`：尺寸列表、画布尺寸、颜色、坐标、字体路径。
//! 生产默认值即原始资源规格，保持可审计；需要时再通过 JSON 文件或环境变量覆盖。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用配置，两个可执行文件零参数即可运行。
//! - `ResizeProfile` 负责档位字符串解析与反向输出，并映射到具体滤镜。
//! - `AssetConfig::load` 依次叠加：默认值 → `ASSETGEN_CONFIG` 指向的 JSON → 环境变量。
//! - `validate` 在任何文件写入前拒绝非法尺寸，避免产出一半资源后才失败。

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use serde::Deserialize;

use crate::error::AssetError;
use crate::og::{FontConfig, OgLayout, OgPalette, OgTexts};

/// JSON 覆盖文件路径的环境变量。
pub const ENV_CONFIG_FILE: &str = "ASSETGEN_CONFIG";
/// 源 logo 路径覆盖。
pub const ENV_BASE_LOGO: &str = "ASSETGEN_BASE_LOGO";
/// 输出（public）目录覆盖。
pub const ENV_PUBLIC_DIR: &str = "ASSETGEN_PUBLIC_DIR";
/// 缩放档位覆盖（quality / balanced / speed）。
pub const ENV_RESIZE_PROFILE: &str = "ASSETGEN_RESIZE_PROFILE";

/// RGB 颜色三元组，JSON 中写作 `[r, g, b]`。
pub type Rgb = [u8; 3];

/// 缩放质量档位。
///
/// - `Quality`：Lanczos3，图标默认使用
/// - `Balanced`：CatmullRom
/// - `Speed`：Triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeProfile {
    #[default]
    Quality,
    Balanced,
    Speed,
}

impl ResizeProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use pwa_assets::config::ResizeProfile;
    ///
    /// let p = ResizeProfile::from_str("Balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), pwa_assets::AssetError>(())
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(profile: &str) -> Result<Self, AssetError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(AssetError::Config(format!(
                "未知缩放档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串，用于日志。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }

    /// 档位对应的重采样滤镜。
    pub fn filter(self) -> FilterType {
        match self {
            Self::Quality => FilterType::Lanczos3,
            Self::Balanced => FilterType::CatmullRom,
            Self::Speed => FilterType::Triangle,
        }
    }
}

/// favicon 的落盘格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaviconFormat {
    /// 真正的多尺寸 ICO 容器。
    #[default]
    Ico,
    /// 旧行为：单张 PNG，仅文件名为 `.ico`。
    RenamedPng,
}

/// 输入/输出路径。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    /// 图标生成器使用的源 logo。
    pub base_logo: PathBuf,
    /// 所有产物写入的 public 目录。
    pub public_dir: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            base_logo: PathBuf::from("assets/logo_base.png"),
            public_dir: PathBuf::from("public"),
        }
    }
}

/// 源图片加载阶段的资源上限。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderLimits {
    /// 源文件允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
}

impl Default for LoaderLimits {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
        }
    }
}

/// 图标生成器配置。
///
/// `sizes` 需要与 Web Manifest 中声明的图标列表保持一致。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// `icons/pwa-{s}x{s}.png` 的尺寸列表。
    pub sizes: Vec<u32>,
    /// public 根目录下额外输出的 PWA 图标尺寸。
    pub root_sizes: Vec<u32>,
    pub apple_touch_size: u32,
    /// favicon 最大帧尺寸。
    pub favicon_size: u32,
    /// ICO 容器中除最大帧外的附加帧。
    pub favicon_extra_frames: Vec<u32>,
    pub favicon_format: FaviconFormat,
    pub og_width: u32,
    pub og_height: u32,
    /// 居中 OG 图中 logo 的边长。
    pub og_logo_size: u32,
    pub og_background: Rgb,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            sizes: vec![48, 72, 96, 128, 144, 152, 192, 256, 384, 512],
            root_sizes: vec![192, 512],
            apple_touch_size: 180,
            favicon_size: 48,
            favicon_extra_frames: vec![16, 32],
            favicon_format: FaviconFormat::Ico,
            og_width: 1200,
            og_height: 630,
            og_logo_size: 400,
            og_background: [0x00, 0x1c, 0x3e],
        }
    }
}

/// OG 合成器配置。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OgConfig {
    pub layout: OgLayout,
    pub palette: OgPalette,
    pub texts: OgTexts,
    pub fonts: FontConfig,
    pub files: OgFileNames,
}

/// OG 合成器读写的文件名（相对 public 目录）。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OgFileNames {
    pub logo: String,
    pub output: String,
}

impl Default for OgFileNames {
    fn default() -> Self {
        Self {
            logo: "pwa-512x512.png".to_string(),
            output: "og-image.png".to_string(),
        }
    }
}

/// 顶层配置。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub paths: AssetPaths,
    pub limits: LoaderLimits,
    pub resize_profile: ResizeProfile,
    pub icons: IconConfig,
    pub og: OgConfig,
}

impl AssetConfig {
    /// 从进程环境加载配置。
    pub fn load() -> Result<Self, AssetError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// 以自定义的变量查询函数加载配置，便于测试隔离进程环境。
    pub fn load_with<F>(lookup: F) -> Result<Self, AssetError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG_FILE).filter(|v| !v.trim().is_empty()) {
            Some(path) => Self::from_json_file(Path::new(&path))?,
            None => Self::default(),
        };

        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// 读取 JSON 覆盖文件；未出现的字段保持默认值。
    pub fn from_json_file(path: &Path) -> Result<Self, AssetError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AssetError::Config(format!("无法读取配置文件 {}：{}", path.display(), e))
        })?;

        let config = serde_json::from_str::<Self>(&content).map_err(|e| {
            AssetError::Config(format!("解析配置文件 {} 失败：{}", path.display(), e))
        })?;

        log::info!("⚙️ 已加载配置文件：{}", path.display());
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), AssetError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(logo) = lookup(ENV_BASE_LOGO).filter(|v| !v.is_empty()) {
            self.paths.base_logo = PathBuf::from(logo);
        }
        if let Some(dir) = lookup(ENV_PUBLIC_DIR).filter(|v| !v.is_empty()) {
            self.paths.public_dir = PathBuf::from(dir);
        }
        if let Some(profile) = lookup(ENV_RESIZE_PROFILE).filter(|v| !v.is_empty()) {
            self.resize_profile = ResizeProfile::from_str(&profile)?;
        }
        Ok(())
    }

    /// 在任何写入前校验配置。
    pub fn validate(&self) -> Result<(), AssetError> {
        let icons = &self.icons;

        if icons.sizes.is_empty() {
            return Err(AssetError::Config("图标尺寸列表不能为空".to_string()));
        }

        let all_sizes = icons
            .sizes
            .iter()
            .chain(&icons.root_sizes)
            .chain(&icons.favicon_extra_frames)
            .chain([&icons.apple_touch_size, &icons.favicon_size, &icons.og_logo_size]);
        if all_sizes.into_iter().any(|&s| s == 0) {
            return Err(AssetError::Config("图标尺寸必须大于 0".to_string()));
        }

        // ICO 目录项用一个字节存宽高，256 以 0 表示
        if icons.favicon_format == FaviconFormat::Ico
            && std::iter::once(&icons.favicon_size)
                .chain(&icons.favicon_extra_frames)
                .any(|&s| s > 256)
        {
            return Err(AssetError::Config("ICO 帧尺寸不能超过 256".to_string()));
        }

        if icons.og_logo_size > icons.og_width || icons.og_logo_size > icons.og_height {
            return Err(AssetError::Config(format!(
                "OG logo 尺寸 {} 超出画布 {}x{}",
                icons.og_logo_size, icons.og_width, icons.og_height
            )));
        }

        self.og.layout.validate()?;

        if self.og.files.output.trim().is_empty() {
            return Err(AssetError::Config("OG 输出文件名不能为空".to_string()));
        }

        Ok(())
    }

    /// 当前档位对应的重采样滤镜。
    pub fn resize_filter(&self) -> FilterType {
        self.resize_profile.filter()
    }

    /// OG 合成器读取的 logo 路径。
    pub fn og_logo_path(&self) -> PathBuf {
        self.paths.public_dir.join(&self.og.files.logo)
    }

    /// OG 合成器输出路径。
    pub fn og_output_path(&self) -> PathBuf {
        self.paths.public_dir.join(&self.og.files.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_manifest_icon_list() {
        let config = AssetConfig::default();
        assert_eq!(
            config.icons.sizes,
            vec![48, 72, 96, 128, 144, 152, 192, 256, 384, 512]
        );
        assert_eq!(config.icons.root_sizes, vec![192, 512]);
        assert_eq!(config.icons.apple_touch_size, 180);
        assert_eq!(config.icons.favicon_size, 48);
        assert_eq!((config.icons.og_width, config.icons.og_height), (1200, 630));
        assert_eq!(config.resize_filter(), FilterType::Lanczos3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn profile_parsing_is_case_insensitive() {
        assert_eq!(ResizeProfile::from_str(" SPEED ").unwrap(), ResizeProfile::Speed);
        assert_eq!(ResizeProfile::Balanced.filter(), FilterType::CatmullRom);
        assert!(matches!(
            ResizeProfile::from_str("ultra"),
            Err(AssetError::Config(_))
        ));
    }

    #[test]
    fn env_overrides_replace_paths_and_profile() {
        let config = AssetConfig::load_with(lookup_from(&[
            (ENV_BASE_LOGO, "/tmp/logo.png"),
            (ENV_PUBLIC_DIR, "/tmp/public"),
            (ENV_RESIZE_PROFILE, "speed"),
        ]))
        .expect("config should load");

        assert_eq!(config.paths.base_logo, PathBuf::from("/tmp/logo.png"));
        assert_eq!(config.og_output_path(), PathBuf::from("/tmp/public/og-image.png"));
        assert_eq!(config.og_logo_path(), PathBuf::from("/tmp/public/pwa-512x512.png"));
        assert_eq!(config.resize_profile, ResizeProfile::Speed);
    }

    #[test]
    fn invalid_profile_in_env_is_rejected() {
        let result = AssetConfig::load_with(lookup_from(&[(ENV_RESIZE_PROFILE, "fastest")]));
        assert!(matches!(result, Err(AssetError::Config(_))));
    }

    #[test]
    fn json_file_overrides_only_present_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{ "icons": {{ "sizes": [64, 128], "favicon_format": "renamed_png" }},
                 "og": {{ "texts": {{ "title": "Demo" }} }} }}"#
        )
        .expect("write config");

        let path = file.path().to_string_lossy().to_string();
        let config = AssetConfig::load_with(lookup_from(&[(ENV_CONFIG_FILE, path.as_str())]))
            .expect("config should load");

        assert_eq!(config.icons.sizes, vec![64, 128]);
        assert_eq!(config.icons.favicon_format, FaviconFormat::RenamedPng);
        assert_eq!(config.icons.apple_touch_size, 180);
        assert_eq!(config.og.texts.title, "Demo");
        assert_eq!(config.og.texts.tagline, OgTexts::default().tagline);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{ not json").expect("write config");

        let result = AssetConfig::from_json_file(file.path());
        assert!(matches!(result, Err(AssetError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_and_oversized_values() {
        let mut config = AssetConfig::default();
        config.icons.sizes.push(0);
        assert!(matches!(config.validate(), Err(AssetError::Config(_))));

        let mut config = AssetConfig::default();
        config.icons.og_logo_size = 700;
        assert!(matches!(config.validate(), Err(AssetError::Config(_))));

        let mut config = AssetConfig::default();
        config.icons.favicon_size = 512;
        assert!(matches!(config.validate(), Err(AssetError::Config(_))));

        config.icons.favicon_format = FaviconFormat::RenamedPng;
        assert!(config.validate().is_ok());
    }
}
