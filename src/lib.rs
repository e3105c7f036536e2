//! # PWA 静态资源生成器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  src/bin/generate_assets      src/bin/generate_og_image  │
//! │       │  (env_logger 初始化 + 退出码)        │           │
//! └───────┼──────────────────────────────────────┼───────────┘
//!         ↓                                      ↓
//! ┌───────┼──────────────────────────────────────┼───────────┐
//! │  icons::generate_assets            og::generate_og_image │
//! │       │   (互不调用)                         │           │
//! │       ├──────────────┬───────────────────────┤           │
//! │       ↓              ↓                       ↓           │
//! │  config (AssetConfig)   image_ops (加载·缩放·写出)        │
//! │                                                          │
//! │  error ───── AssetError (统一错误类型)                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AssetError` |
//! | [`config`] | 路径、尺寸、版式、配色等全部常量的配置化，JSON / 环境变量覆盖 |
//! | [`image_ops`] | 源图加载校验、重采样、PNG / ICO 写出 |
//! | [`icons`] | PWA 图标集、Apple touch icon、favicon、居中 OG 图 |
//! | [`og`] | 品牌 OG 预览图合成（logo、标题、分隔线、特性列表） |

pub mod config;
pub mod error;
pub mod icons;
pub mod image_ops;
pub mod og;

pub use error::AssetError;
