//! # 图片基础操作模块（image_ops）
//!
//! ## 设计思路
//!
//! 图标生成器与 OG 合成器共享的“加载 → 缩放 → 落盘”能力按职责拆分，
//! 两个生成器只做编排，不直接接触解码器与编码器细节。
//!
//! - `loader`：源文件存在性、体积、签名、像素上限校验与解码
//! - `pipeline`：精确尺寸重采样（fast_image_resize 优先，image 回退）
//! - `writer`：目录创建、PNG / ICO 编码写入
//! - `source`：中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! icons.rs / og::composer
//!    ├─ loader.rs（读取 + 校验 + 解码）
//!    ├─ pipeline.rs（缩放）
//!    └─ writer.rs（写 PNG / ICO）
//! ```

mod loader;
mod pipeline;
mod source;
mod writer;

pub use loader::load_source_image;
pub use pipeline::{resize_exact, resize_square};
pub use source::SourceImage;
pub use writer::{ensure_dir, save_ico, save_png};
