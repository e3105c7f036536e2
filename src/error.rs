//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AssetError` 枚举，图标生成与 OG 合成两条链路共用，
//! 替代分散的 `.map_err(|e| e.to_string())`、`expect()` 等不一致模式。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `std::io::Error` 提供 `From` 转换，写出阶段的目录、文件创建直接 `?`。
//! - 字体加载失败 (`Font`) 是唯一会被上层吞掉并降级处理的分支。

/// 资源生成统一错误类型。
///
/// 两个可执行文件在 `main` 中统一记录该错误并以退出码 1 结束。
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// 输入文件缺失或无法读取、输出文件无法写入
    #[error("文件错误：{0}")]
    FileSystem(String),

    /// 图片解码失败
    #[error("解码错误：{0}")]
    Decode(String),

    /// 输入不是受支持的图片格式
    #[error("格式错误：{0}")]
    InvalidFormat(String),

    /// PNG / ICO 编码失败
    #[error("编码错误：{0}")]
    Encode(String),

    /// 文件体积或像素数超过上限
    #[error("资源限制：{0}")]
    ResourceLimit(String),

    /// 配置文件或环境变量非法
    #[error("配置错误：{0}")]
    Config(String),

    /// 字体文件缺失或解析失败
    #[error("字体错误：{0}")]
    Font(String),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn fails() -> Result<(), AssetError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"))?
        }

        let err = fails().unwrap_err();
        assert!(matches!(err, AssetError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn display_keeps_variant_prefix() {
        let message = AssetError::Font("NotoSans-Bold.ttf".to_string()).to_string();
        assert_eq!(message, "字体错误：NotoSans-Bold.ttf");
    }
}
