//! # 错误类型模块
//!
//! 隐写核心返回的所有错误。命令行外壳通过 `anyhow` 在其上附加上下文。

/// 编码或解码过程中可能出现的错误。
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 图像容量不足以容纳给定文本，在修改任何像素之前检查。
    #[error("Image is too small for the given text. Required: {required}, Available: {available}")]
    InsufficientCapacity { required: usize, available: usize },

    /// 解码时发现哨兵或校验失败，图像很可能从未被编码或已损坏。
    #[error("Decoding failed: {0}. Make sure the image contains hidden text.")]
    CorruptOrUnencodedImage(String),

    /// 在读到声明长度之前已遍历完整幅图像。
    #[error("Image ended before the hidden text was complete. Expected: {expected}, Recovered: {recovered}")]
    TruncatedImage { expected: usize, recovered: usize },
}

/// 隐写核心使用的 `Result` 别名。
pub type Result<T> = std::result::Result<T, StegoError>;
