//! # 隐写算法模块
//!
//! [`Algorithm`] 是两种算法的封闭集合，统一提供 `encode` / `decode` / `capacity`。
//! 调用方通过 [`REGISTRY`] 按名称查找算法。

mod kjb;
mod lsb;

use crate::error::Result;
use crate::raster::Raster;
use std::fmt;

/// 可用的隐写算法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// 每像素 3 位，容量最大，几乎不可见，但无任何抗干扰能力。
    LeastSignificantBit,
    /// 蓝色通道扩频嵌入，每位重复 15 次，容量小，能抵抗少量像素噪声。
    KutterJordanBossen,
}

/// 名称到算法的静态查找表 (名称不区分大小写)。
pub const REGISTRY: &[(&str, Algorithm)] = &[
    ("LeastSignificantBit", Algorithm::LeastSignificantBit),
    ("lsb", Algorithm::LeastSignificantBit),
    ("KutterJordanBossen", Algorithm::KutterJordanBossen),
    ("kjb", Algorithm::KutterJordanBossen),
];

impl Algorithm {
    /// 按名称查找算法。
    pub fn from_name(name: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|&(_, algorithm)| algorithm)
    }

    /// 算法的规范名称。
    pub fn name(&self) -> &'static str {
        match self {
            Self::LeastSignificantBit => "LeastSignificantBit",
            Self::KutterJordanBossen => "KutterJordanBossen",
        }
    }

    /// 将 `text` 嵌入 `image` 的副本并返回该副本，`image` 本身不会被修改。
    ///
    /// # Errors
    ///
    /// 图像容量不足时返回 [`StegoError::InsufficientCapacity`](crate::StegoError::InsufficientCapacity)，
    /// 此时没有任何像素被写入。
    pub fn encode<R: Raster>(&self, text: &str, image: &R) -> Result<R> {
        match self {
            Self::LeastSignificantBit => lsb::encode(text, image),
            Self::KutterJordanBossen => kjb::encode(text, image),
        }
    }

    /// 从 `image` 中恢复隐藏的文本。
    ///
    /// # Errors
    ///
    /// * 图像未被编码或已损坏时返回 `CorruptOrUnencodedImage`。
    /// * 图像在读完声明长度之前结束时返回 `TruncatedImage`。
    pub fn decode<R: Raster>(&self, image: &R) -> Result<String> {
        match self {
            Self::LeastSignificantBit => lsb::decode(image),
            Self::KutterJordanBossen => kjb::decode(image),
        }
    }

    /// `encode` 能接受的最大文本字节数；连空文本都放不下时返回 `None`。
    pub fn capacity<R: Raster>(&self, image: &R) -> Option<usize> {
        match self {
            Self::LeastSignificantBit => lsb::capacity(image),
            Self::KutterJordanBossen => kjb::capacity(image),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
