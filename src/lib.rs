//! # stego_hide 库
//!
//! 本库包含文本隐写工具的核心逻辑：LSB 与 Kutter-Jordan-Bossen 两种算法、
//! 共用的位操作工具，以及评估载体图像失真程度的保真度度量。

// 声明库包含的所有模块。

pub mod bits;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod raster;
pub mod steganography;

pub use error::{Result, StegoError};
pub use raster::Raster;
pub use steganography::{Algorithm, REGISTRY};
