//! # 光栅访问模块
//!
//! 隐写算法只通过 [`Raster`] 读写像素的红/绿/蓝通道，
//! 与具体的图像格式、色彩空间和透明通道无关。

use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// 可逐像素读写 RGB 通道的二维光栅。
///
/// 坐标 `(x, y)` 必须位于 `width() × height()` 之内。
pub trait Raster: Clone {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// 读取像素的 `[r, g, b]`。
    fn rgb(&self, x: u32, y: u32) -> [u8; 3];

    /// 写入像素的 `[r, g, b]`，其余通道保持不变。
    fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]);

    /// 像素总数。
    fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }
}

impl Raster for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.get_pixel(x, y).0
    }

    fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        self.put_pixel(x, y, Rgb(rgb));
    }
}

impl Raster for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let [r, g, b, _] = self.get_pixel(x, y).0;
        [r, g, b]
    }

    fn set_rgb(&mut self, x: u32, y: u32, [r, g, b]: [u8; 3]) {
        let alpha = self.get_pixel(x, y).0[3];
        self.put_pixel(x, y, Rgba([r, g, b, alpha]));
    }
}
