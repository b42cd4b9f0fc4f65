//! # 图像保真度度量模块
//!
//! 比较原始图像与编码后图像的差异：MSE、RMSE 与 PSNR。
//! 仅使用红色通道平面作为代表通道。
//!
//! 两幅图像的宽高必须一致 (类型由泛型参数保证一致)，否则视为调用方的编程错误并直接 panic。

use crate::constants::PEAK_SIGNAL;
use crate::raster::Raster;

fn assert_same_shape<R: Raster>(a: &R, b: &R) {
    assert_eq!(
        (a.width(), a.height()),
        (b.width(), b.height()),
        "images must have the same dimensions"
    );
}

/// 计算两幅图像红色通道的均方误差 (MSE)。
///
/// # Panics
///
/// 两幅图像尺寸不同时 panic。
pub fn mean_squared_error<R: Raster>(original: &R, modified: &R) -> f64 {
    assert_same_shape(original, modified);

    let (width, height) = (original.width(), original.height());
    if width == 0 || height == 0 {
        return 0.0;
    }

    let sum: f64 = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let diff = f64::from(original.rgb(x, y)[0]) - f64::from(modified.rgb(x, y)[0]);
            diff * diff
        })
        .sum();

    sum / original.pixel_count() as f64
}

/// 计算均方根误差 (RMSE)。
pub fn root_mean_squared_error<R: Raster>(original: &R, modified: &R) -> f64 {
    mean_squared_error(original, modified).sqrt()
}

/// 计算峰值信噪比 (PSNR)，单位 dB。
///
/// 两幅图像完全相同时 MSE 为 0，返回 `f64::INFINITY`。
pub fn peak_signal_to_noise_ratio<R: Raster>(original: &R, modified: &R) -> f64 {
    let mse = mean_squared_error(original, modified);
    if mse == 0.0 {
        return f64::INFINITY;
    }
    10.0 * (PEAK_SIGNAL * PEAK_SIGNAL / mse).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn identical_images_have_zero_error() {
        let img = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 9]));
        assert_eq!(mean_squared_error(&img, &img), 0.0);
        assert_eq!(root_mean_squared_error(&img, &img), 0.0);
        assert_eq!(peak_signal_to_noise_ratio(&img, &img), f64::INFINITY);
    }

    #[test]
    fn only_red_channel_is_measured() {
        let a = RgbImage::from_pixel(4, 4, Rgb([100, 100, 100]));
        let b = RgbImage::from_pixel(4, 4, Rgb([100, 0, 255]));
        assert_eq!(mean_squared_error(&a, &b), 0.0);
    }

    #[test]
    fn known_error_values() {
        let a = RgbImage::from_pixel(2, 2, Rgb([10, 0, 0]));
        let mut b = a.clone();
        b.put_pixel(0, 0, Rgb([14, 0, 0]));

        // 一个像素差 4，平方 16，平均到 4 个像素
        assert_eq!(mean_squared_error(&a, &b), 4.0);
        assert_eq!(root_mean_squared_error(&a, &b), 2.0);

        let expected = 10.0 * (255.0_f64 * 255.0 / 4.0).log10();
        assert!((peak_signal_to_noise_ratio(&a, &b) - expected).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "same dimensions")]
    fn mismatched_dimensions_panic() {
        let a = RgbImage::new(4, 4);
        let b = RgbImage::new(4, 5);
        mean_squared_error(&a, &b);
    }
}
