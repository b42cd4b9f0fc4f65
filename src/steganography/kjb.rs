//! # Kutter-Jordan-Bossen (KJB) 算法
//!
//! 按亮度比例增减蓝色通道来嵌入信息位，每一位重复嵌入 [`KJB_REPEATS`] 次。
//! 解码时将每个嵌入点的蓝色值与其十字形邻域的平均值比较，再对所有重复取多数。
//!
//! 载荷格式为 4 字节大端序长度前缀 + 原始文本字节，与 LSB 的文本头不兼容。

use crate::bits::{fixed_length_prefix, parse_length_prefix};
use crate::constants::{
    KJB_ENERGY, KJB_NEIGHBOUR_RADIUS, KJB_ORIGIN, KJB_REPEATS, KJB_STEP, LENGTH_PREFIX_BYTES,
    LUMINANCE_WEIGHTS,
};
use crate::error::{Result, StegoError};
use crate::raster::Raster;
use log::{debug, warn};

/// 每个载荷字节占用的嵌入点数。
const SLOTS_PER_BYTE: usize = u8::BITS as usize * KJB_REPEATS;

/// 嵌入点游标。
///
/// 每次沿 x 前进 [`KJB_STEP`] 像素；放不下下一步时 x 复位为 [`KJB_ORIGIN`]，y 前进一步。
/// 一次编码或解码中所有位的所有重复共享同一个游标。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    x: u32,
    y: u32,
}

impl Cursor {
    pub(crate) fn new() -> Self {
        Self {
            x: KJB_ORIGIN,
            y: KJB_ORIGIN,
        }
    }

    /// 返回当前嵌入点并前移游标。
    ///
    /// 若嵌入点的邻域会越出图像，返回 `None`。
    pub(crate) fn next_slot(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if self.x + KJB_STEP > width {
            self.x = KJB_ORIGIN;
            self.y += KJB_STEP;
        }
        if self.x + KJB_STEP > width || self.y + KJB_NEIGHBOUR_RADIUS >= height {
            return None;
        }

        let slot = (self.x, self.y);
        self.x += KJB_STEP;
        Some(slot)
    }
}

/// 容量模型：`(width/4 - 1) * (height/4 - 1)` 个嵌入点。
fn slot_budget<R: Raster>(image: &R) -> usize {
    let columns = (image.width() / KJB_STEP).saturating_sub(1) as usize;
    let rows = (image.height() / KJB_STEP).saturating_sub(1) as usize;
    columns * rows
}

pub(crate) fn capacity<R: Raster>(image: &R) -> Option<usize> {
    (slot_budget(image) / SLOTS_PER_BYTE).checked_sub(LENGTH_PREFIX_BYTES)
}

fn luminance([r, g, b]: [u8; 3]) -> i32 {
    let [wr, wg, wb] = LUMINANCE_WEIGHTS;
    (wr * f64::from(r) + wg * f64::from(g) + wb * f64::from(b)) as i32
}

fn write_into_pixel<R: Raster>(image: &mut R, x: u32, y: u32, bit: u8) {
    let [r, g, b] = image.rgb(x, y);
    let delta = KJB_ENERGY * f64::from(luminance([r, g, b]));

    let blue = f64::from(b) + if bit > 0 { delta } else { -delta };

    image.set_rgb(x, y, [r, g, (blue as i32).clamp(0, 255) as u8]);
}

/// 单个嵌入点的估计：蓝色值高于邻域平均时为 1。
fn read_from_pixel<R: Raster>(image: &R, x: u32, y: u32) -> u8 {
    let blue = |x: u32, y: u32| u32::from(image.rgb(x, y)[2]);

    let sum: u32 = (1..=KJB_NEIGHBOUR_RADIUS)
        .map(|d| blue(x + d, y) + blue(x - d, y) + blue(x, y + d) + blue(x, y - d))
        .sum();
    let estimate = sum / (4 * KJB_NEIGHBOUR_RADIUS);

    u8::from(blue(x, y) > estimate)
}

fn write_bit<R: Raster>(image: &mut R, cursor: &mut Cursor, bit: u8) -> Option<()> {
    for _ in 0..KJB_REPEATS {
        let (x, y) = cursor.next_slot(image.width(), image.height())?;
        write_into_pixel(image, x, y, bit);
    }
    Some(())
}

pub(crate) fn read_bit<R: Raster>(image: &R, cursor: &mut Cursor) -> Option<u8> {
    let mut estimate = 0.0_f32;
    for _ in 0..KJB_REPEATS {
        let (x, y) = cursor.next_slot(image.width(), image.height())?;
        estimate += f32::from(read_from_pixel(image, x, y));
    }
    estimate /= KJB_REPEATS as f32;

    Some(u8::from(estimate > 0.5))
}

fn write_byte<R: Raster>(image: &mut R, cursor: &mut Cursor, byte: u8) -> Option<()> {
    (0..u8::BITS)
        .rev()
        .try_for_each(|j| write_bit(image, cursor, (byte >> j) & 1))
}

fn read_byte<R: Raster>(image: &R, cursor: &mut Cursor) -> Option<u8> {
    (0..u8::BITS).try_fold(0u8, |byte, _| Some((byte << 1) | read_bit(image, cursor)?))
}

pub(crate) fn encode<R: Raster>(text: &str, image: &R) -> Result<R> {
    let body = text.as_bytes();

    let required = (body.len() + LENGTH_PREFIX_BYTES).saturating_mul(SLOTS_PER_BYTE);
    let available = slot_budget(image);
    let capacity_error = || StegoError::InsufficientCapacity {
        required,
        available,
    };
    if required > available {
        return Err(capacity_error());
    }

    let length = u32::try_from(body.len()).map_err(|_| capacity_error())?;

    debug!(
        "KJB: embedding {} bytes ({} slots of {}) into {}x{} image",
        body.len(),
        required,
        available,
        image.width(),
        image.height()
    );

    let mut result = image.clone();
    let mut cursor = Cursor::new();

    fixed_length_prefix(length)
        .iter()
        .chain(body)
        .try_for_each(|&byte| write_byte(&mut result, &mut cursor, byte))
        .ok_or_else(capacity_error)?;

    Ok(result)
}

pub(crate) fn decode<R: Raster>(image: &R) -> Result<String> {
    let mut cursor = Cursor::new();

    let mut prefix = [0u8; LENGTH_PREFIX_BYTES];
    for (i, slot) in prefix.iter_mut().enumerate() {
        *slot = read_byte(image, &mut cursor).ok_or(StegoError::TruncatedImage {
            expected: LENGTH_PREFIX_BYTES,
            recovered: i,
        })?;
    }
    let length = parse_length_prefix(prefix) as usize;

    let budget = slot_budget(image);
    if length == 0 || length.saturating_mul(SLOTS_PER_BYTE) > budget {
        warn!("KJB: rejected length prefix {length} for slot budget {budget}");
        return Err(StegoError::CorruptOrUnencodedImage(format!(
            "length prefix {length} does not fit the image"
        )));
    }
    debug!("KJB: length prefix found, {length} bytes expected");

    let mut bytes = Vec::with_capacity(length);
    for _ in 0..length {
        let byte = read_byte(image, &mut cursor).ok_or(StegoError::TruncatedImage {
            expected: length,
            recovered: bytes.len(),
        })?;
        bytes.push(byte);
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gray(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([128, 128, 128]))
    }

    /// 第一个信息位的全部嵌入点。
    fn first_bit_slots(width: u32, height: u32) -> Vec<(u32, u32)> {
        let mut cursor = Cursor::new();
        (0..KJB_REPEATS)
            .map(|_| cursor.next_slot(width, height).unwrap())
            .collect()
    }

    #[test]
    fn cursor_steps_and_wraps() {
        let mut cursor = Cursor::new();
        let slots: Vec<_> = (0..5).map(|_| cursor.next_slot(16, 16).unwrap()).collect();
        assert_eq!(slots, vec![(3, 3), (7, 3), (11, 3), (3, 7), (7, 7)]);
    }

    #[test]
    fn cursor_stops_at_bottom_edge() {
        let mut cursor = Cursor::new();
        let count = std::iter::from_fn(|| cursor.next_slot(12, 12)).count();
        // x: 3, 7；y: 3, 7
        assert_eq!(count, 4);

        let mut narrow = Cursor::new();
        assert_eq!(narrow.next_slot(6, 100), None);
    }

    #[test]
    fn embedding_touches_only_blue() {
        let img = gray(128, 128);
        let encoded = encode("A", &img).unwrap();
        let [r, g, b] = Raster::rgb(&encoded, 3, 3);
        assert_eq!((r, g), (128, 128));
        // 长度前缀的第一位是 0，蓝色被降低
        assert!(b < 128);
        assert_eq!(Raster::rgb(&encoded, 4, 3), [128, 128, 128]);
    }

    #[test]
    fn blue_is_clamped() {
        let mut img = RgbImage::from_pixel(8, 8, Rgb([250, 250, 250]));
        write_into_pixel(&mut img, 3, 3, 1);
        assert_eq!(Raster::rgb(&img, 3, 3), [250, 250, 255]);

        let mut img = RgbImage::from_pixel(8, 8, Rgb([200, 200, 20]));
        write_into_pixel(&mut img, 3, 3, 0);
        assert_eq!(Raster::rgb(&img, 3, 3), [200, 200, 0]);
    }

    #[test]
    fn majority_vote_survives_minority_flips() {
        let img = gray(128, 128);
        let encoded = encode("A", &img).unwrap();
        let slots = first_bit_slots(128, 128);

        for flipped in 0..=KJB_REPEATS {
            let mut damaged = encoded.clone();
            for &(x, y) in slots.iter().take(flipped) {
                damaged.put_pixel(x, y, Rgb([128, 128, 200]));
            }

            let bit = read_bit(&damaged, &mut Cursor::new()).unwrap();
            let expected = if flipped >= 8 { 1 } else { 0 };
            assert_eq!(bit, expected, "flipped {flipped} of {KJB_REPEATS}");
        }
    }

    #[test]
    fn minority_flips_keep_text() {
        let img = gray(128, 128);
        let mut encoded = encode("A", &img).unwrap();
        for &(x, y) in first_bit_slots(128, 128).iter().take(7) {
            encoded.put_pixel(x, y, Rgb([128, 128, 200]));
        }
        assert_eq!(decode(&encoded).unwrap(), "A");
    }

    #[test]
    fn unencoded_image_has_no_length() {
        let img = gray(128, 128);
        assert!(matches!(
            decode(&img),
            Err(StegoError::CorruptOrUnencodedImage(_))
        ));
    }

    #[test]
    fn tiny_image_is_truncated() {
        let img = gray(16, 16);
        assert!(matches!(
            decode(&img),
            Err(StegoError::TruncatedImage { expected: 4, .. })
        ));
    }

    #[test]
    fn capacity_matches_encode_boundary() {
        // (84/4 - 1) * (124/4 - 1) = 20 * 30 = 600 = (1 + 4) * 120
        let img = gray(84, 124);
        assert_eq!(capacity(&img), Some(1));

        let encoded = encode("z", &img).unwrap();
        assert_eq!(decode(&encoded).unwrap(), "z");
        assert_eq!(
            encode("zz", &img),
            Err(StegoError::InsufficientCapacity {
                required: 720,
                available: 600
            })
        );

        assert_eq!(capacity(&gray(64, 64)), None);
    }
}
