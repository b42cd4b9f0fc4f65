//! # LSB (最低有效位) 算法
//!
//! 载荷格式为 `"<十进制长度> <文本>"` 的 ASCII 字节。按行优先顺序遍历像素，
//! 每个字节占用 3 个像素：第一个像素的红色最低位恒为 0，其后 8 个通道位依次写入
//! 该字节从高到低的 8 位。
//!
//! 解码时每 3 个像素的 9 个最低位组成一个 9 位整数。由于第一位恒为 0，
//! 正常编码的组值不会超过 255。这个占位位与 [`minimal_be_bytes`] 的补零行为
//! 共同决定了线上格式，修改任何一处都会导致已有图像无法解码。

use crate::bits::{bytes_to_text, get_bit, minimal_be_bytes, text_to_bytes};
use crate::constants::{LSB_CLEAR_MASK, LSB_GROUP_BITS, LSB_LENGTH_SEPARATOR, LSB_SLOTS_PER_BYTE};
use crate::error::{Result, StegoError};
use crate::raster::Raster;
use log::{debug, warn};

/// 组装 `"<长度> <文本>"` 载荷。
fn frame_payload(text: &str) -> Vec<u8> {
    let body = text_to_bytes(text);
    let mut payload = body.len().to_string().into_bytes();
    payload.push(LSB_LENGTH_SEPARATOR);
    payload.extend_from_slice(&body);
    payload
}

/// 长度为 `n` 的文本组帧后的字节数。
fn framed_len(n: usize) -> usize {
    n.to_string().len() + 1 + n
}

/// 图像能容纳的最大文本字节数，连空文本都放不下时返回 `None`。
pub(crate) fn capacity<R: Raster>(image: &R) -> Option<usize> {
    let max_payload = image.pixel_count() / LSB_SLOTS_PER_BYTE;
    let mut n = max_payload.checked_sub(2)?;
    while framed_len(n) > max_payload {
        n -= 1;
    }
    Some(n)
}

pub(crate) fn encode<R: Raster>(text: &str, image: &R) -> Result<R> {
    let payload = frame_payload(text);

    // 按每字节 8 个槽检查，而非实际消耗的 9 个通道位
    let required = payload.len() * LSB_SLOTS_PER_BYTE;
    let available = image.pixel_count();
    if required > available {
        return Err(StegoError::InsufficientCapacity {
            required,
            available,
        });
    }

    debug!(
        "LSB: embedding {} payload bytes into {}x{} image",
        payload.len(),
        image.width(),
        image.height()
    );

    let mut result = image.clone();
    let mut i = 0;
    let mut j: u32 = u8::BITS;

    'rows: for y in 0..result.height() {
        for x in 0..result.width() {
            let Some(&byte) = payload.get(i) else {
                break 'rows;
            };

            let [r, g, b] = result.rgb(x, y);

            // 每个字节的第一个像素：红色最低位是占位位，恒为 0
            let r = if j == u8::BITS {
                r & LSB_CLEAR_MASK
            } else {
                j -= 1;
                (r & LSB_CLEAR_MASK) | get_bit(byte, j)
            };
            j -= 1;
            let g = (g & LSB_CLEAR_MASK) | get_bit(byte, j);
            j -= 1;
            let b = (b & LSB_CLEAR_MASK) | get_bit(byte, j);

            result.set_rgb(x, y, [r, g, b]);

            if j == 0 {
                j = u8::BITS;
                i += 1;
            }
        }
    }

    Ok(result)
}

pub(crate) fn decode<R: Raster>(image: &R) -> Result<String> {
    decode_framed(image).map(|(_, text)| text)
}

/// 解码并同时返回文本头中的长度。
pub(crate) fn decode_framed<R: Raster>(image: &R) -> Result<(usize, String)> {
    let mut group: u64 = 0;
    let mut group_len = 0;

    let mut length: Option<usize> = None;
    let mut information = String::new();
    let mut recovered = 0;

    for y in 0..image.height() {
        for x in 0..image.width() {
            for channel in image.rgb(x, y) {
                group = (group << 1) | u64::from(channel % 2);
                group_len += 1;
            }

            if group_len == LSB_GROUP_BITS {
                let value = group;
                group = 0;
                group_len = 0;

                let chunk = bytes_to_text(&minimal_be_bytes(value));

                match length {
                    Some(_) => {
                        recovered += chunk.chars().count();
                        information.push_str(&chunk);
                    }
                    None if value == u64::from(LSB_LENGTH_SEPARATOR) => {
                        let parsed = information.parse::<usize>().map_err(|_| {
                            warn!("LSB: invalid length header {:?}", information);
                            StegoError::CorruptOrUnencodedImage(format!(
                                "invalid length header {information:?}"
                            ))
                        })?;
                        debug!("LSB: length header found, {parsed} characters expected");
                        length = Some(parsed);
                        information.clear();
                    }
                    None if value == 0 => {
                        warn!("LSB: zero byte before length header at ({x}, {y})");
                        return Err(StegoError::CorruptOrUnencodedImage(
                            "found a zero byte before the length header".into(),
                        ));
                    }
                    None if !chunk.chars().all(|c| c.is_ascii_digit()) => {
                        warn!("LSB: non-digit in length header at ({x}, {y})");
                        return Err(StegoError::CorruptOrUnencodedImage(
                            "length header contains a non-digit character".into(),
                        ));
                    }
                    None => information.push_str(&chunk),
                }
            }

            if let Some(expected) = length.filter(|&expected| recovered >= expected) {
                return Ok((expected, information));
            }
        }
    }

    match length {
        Some(expected) => Err(StegoError::TruncatedImage {
            expected,
            recovered,
        }),
        None => Err(StegoError::CorruptOrUnencodedImage(
            "no length header found".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gray(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([128, 128, 128]))
    }

    #[test]
    fn frame_prefixes_decimal_length() {
        assert_eq!(frame_payload("hi"), b"2 hi".to_vec());
        assert_eq!(frame_payload(""), b"0 ".to_vec());
        assert_eq!(frame_payload(&"x".repeat(12)).len(), 15);
    }

    #[test]
    fn each_byte_uses_three_pixels_with_zero_placeholder() {
        let img = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        let encoded = encode("", &img).unwrap();

        // "0 " = 0x30 0x20，占 6 个像素
        // 0x30 = 0011_0000 -> [0,0,0] [1,1,0] [0,0,0]
        assert_eq!(Raster::rgb(&encoded, 0, 0), [254, 254, 254]);
        assert_eq!(Raster::rgb(&encoded, 1, 0), [255, 255, 254]);
        assert_eq!(Raster::rgb(&encoded, 2, 0), [254, 254, 254]);
        // 0x20 = 0010_0000 -> [0,0,0] [1,0,0] [0,0,0]
        assert_eq!(Raster::rgb(&encoded, 3, 0), [254, 254, 254]);
        assert_eq!(Raster::rgb(&encoded, 0, 1), [255, 254, 254]);
        assert_eq!(Raster::rgb(&encoded, 1, 1), [254, 254, 254]);
        // 其余像素不变
        assert_eq!(Raster::rgb(&encoded, 2, 1), [255, 255, 255]);
    }

    #[test]
    fn hi_on_gray_recovers_length_and_text() {
        let img = gray(100, 100);
        let encoded = encode("hi", &img).unwrap();
        let (length, text) = decode_framed(&encoded).unwrap();
        assert_eq!(length, 2);
        assert_eq!(text, "hi");
    }

    #[test]
    fn empty_text_round_trips() {
        let img = gray(8, 8);
        assert_eq!(decode(&encode("", &img).unwrap()).unwrap(), "");
    }

    #[test]
    fn all_zero_image_is_rejected() {
        let img = RgbImage::new(32, 32);
        assert!(matches!(
            decode(&img),
            Err(StegoError::CorruptOrUnencodedImage(_))
        ));
    }

    #[test]
    fn missing_tail_is_truncated() {
        // 在 3x3 的图像中手工写入 "5 a"，正文不足 5 个字符
        let payload = b"5 a";
        let mut img = RgbImage::from_pixel(3, 3, Rgb([0, 0, 0]));
        for (i, &byte) in payload.iter().enumerate() {
            let bits: Vec<u8> = std::iter::once(0)
                .chain((0..8).rev().map(|p| get_bit(byte, p)))
                .collect();
            for (k, rgb) in bits.chunks(3).enumerate() {
                let pixel = (i * 3 + k) as u32;
                img.put_pixel(pixel % 3, pixel / 3, Rgb([rgb[0], rgb[1], rgb[2]]));
            }
        }

        assert_eq!(
            decode(&img),
            Err(StegoError::TruncatedImage {
                expected: 5,
                recovered: 1
            })
        );
    }

    #[test]
    fn capacity_matches_encode_boundary() {
        // 80 个像素 / 8 = 10 字节："8 " + 8 个字符
        let img = gray(10, 8);
        assert_eq!(capacity(&img), Some(8));
        assert!(encode(&"a".repeat(8), &img).is_ok());
        assert!(encode(&"a".repeat(9), &img).is_err());

        assert_eq!(capacity(&gray(3, 5)), None);
        assert_eq!(capacity(&gray(4, 4)), Some(0));
    }
}
