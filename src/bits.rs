//! # 位与字节工具模块
//!
//! 提供两种隐写算法共用的底层转换：取单个位、ASCII 文本与字节互转、
//! 定长长度前缀以及最小长度的大端序整数表示。

use crate::constants::LENGTH_PREFIX_BYTES;

/// 非 ASCII 字符编码时的替换字节。
const ASCII_REPLACEMENT: u8 = b'?';

/// 返回 `value` 在 `position` 处的位 (0 为最低位)。
///
/// 调用方需保证 `position` 位于 0..=7。
pub fn get_bit(value: u8, position: u32) -> u8 {
    debug_assert!(position < u8::BITS);
    (value >> position) & 1
}

/// 将文本按单字节 ASCII 编码为字节序列。
///
/// 超出 0..=127 的字符被替换为 `?`，因此不保证可逆。
pub fn text_to_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { ASCII_REPLACEMENT })
        .collect()
}

/// 将 ASCII 字节序列解码为文本，非 ASCII 字节解码为 `U+FFFD`。
pub fn bytes_to_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii() {
                b as char
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect()
}

/// 返回 `byte_count` 的 4 字节大端序表示。
pub fn fixed_length_prefix(byte_count: u32) -> [u8; LENGTH_PREFIX_BYTES] {
    byte_count.to_be_bytes()
}

/// 从 4 字节大端序前缀还原长度。
pub fn parse_length_prefix(prefix: [u8; LENGTH_PREFIX_BYTES]) -> u32 {
    u32::from_be_bytes(prefix)
}

/// 返回非负整数最短的大端序字节表示 (补码符号约定)。
///
/// 若最高字节的最高位为 1，则在前面补一个 0 字节，以保证其仍被视为非负数；
/// 0 表示为单个 0 字节。LSB 解码依赖这一行为：大于 127 的组值会得到两个字节，
/// 从而无法被误认为单个 ASCII 字符。
pub fn minimal_be_bytes(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let first = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len() - 1);

    let mut out = Vec::with_capacity(bytes.len() - first + 1);
    if bytes[first] & 0x80 != 0 {
        out.push(0);
    }
    out.extend_from_slice(&bytes[first..]);
    out
}
