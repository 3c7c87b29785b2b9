//! # 比特编解码模块
//!
//! 在字节序列与比特序列之间转换。比特顺序固定为每个字节的最高位在前，
//! 字节按输入顺序排列。

use std::iter::FusedIterator;

use crate::error::StegoError;

/// 字节序列上的惰性比特迭代器，每次产出 `0` 或 `1`。
///
/// 迭代器是有限的，并且可以通过 `clone` 从当前位置重新开始。
#[derive(Debug, Clone)]
pub struct Bits<'a> {
    bytes: &'a [u8],
    pos: usize,
}

/// 返回 `bytes` 的比特迭代器 (MSB 优先)。
pub fn bits(bytes: &[u8]) -> Bits<'_> {
    Bits { bytes, pos: 0 }
}

impl Iterator for Bits<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.pos / 8)?;
        let bit = (byte >> (7 - self.pos % 8)) & 1;
        self.pos += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len() * 8 - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Bits<'_> {}

impl FusedIterator for Bits<'_> {}

/// 按顺序产出缓冲区中每个字节的最低有效位。
pub fn lsbs(buffer: &[u8]) -> impl Iterator<Item = u8> + Clone + '_ {
    buffer.iter().map(|byte| byte & 1)
}

/// 将比特源中每 8 个连续比特拼成一个字节，先取到的比特作为最高位。
///
/// 恰好产出 `n_bytes` 个字节后立即停止，不会从比特源读取多余的比特。
/// 每个比特只使用其最低位。
///
/// # Errors
///
/// 如果比特源在凑满 `n_bytes * 8` 个比特之前耗尽，返回 [`StegoError::InsufficientBits`]。
pub fn pack<I>(bits: I, n_bytes: usize) -> Result<Vec<u8>, StegoError>
where
    I: IntoIterator<Item = u8>,
{
    let expected_bits = n_bytes.saturating_mul(8);
    let bits = bits.into_iter().take(expected_bits);

    let mut out = Vec::with_capacity(n_bytes.min(bits.size_hint().0 / 8));
    let mut value = 0u8;
    let mut consumed = 0usize;

    for bit in bits {
        value = (value << 1) | (bit & 1);
        consumed += 1;
        if consumed % 8 == 0 {
            out.push(value);
            value = 0;
        }
    }

    if out.len() < n_bytes {
        return Err(StegoError::InsufficientBits {
            expected_bits,
            available_bits: consumed,
        });
    }

    Ok(out)
}
