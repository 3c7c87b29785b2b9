//! # 隐写容器模块
//!
//! 定义容器格式 `MAGIC ‖ LENGTH ‖ PAYLOAD`，并负责将容器逐比特写入通道缓冲区
//! 的最低有效位，或从中读出。
//!
//! 容器的第 `i` 个比特 (每个字节 MSB 优先) 存放在通道缓冲区第 `i` 个字节的最低位，
//! 该字节的其余 7 位保持不变。

use log::{debug, trace};

use crate::bits::{bits, lsbs, pack};
use crate::constants::{HEADER_BITS, HEADER_BYTES, LENGTH_BYTES, MAGIC, MAX_PAYLOAD_LEN};
use crate::error::StegoError;

/// 容器头部：魔数之后紧跟大端序的载荷长度。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub length: u32,
}

impl Header {
    /// 序列化为 9 字节的头部。
    pub fn to_bytes(self) -> [u8; HEADER_BYTES] {
        let mut out = [0u8; HEADER_BYTES];
        out[..MAGIC.len()].copy_from_slice(MAGIC);
        out[MAGIC.len()..].copy_from_slice(&self.length.to_be_bytes());
        out
    }

    /// 从 9 字节的头部解析出载荷长度。
    ///
    /// # Errors
    ///
    /// 魔数不匹配时返回 [`StegoError::InvalidMagic`]。
    pub fn parse(bytes: &[u8; HEADER_BYTES]) -> Result<Self, StegoError> {
        let (magic, length) = bytes.split_at(MAGIC.len());
        if magic != MAGIC {
            return Err(StegoError::InvalidMagic);
        }

        let mut raw = [0u8; LENGTH_BYTES];
        raw.copy_from_slice(length);
        Ok(Self {
            length: u32::from_be_bytes(raw),
        })
    }
}

/// 返回长度为 `buffer_len` 的通道缓冲区最多能容纳的载荷字节数。
pub fn capacity(buffer_len: usize) -> usize {
    (buffer_len.saturating_sub(HEADER_BITS) / 8).min(MAX_PAYLOAD_LEN)
}

/// 校验长度为 `payload_len` 的载荷能否放入长度为 `buffer_len` 的缓冲区。
///
/// 容量检查先于长度字段检查，因此只有缓冲区确实足够大时才会报告
/// [`StegoError::PayloadTooLarge`]。成功时返回需要写入的比特数和头部长度字段。
fn check_fits(payload_len: usize, buffer_len: usize) -> Result<(usize, u32), StegoError> {
    let needed_bits = payload_len.saturating_mul(8).saturating_add(HEADER_BITS);
    if needed_bits > buffer_len {
        return Err(StegoError::CapacityExceeded {
            needed_bits,
            available_bits: buffer_len,
        });
    }

    let length = u32::try_from(payload_len)
        .map_err(|_| StegoError::PayloadTooLarge { len: payload_len })?;
    Ok((needed_bits, length))
}

/// 将 `payload` 封装为容器并写入 `buffer` 的最低有效位。
///
/// 只修改前 `(9 + payload.len()) * 8` 个字节的最低位，返回写入的比特数。
///
/// # Errors
///
/// * [`StegoError::CapacityExceeded`] - 缓冲区容纳不下头部和载荷。
/// * [`StegoError::PayloadTooLarge`] - 缓冲区足够大，但载荷长度超出 32 位长度字段。
///
/// 出错时缓冲区保持原样。
pub fn embed(buffer: &mut [u8], payload: &[u8]) -> Result<usize, StegoError> {
    let (needed_bits, length) = check_fits(payload.len(), buffer.len())?;

    let header = Header { length }.to_bytes();
    debug!(
        "embedding {} payload bytes into {} of {} channel bytes",
        payload.len(),
        needed_bits,
        buffer.len()
    );

    buffer
        .iter_mut()
        .zip(bits(&header).chain(bits(payload)))
        .for_each(|(byte, bit)| *byte = (*byte & 0xFE) | bit);

    Ok(needed_bits)
}

/// 从 `buffer` 的最低有效位中读出容器并返回其中的载荷。
///
/// 依次执行：读取头部 → 校验魔数 → 检查容量 → 读取载荷。
/// 任一步失败都会立即返回，不会继续读取后续比特。
///
/// # Errors
///
/// * [`StegoError::TruncatedHeader`] - 缓冲区不足 72 字节。
/// * [`StegoError::InvalidMagic`] - 头部魔数不是 `STEG1`。
/// * [`StegoError::TruncatedPayload`] - 声明的载荷长度超出缓冲区剩余容量。
pub fn extract(buffer: &[u8]) -> Result<Vec<u8>, StegoError> {
    if buffer.len() < HEADER_BITS {
        return Err(StegoError::TruncatedHeader {
            available_bits: buffer.len(),
        });
    }

    let (header_bits, payload_bits) = buffer.split_at(HEADER_BITS);
    let raw = pack(lsbs(header_bits), HEADER_BYTES)?;
    let mut header_bytes = [0u8; HEADER_BYTES];
    header_bytes.copy_from_slice(&raw);
    let header = Header::parse(&header_bytes)?;
    trace!("stego header declares {} payload bytes", header.length);

    let declared_bytes = header.length as usize;
    let needed_bits = declared_bytes
        .checked_mul(8)
        .and_then(|n| n.checked_add(HEADER_BITS))
        .filter(|&total| total <= buffer.len())
        .ok_or(StegoError::TruncatedPayload {
            declared_bytes,
            needed_bits: HEADER_BITS.saturating_add(declared_bytes.saturating_mul(8)),
            available_bits: buffer.len(),
        })?;

    let payload = pack(lsbs(&payload_bits[..needed_bits - HEADER_BITS]), declared_bytes)?;
    debug!("extracted {} payload bytes", payload.len());

    Ok(payload)
}
