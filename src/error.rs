//! # 错误类型模块
//!
//! 隐写容器编解码过程中可能出现的所有错误。
//! 所有错误都在修改缓冲区之前通过前置检查发现，并以类型化的形式返回给调用者。

use thiserror::Error;

/// 嵌入或提取载荷时可能发生的错误。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StegoError {
    /// 载荷加上头部超出了图像可用的 LSB 数量。
    #[error("Cover image too small: need {needed_bits} bits, have {available_bits} bits")]
    CapacityExceeded {
        needed_bits: usize,
        available_bits: usize,
    },

    /// 载荷长度无法用 32 位长度字段表示。
    #[error("Payload of {len} bytes exceeds the 32-bit length field limit")]
    PayloadTooLarge { len: usize },

    /// 头部魔数不匹配。
    #[error("Magic header not found: not a valid stego file")]
    InvalidMagic,

    /// 缓冲区甚至容纳不下一个完整的头部。
    #[error("Image too small to hold a stego header: need 72 bits, have {available_bits} bits")]
    TruncatedHeader { available_bits: usize },

    /// 头部声明的载荷长度超出了剩余可用的 LSB。
    #[error(
        "Corrupted or truncated stego image: header declares {declared_bytes} bytes \
         (need {needed_bits} bits, have {available_bits} bits)"
    )]
    TruncatedPayload {
        declared_bytes: usize,
        needed_bits: usize,
        available_bits: usize,
    },

    /// 比特源在拼装出所需字节数之前就已耗尽。
    /// 容量检查先于拼装执行，因此出现此错误意味着内部不变量被破坏。
    #[error("Not enough bits to reconstruct bytes: expected {expected_bits}, got {available_bits}")]
    InsufficientBits {
        expected_bits: usize,
        available_bits: usize,
    },
}
