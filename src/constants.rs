/// 容器头部的魔数，用于识别由本工具生成的隐写图像。
pub const MAGIC: &[u8; 5] = b"STEG1";

/// 载荷长度字段占用的字节数 (大端序 `u32`)。
pub const LENGTH_BYTES: usize = 4;

/// 容器头部总字节数：魔数 + 长度字段。
pub const HEADER_BYTES: usize = MAGIC.len() + LENGTH_BYTES;

/// 容器头部占用的通道字节数。
/// 每个通道字节只在最低位存放 1 bit，因此 9 字节的头部需要 72 个通道字节。
pub const HEADER_BITS: usize = HEADER_BYTES * 8;

/// 长度字段能表示的最大载荷字节数。
pub const MAX_PAYLOAD_LEN: usize = u32::MAX as usize;

/// 未指定输出路径时，隐写图像文件名的后缀。
pub const STEGO_SUFFIX: &str = "_stego";

/// 未指定输出路径时，隐写图像使用的格式扩展名。
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// 未指定输出路径时，提取出的载荷文件使用的扩展名。
pub const PAYLOAD_EXTENSION: &str = "payload";
