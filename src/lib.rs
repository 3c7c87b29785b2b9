//! # lsb_stash 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：比特编解码、隐写容器格式、
//! 图像读写以及命令处理。

// 声明库包含的所有模块。

pub mod bits;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod image_io;
pub mod steganography;

pub use error::StegoError;
pub use steganography::{capacity, embed, extract};
