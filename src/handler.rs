//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`extract` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, ExtractArgs, HideArgs};
use crate::constants::{DEFAULT_IMAGE_EXTENSION, PAYLOAD_EXTENSION, STEGO_SUFFIX};
use crate::image_io::{load_cover, lossless_format, save_cover};
use crate::steganography::{capacity, embed, extract};
use anyhow::{Context, Result};
use colored::Colorize;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 未指定输出路径时，隐写图像的默认路径：`<载体名称>_stego.png`，与载体位于同一目录。
pub fn default_stego_path(cover: &Path) -> PathBuf {
    let stem = cover.file_stem().unwrap_or_default().to_string_lossy();
    cover.with_file_name(format!(
        "{stem}{STEGO_SUFFIX}.{DEFAULT_IMAGE_EXTENSION}"
    ))
}

/// 未指定输出路径时，提取结果的默认路径：`<图像名称>.payload`，与图像位于同一目录。
pub fn default_payload_path(image: &Path) -> PathBuf {
    image.with_extension(PAYLOAD_EXTENSION)
}

/// 确认输出路径可以写入：文件已存在且未指定 `--force` 时拒绝覆盖。
fn ensure_writable(dest: &Path, force: bool) -> Result<()> {
    if dest.exists() {
        anyhow::ensure!(
            force,
            "Output file already exists: {}\nUse --force to overwrite it.",
            dest.to_string_lossy().red().bold()
        );
        warn!("overwriting existing file {}", dest.display());
    }
    Ok(())
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取载体图像和载荷文件、检查隐写空间是否足够、调用隐写核心函数嵌入容器，
/// 最后将结果无损地写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`，或目标格式不是无损格式。
/// * 无法读取输入的图像或载荷文件。
/// * 图像没有足够的空间来隐藏载荷。
/// * 无法编码或写入目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args.dest.unwrap_or_else(|| default_stego_path(&args.cover));
    ensure_writable(&dest, args.force)?;
    lossless_format(&dest).with_context(|| {
        format!(
            "Refusing to write {}: only lossless formats preserve hidden data",
            dest.to_string_lossy().red().bold()
        )
    })?;

    let mut cover = load_cover(&args.cover).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.cover.to_string_lossy().red().bold()
        )
    })?;

    let payload = fs::read(&args.payload).with_context(|| {
        format!(
            "Unable to read payload file: {}",
            args.payload.to_string_lossy().red().bold()
        )
    })?;

    let written_bits = embed(&mut cover.channels, &payload).with_context(|| {
        format!(
            "Not enough space in the image to hide {} ({} bytes). \nThe image can hold at most {} bytes.",
            args.payload.to_string_lossy().red().bold(),
            payload.len().to_string().red().bold(),
            capacity(cover.channels.len()).to_string().green().bold()
        )
    })?;
    info!(
        "modified the low bit of {} of {} channel bytes",
        written_bits,
        cover.channels.len()
    );

    save_cover(&cover, &dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "Embedded {} bytes into {}",
        payload.len().to_string().green().bold(),
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Extract' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用提取核心函数还原载荷，
/// 最后将载荷写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `ExtractArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件。
/// * 图像中没有有效的隐写容器，或容器已损坏。
/// * 无法写入到目标文件。
pub fn handle_extract(args: ExtractArgs) -> Result<()> {
    let dest = args.dest.unwrap_or_else(|| default_payload_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let stego = load_cover(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let payload = extract(&stego.channels).with_context(|| {
        format!(
            "Failed to extract a payload from '{}'. \nThe image may not contain hidden data or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    fs::write(&dest, &payload).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "Extracted {} bytes to {}",
        payload.len().to_string().green().bold(),
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑：报告载体图像最多能隐藏的字节数。
///
/// # Errors
///
/// 无法读取或解码图像时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let cover = load_cover(&args.cover).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.cover.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "{} ({}x{}, {} channels) can hold {} bytes",
        args.cover.to_string_lossy().bold(),
        cover.width,
        cover.height,
        cover.layout.channels(),
        capacity(cover.channels.len()).to_string().green().bold()
    );

    Ok(())
}
