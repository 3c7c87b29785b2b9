//! # 图像读写模块
//!
//! 将图像文件解码为扁平的通道缓冲区，以及把缓冲区无损地编码回图像文件。
//!
//! 通道缓冲区按行优先排列像素，每个像素连续存放 3 (RGB) 或 4 (RGBA) 个通道字节，
//! 每行的字节数为 `width * channels`。

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ExtendedColorType, ImageError, ImageFormat, ImageReader};
use log::{debug, info};
use thiserror::Error;

/// 读写图像时可能发生的错误。
#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error("failed to open image {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode image as {format}")]
    Encode {
        format: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write image {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 输出扩展名对应的格式不是无损格式。
    #[error("unsupported output format '{extension}' (use png, bmp, tiff, webp or qoi)")]
    UnsupportedFormat { extension: String },

    #[error("channel buffer of {actual} bytes does not match {width}x{height} {layout:?}")]
    BufferSize {
        actual: usize,
        width: u32,
        height: u32,
        layout: ChannelLayout,
    },
}

/// 每个像素的通道布局。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Rgb,
    Rgba,
}

impl ChannelLayout {
    pub fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    fn color_type(self) -> ExtendedColorType {
        match self {
            Self::Rgb => ExtendedColorType::Rgb8,
            Self::Rgba => ExtendedColorType::Rgba8,
        }
    }
}

/// 解码后的载体图像：扁平的通道缓冲区及其尺寸和布局。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    pub channels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub layout: ChannelLayout,
}

impl Cover {
    /// 校验通道缓冲区长度与尺寸、布局一致。
    ///
    /// # Errors
    ///
    /// 长度不等于 `width * height * channels` 时返回 [`ImageIoError::BufferSize`]。
    pub fn check_size(&self) -> Result<(), ImageIoError> {
        let expected = self.row_stride() * self.height as usize;
        if self.channels.len() != expected {
            return Err(ImageIoError::BufferSize {
                actual: self.channels.len(),
                width: self.width,
                height: self.height,
                layout: self.layout,
            });
        }
        Ok(())
    }

    /// 每行像素占用的字节数。
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.layout.channels()
    }
}

impl From<DynamicImage> for Cover {
    fn from(image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        match image {
            DynamicImage::ImageRgb8(buf) => Self {
                channels: buf.into_raw(),
                width,
                height,
                layout: ChannelLayout::Rgb,
            },
            DynamicImage::ImageRgba8(buf) => Self {
                channels: buf.into_raw(),
                width,
                height,
                layout: ChannelLayout::Rgba,
            },
            other => {
                debug!("converting {:?} image to RGBA8", other.color());
                Self {
                    channels: other.into_rgba8().into_raw(),
                    width,
                    height,
                    layout: ChannelLayout::Rgba,
                }
            }
        }
    }
}

/// 根据输出路径的扩展名选择无损编码格式。
///
/// 没有扩展名或扩展名无法识别时使用 PNG。
///
/// # Errors
///
/// 扩展名对应的格式不是无损格式 (如 `jpg`) 时返回 [`ImageIoError::UnsupportedFormat`]。
pub fn lossless_format(path: &Path) -> Result<ImageFormat, ImageIoError> {
    let Some(extension) = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
    else {
        return Ok(ImageFormat::Png);
    };

    match ImageFormat::from_extension(&extension) {
        None | Some(ImageFormat::Png) => Ok(ImageFormat::Png),
        Some(format @ (ImageFormat::Bmp | ImageFormat::Tiff | ImageFormat::WebP | ImageFormat::Qoi)) => {
            Ok(format)
        }
        Some(_) => Err(ImageIoError::UnsupportedFormat { extension }),
    }
}

/// 读取并解码图像文件，格式根据文件内容识别，与扩展名无关。
///
/// # Errors
///
/// 文件无法读取或解码时返回 [`ImageIoError::Open`]。
pub fn load_cover(path: &Path) -> Result<Cover, ImageIoError> {
    let image = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(ImageError::from)
        .and_then(ImageReader::decode)
        .map_err(|source| ImageIoError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let cover = Cover::from(image);
    info!(
        "loaded {}x{} {:?} image from {}",
        cover.width,
        cover.height,
        cover.layout,
        path.display()
    );
    Ok(cover)
}

/// 将载体无损地编码并写入 `path`。
///
/// 图像先完整地编码到内存中再写入文件，编码失败时不会留下不完整的输出文件。
///
/// # Errors
///
/// * [`ImageIoError::BufferSize`] - 通道缓冲区长度与尺寸不符。
/// * [`ImageIoError::UnsupportedFormat`] - 扩展名对应有损格式。
/// * [`ImageIoError::Encode`] - 编码失败。
/// * [`ImageIoError::Write`] - 无法写入文件。
pub fn save_cover(cover: &Cover, path: &Path) -> Result<(), ImageIoError> {
    cover.check_size()?;
    let format = lossless_format(path)?;

    let mut encoded = Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut encoded,
        &cover.channels,
        cover.width,
        cover.height,
        cover.layout.color_type(),
        format,
    )
    .map_err(|source| ImageIoError::Encode {
        format: format!("{format:?}"),
        source,
    })?;

    fs::write(path, encoded.into_inner()).map_err(|source| ImageIoError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("wrote {:?} image to {}", format, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, RgbImage};

    #[test]
    fn rgb_images_keep_three_channels() {
        let image = RgbImage::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let cover = Cover::from(DynamicImage::ImageRgb8(image));
        assert_eq!(cover.layout, ChannelLayout::Rgb);
        assert_eq!(cover.channels, [1, 2, 3, 4, 5, 6]);
        assert_eq!(cover.row_stride(), 6);
    }

    #[test]
    fn other_modes_are_converted_to_rgba() {
        let image = GrayImage::from_pixel(3, 2, Luma([7]));
        let cover = Cover::from(DynamicImage::ImageLuma8(image));
        assert_eq!(cover.layout, ChannelLayout::Rgba);
        assert_eq!(cover.channels.len(), 3 * 2 * 4);
        assert_eq!(&cover.channels[..4], &[7, 7, 7, 255]);
    }

    #[test]
    fn lossy_extensions_are_rejected() {
        assert_eq!(lossless_format(Path::new("a.PNG")).unwrap(), ImageFormat::Png);
        assert_eq!(lossless_format(Path::new("a.tif")).unwrap(), ImageFormat::Tiff);
        assert_eq!(lossless_format(Path::new("a.qoi")).unwrap(), ImageFormat::Qoi);
        assert!(matches!(
            lossless_format(Path::new("a.jpg")),
            Err(ImageIoError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn missing_or_unknown_extensions_fall_back_to_png() {
        assert_eq!(lossless_format(Path::new("noext")).unwrap(), ImageFormat::Png);
        assert_eq!(lossless_format(Path::new("out.stego")).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn mismatched_buffer_is_not_encoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        let cover = Cover {
            channels: vec![0; 12],
            width: 2,
            height: 2,
            layout: ChannelLayout::Rgba,
        };

        assert!(matches!(
            save_cover(&cover, &path),
            Err(ImageIoError::BufferSize { actual: 12, .. })
        ));
        assert!(!path.exists());
    }
}
