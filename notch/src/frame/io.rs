use std::io::{Seek, Write};
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};

use super::{Frame, FrameDims};
use crate::error::{NotchError, Result};

/// Scale a `[0, 1]` sample to 8 bits: clip, then round to nearest.
#[inline]
pub(crate) fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Frame {
    /// Decode an image file into a float frame.
    ///
    /// Luminance images (with or without alpha) become single-channel frames,
    /// everything else is converted to RGB. Alpha is dropped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Frame> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| NotchError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_dynamic(img))
    }

    pub fn from_dynamic(img: DynamicImage) -> Frame {
        let width = img.width() as usize;
        let height = img.height() as usize;

        let has_color = img.color().has_color();
        let (channels, pixels) = if has_color {
            (3, img.to_rgb32f().into_raw())
        } else {
            (1, img.to_luma32f().into_raw())
        };

        Frame {
            dims: FrameDims::new(width, height, channels),
            pixels,
        }
    }

    /// Encode as 8-bit RGB.
    ///
    /// Frames with fewer than three channels are upconverted from their first
    /// channel; channels past the third are ignored.
    pub fn to_rgb8(&self) -> Result<RgbImage> {
        let expected = self.width() * self.height() * 3;
        let mut bytes = Vec::with_capacity(expected);
        for px in self.iter_pixels() {
            if px.len() >= 3 {
                bytes.extend([to_u8(px[0]), to_u8(px[1]), to_u8(px[2])]);
            } else {
                let v = to_u8(px[0]);
                bytes.extend([v, v, v]);
            }
        }

        let actual = bytes.len();
        RgbImage::from_raw(self.width() as u32, self.height() as u32, bytes)
            .ok_or(NotchError::DataLength { expected, actual })
    }

    /// Write the frame as an 8-bit RGB PNG stream.
    pub fn write_png<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        self.to_rgb8()?.write_to(writer, ImageFormat::Png)?;
        Ok(())
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.to_rgb8()?
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| match e {
                image::ImageError::IoError(source) => NotchError::Io {
                    path: path.to_path_buf(),
                    source,
                },
                other => NotchError::ImageEncode(other),
            })
    }
}
