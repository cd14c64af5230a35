//! Logo images embedded as PDF image XObjects.
//!
//! JPEG data is passed through as `DCTDecode`; only its header is read.
//! Everything else the `image` crate can decode is expanded to 8-bit gray or
//! RGB samples and deflated, with any alpha channel written as a separate
//! soft mask.

use std::io::{Cursor, Write};
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::jpeg::JpegDecoder;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageFormat};
use lopdf::{dictionary, Document, ObjectId, Stream};

use crate::error::{Error, Result};

/// Color model of the image samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    Gray,
    Rgb,
    Cmyk,
}

impl ColorModel {
    fn pdf_name(self) -> &'static str {
        match self {
            ColorModel::Gray => "DeviceGray",
            ColorModel::Rgb => "DeviceRGB",
            ColorModel::Cmyk => "DeviceCMYK",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    Dct,
    Flate,
}

impl Filter {
    fn pdf_name(self) -> &'static str {
        match self {
            Filter::Dct => "DCTDecode",
            Filter::Flate => "FlateDecode",
        }
    }
}

/// An image ready to become a PDF XObject.
#[derive(Debug, Clone)]
pub struct LogoImage {
    pub width: u32,
    pub height: u32,
    pub color: ColorModel,
    filter: Filter,
    data: Vec<u8>,
    /// Deflated 8-bit alpha samples
    alpha: Option<Vec<u8>>,
}

impl LogoImage {
    /// Read an image file. Returns `None` (with a warning) when the file is
    /// missing or cannot be decoded.
    pub fn load<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        let result = std::fs::read(path)
            .map_err(Error::from)
            .and_then(Self::from_bytes);

        match result {
            Ok(image) => Some(image),
            Err(e) => {
                log::warn!("Logo {} skipped: {}", path.display(), e);
                None
            }
        }
    }

    /// Decode image bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&bytes).map_err(|e| Error::Render(e.to_string()))?;
        let logo = match format {
            ImageFormat::Jpeg => Self::from_jpeg(bytes)?,
            _ => {
                let decoded = image::load_from_memory(&bytes).map_err(|e| Error::Render(e.to_string()))?;
                Self::from_decoded(decoded)?
            }
        };

        if logo.width == 0 || logo.height == 0 {
            return Err(Error::Render("image has no pixels".to_string()));
        }
        Ok(logo)
    }

    fn from_jpeg(bytes: Vec<u8>) -> Result<Self> {
        let decoder =
            JpegDecoder::new(Cursor::new(bytes.as_slice())).map_err(|e| Error::Render(e.to_string()))?;
        let (width, height) = decoder.dimensions();
        let color = match decoder.original_color_type() {
            ExtendedColorType::L8 => ColorModel::Gray,
            ExtendedColorType::Rgb8 => ColorModel::Rgb,
            ExtendedColorType::Cmyk8 => ColorModel::Cmyk,
            other => return Err(Error::Render(format!("unsupported JPEG color type {:?}", other))),
        };
        drop(decoder);

        Ok(Self {
            width,
            height,
            color,
            filter: Filter::Dct,
            data: bytes,
            alpha: None,
        })
    }

    fn from_decoded(image: DynamicImage) -> Result<Self> {
        let (width, height) = (image.width(), image.height());
        let color_type = image.color();
        let gray = !color_type.has_color();

        let (color, samples, alpha) = if color_type.has_alpha() {
            let rgba = image.to_rgba8();
            let alpha: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
            let alpha = alpha.iter().any(|&a| a < u8::MAX).then_some(alpha);
            if gray {
                let samples = rgba.pixels().map(|p| p.0[0]).collect();
                (ColorModel::Gray, samples, alpha)
            } else {
                let samples = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
                (ColorModel::Rgb, samples, alpha)
            }
        } else if gray {
            (ColorModel::Gray, image.to_luma8().into_raw(), None)
        } else {
            (ColorModel::Rgb, image.to_rgb8().into_raw(), None)
        };

        Ok(Self {
            width,
            height,
            color,
            filter: Filter::Flate,
            data: deflate(&samples)?,
            alpha: alpha.map(|a| deflate(&a)).transpose()?,
        })
    }

    /// Whether a soft mask will be written.
    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Height for a given drawn width, keeping the aspect ratio.
    pub fn scaled_height(&self, width: f32) -> f32 {
        width * self.height as f32 / self.width as f32
    }

    /// Add the image (and its soft mask) to `pdf`, returning the XObject id.
    pub fn add_to(&self, pdf: &mut Document) -> ObjectId {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => self.color.pdf_name(),
            "BitsPerComponent" => 8,
            "Filter" => self.filter.pdf_name(),
        };

        if let Some(alpha) = &self.alpha {
            let mask = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => self.width as i64,
                "Height" => self.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            };
            let mask_id = pdf.add_object(Stream::new(mask, alpha.clone()).with_compression(false));
            dict.set("SMask", mask_id);
        }

        pdf.add_object(Stream::new(dict, self.data.clone()).with_compression(false))
    }
}

fn deflate(samples: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(samples)?;
    Ok(encoder.finish()?)
}
