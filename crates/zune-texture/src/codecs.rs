/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Entry point for all image containers the library understands
//!
//! Containers are split in two families
//!
//! - Low dynamic range rasters (PNG, JPEG, BMP, PPM, QOI) are decoded by
//!  `zune-image` into one of the 8 bit formats, the channel count picks
//!  the format.
//! - High dynamic range images (Radiance HDR, portable float maps, OpenEXR)
//!  are decoded into `RGBAF32`.
//!
//! [`load_from_memory`] and [`load_from_file`] then run the 32 to 16 bit
//! float pass on HDR images, so loaders always hand out one of
//! `R8`, `RG8`, `RGB8`, `RGBA8` or `RGBAF16`.
use std::path::Path;

use log::debug;
use zune_core::options::DecoderOptions;

use crate::codecs::exr::ExrDecoder;
use crate::codecs::pfm::FloatMapDecoder;
use crate::codecs::radiance::RadianceDecoder;
use crate::codecs::raster::RasterDecoder;
use crate::errors::TextureErrors;
use crate::format::PixelFormat;
use crate::image::ImageBuffer;
use crate::options::TextureOptions;
use crate::traits::DecoderTrait;

pub mod exr;
pub mod pfm;
pub mod radiance;
pub mod raster;

/// All image containers we can probe for
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[allow(clippy::upper_case_acronyms)]
pub enum ImageFormat {
    /// Portable Network Graphics
    PNG,
    /// Joint Photographic Experts Group
    JPEG,
    /// Windows Bitmap
    BMP,
    /// Portable Pixel Map image
    PPM,
    /// Quite Okay Image
    QOI,
    /// Radiance HDR image
    HDR,
    /// Portable float map image
    PFM,
    /// OpenEXR image
    EXR,
    /// Any unknown format
    Unknown
}

impl ImageFormat {
    /// Guess the container of `bytes` by its magic bytes
    ///
    /// Returns [`ImageFormat::Unknown`] if nothing matches
    pub fn guess_format(bytes: &[u8]) -> ImageFormat {
        let magic_bytes: [(&[u8], ImageFormat); 12] = [
            (&[137, 80, 78, 71, 13, 10, 26, 10], ImageFormat::PNG),
            // some jpeg images lack the third 0xff
            (&[0xff, 0xd8], ImageFormat::JPEG),
            (b"P5", ImageFormat::PPM),
            (b"P6", ImageFormat::PPM),
            (b"P7", ImageFormat::PPM),
            (b"Pf", ImageFormat::PFM),
            (b"PF", ImageFormat::PFM),
            (b"qoif", ImageFormat::QOI),
            (b"#?RADIANCE\n", ImageFormat::HDR),
            (b"#?RGBE\n", ImageFormat::HDR),
            (&[0x76, 0x2f, 0x31, 0x01], ImageFormat::EXR),
            (b"BM", ImageFormat::BMP)
        ];

        for (magic, format) in magic_bytes {
            if bytes.starts_with(magic) {
                return format;
            }
        }
        ImageFormat::Unknown
    }

    /// Return true if a decoder exists for this format
    pub const fn has_decoder(self) -> bool {
        !matches!(self, ImageFormat::Unknown)
    }

    /// Return true if the format stores high dynamic range data
    pub const fn is_hdr(self) -> bool {
        matches!(self, ImageFormat::HDR | ImageFormat::PFM | ImageFormat::EXR)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ImageFormat::PNG => "png",
            ImageFormat::JPEG => "jpeg",
            ImageFormat::BMP => "bmp",
            ImageFormat::PPM => "ppm",
            ImageFormat::QOI => "qoi",
            ImageFormat::HDR => "hdr",
            ImageFormat::PFM => "pfm",
            ImageFormat::EXR => "exr",
            ImageFormat::Unknown => "unknown"
        }
    }

    /// Create a decoder for `data` which is assumed to be of
    /// this format
    ///
    /// # Errors
    /// [`TextureErrors::UnsupportedFormat`] for [`ImageFormat::Unknown`]
    pub fn decoder<'a>(
        self, data: &'a [u8], options: DecoderOptions
    ) -> Result<Box<dyn DecoderTrait + 'a>, TextureErrors> {
        match self {
            ImageFormat::PNG
            | ImageFormat::JPEG
            | ImageFormat::BMP
            | ImageFormat::PPM
            | ImageFormat::QOI => Ok(Box::new(RasterDecoder::new_with_options(data, options))),
            ImageFormat::HDR => Ok(Box::new(RadianceDecoder::new_with_options(data, options))),
            ImageFormat::PFM => Ok(Box::new(FloatMapDecoder::new_with_options(data, options))),
            ImageFormat::EXR => Ok(Box::new(ExrDecoder::new_with_options(data, options))),
            ImageFormat::Unknown => Err(TextureErrors::UnsupportedFormat(
                "Unknown image format, no decoder found".to_string()
            ))
        }
    }
}

/// Return true if `bytes` start like an image we can decode
pub fn is_image(bytes: &[u8]) -> bool {
    ImageFormat::guess_format(bytes).has_decoder()
}

/// Decode an image held in memory
///
/// # Errors
/// - [`TextureErrors::UnsupportedFormat`] for unknown containers, multi-part EXR
/// files or more than four channels
/// - [`TextureErrors::DecodeErrors`] for corrupt data
pub fn load_from_memory(
    bytes: &[u8], options: &TextureOptions
) -> Result<ImageBuffer, TextureErrors> {
    load(bytes, options, "memory")
}

/// Read and decode an image file
///
/// # Errors
/// - [`TextureErrors::IoErrors`] if the file cannot be read
/// - See [`load_from_memory`]
pub fn load_from_file<P: AsRef<Path>>(
    path: P, options: &TextureOptions
) -> Result<ImageBuffer, TextureErrors> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;

    load(&bytes, options, &path.display().to_string())
}

fn load(bytes: &[u8], options: &TextureOptions, source: &str) -> Result<ImageBuffer, TextureErrors> {
    let format = ImageFormat::guess_format(bytes);
    let mut decoder = format.decoder(bytes, options.to_decoder_options())?;

    let mut image = decoder.decode()?;

    if format.is_hdr() {
        image = image.convert(PixelFormat::RGBAF16)?;
    }
    debug!("Loaded {} image from {source} using {}", format.name(), decoder.name());
    debug!("Width: {}", image.width());
    debug!("Height: {}", image.height());
    debug!("Format: {}", image.format().name());
    debug!("Bytes: {}", image.data().len());

    Ok(image)
}

/// Convert decoder dimensions into image dimensions
pub(crate) fn checked_dimensions(
    width: usize, height: usize
) -> Result<(u32, u32), TextureErrors> {
    let width = u32::try_from(width)
        .map_err(|_| TextureErrors::TooLargeDimensions("width", u32::MAX as usize, width))?;
    let height = u32::try_from(height)
        .map_err(|_| TextureErrors::TooLargeDimensions("height", u32::MAX as usize, height))?;

    Ok((width, height))
}
