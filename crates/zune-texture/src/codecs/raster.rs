/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Low dynamic range raster decoding
//!
//! Decoding is delegated to `zune-image`, the decoded colorspace picks
//! the pixel format
//!
//!|colorspace|format |
//!|----------|-------|
//!| Luma     | `R8`  |
//!| LumaA    | `RG8` |
//!| RGB      | `RGB8`|
//!| RGBA     | `RGBA8`|
//!
//! Images with more than 8 bits per channel are reduced to 8 bits.
use log::warn;
use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::ZCursor;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_image::image::Image;

use crate::codecs::checked_dimensions;
use crate::errors::TextureErrors;
use crate::format::PixelFormat;
use crate::image::ImageBuffer;
use crate::traits::DecoderTrait;

/// Decoder for PNG, JPEG, BMP, PPM and QOI images
pub struct RasterDecoder<'a> {
    data:       &'a [u8],
    options:    DecoderOptions,
    dimensions: Option<(usize, usize)>
}

impl<'a> RasterDecoder<'a> {
    pub fn new(data: &'a [u8]) -> RasterDecoder<'a> {
        Self::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> RasterDecoder<'a> {
        RasterDecoder {
            data,
            options,
            dimensions: None
        }
    }
}

/// Map the channels of a decoded image to a pixel format
fn format_for(colorspace: ColorSpace) -> Result<PixelFormat, TextureErrors> {
    let format = match colorspace {
        ColorSpace::Luma | ColorSpace::LumaA | ColorSpace::RGB | ColorSpace::RGBA => {
            PixelFormat::from_components(colorspace.num_components())
        }
        _ => None
    };
    format.ok_or_else(|| {
        TextureErrors::UnsupportedFormat(format!(
            "Images in the {colorspace:?} colorspace cannot be used as textures"
        ))
    })
}

#[allow(clippy::cast_possible_truncation)]
fn first_frame_u8(image: &Image) -> Result<Vec<u8>, TextureErrors> {
    let frame = match image.depth() {
        BitDepth::Eight => image.flatten_frames::<u8>().into_iter().next(),
        BitDepth::Sixteen => {
            warn!("Stripping 16 bit image to 8 bits per channel");

            image
                .flatten_frames::<u16>()
                .into_iter()
                .next()
                .map(|frame| frame.iter().map(|x| (x >> 8) as u8).collect())
        }
        depth => {
            return Err(TextureErrors::UnsupportedFormat(format!(
                "Unsupported bit depth {depth:?}"
            )))
        }
    };

    frame.ok_or_else(|| TextureErrors::DecodeErrors("Image contains no frames".to_string()))
}

impl DecoderTrait for RasterDecoder<'_> {
    fn decode(&mut self) -> Result<ImageBuffer, TextureErrors> {
        let image = Image::read(ZCursor::new(self.data), self.options)?;

        let (width, height) = image.dimensions();
        let format = format_for(image.colorspace())?;

        let data = first_frame_u8(&image)?;
        self.dimensions = Some((width, height));

        let (width, height) = checked_dimensions(width, height)?;

        ImageBuffer::new(width, height, format, data)
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        self.dimensions
    }

    fn name(&self) -> &'static str {
        "raster"
    }
}
