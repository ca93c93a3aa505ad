/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Pixel format conversion routines
//!
//! Conversions work per pixel, every source pixel is unpacked into an
//! RGBA quadruple and repacked into the destination layout.
//!
//! Channels the source lacks take defaults
//!
//!|channel|8 bit |float|
//!|-------|------|-----|
//!| R,G,B | 0    | 0.0 |
//!| A     | 255  | 1.0 |
//!
//! Channels the destination lacks are dropped.
//!
//! 8 bit to 8 bit conversions never leave the integer domain, channels shared
//! by both formats are copied exactly. Moving between integer and float
//! formats maps `0..=255` to `0.0..=1.0`, with values outside that range clamped
//! when going back to 8 bits.
//!
//! Since conversions are per pixel, every mip level of the source is
//! converted and the level count is preserved.
use log::trace;

use crate::errors::TextureErrors;
use crate::format::{Channel, PixelFormat};
use crate::half::{f16_slice_to_f32, f32_slice_to_f16};
use crate::image::ImageBuffer;
use crate::traits::OperationsTrait;

const UNCOMPRESSED_FORMATS: &[PixelFormat] = &[
    PixelFormat::R8,
    PixelFormat::RG8,
    PixelFormat::RGB8,
    PixelFormat::RGBA8,
    PixelFormat::RGBAF16,
    PixelFormat::RGBAF32
];

/// Convert an image into another uncompressed pixel format
///
/// Block compression is not a conversion, see
/// [`Bc6hCompressor`](crate::compress::Bc6hCompressor) for that.
#[derive(Copy, Clone)]
pub struct ConvertFormat {
    format: PixelFormat
}

impl ConvertFormat {
    pub fn new(format: PixelFormat) -> ConvertFormat {
        ConvertFormat { format }
    }
}

impl OperationsTrait for ConvertFormat {
    fn name(&self) -> &'static str {
        "Convert format"
    }

    fn supported_formats(&self) -> &'static [PixelFormat] {
        UNCOMPRESSED_FORMATS
    }

    fn execute_impl(&self, image: &ImageBuffer) -> Result<ImageBuffer, TextureErrors> {
        let from = image.format();
        let to = self.format;

        if to.is_compressed() {
            return Err(TextureErrors::UnsupportedOperation(self.name(), to));
        }

        let data = if from == to {
            trace!("Image format already matches requested, copying");
            image.data().to_vec()
        } else if !from.is_float() && !to.is_float() {
            convert_u8(image.data(), from.num_components(), to.num_components())
        } else {
            pack_pixels(&unpack_pixels(image), to)
        };

        ImageBuffer::new_with_mip_levels(image.width(), image.height(), to, image.mip_levels(), data)
    }
}

/// Extract a single channel of an image into an `R8` image
#[derive(Copy, Clone)]
pub struct ExtractComponent {
    channel: Channel
}

impl ExtractComponent {
    pub fn new(channel: Channel) -> ExtractComponent {
        ExtractComponent { channel }
    }
}

impl OperationsTrait for ExtractComponent {
    fn name(&self) -> &'static str {
        "Extract component"
    }

    fn supported_formats(&self) -> &'static [PixelFormat] {
        UNCOMPRESSED_FORMATS
    }

    fn execute_impl(&self, image: &ImageBuffer) -> Result<ImageBuffer, TextureErrors> {
        let format = image.format();
        let index = self.channel.index();

        let data = if format.is_float() {
            unpack_pixels(image)
                .iter()
                .map(|pixel| float_to_u8(pixel[index]))
                .collect()
        } else {
            let components = format.num_components();

            image
                .data()
                .chunks_exact(components)
                .map(|pixel| {
                    let mut channels = [0, 0, 0, 255];
                    channels[..components].copy_from_slice(pixel);
                    channels[index]
                })
                .collect()
        };

        ImageBuffer::new_with_mip_levels(
            image.width(),
            image.height(),
            PixelFormat::R8,
            image.mip_levels(),
            data
        )
    }
}

// Convenience wrappers used when building materials
impl ImageBuffer {
    /// Convert this image into `format`, returning a new image
    ///
    /// # Errors
    /// - [`TextureErrors::UnsupportedOperation`] if either format is compressed
    pub fn convert(&self, format: PixelFormat) -> Result<ImageBuffer, TextureErrors> {
        ConvertFormat::new(format).execute(self)
    }

    /// Extract one channel of the image into an `R8` image
    ///
    /// # Errors
    /// - [`TextureErrors::UnsupportedOperation`] if the image is compressed
    pub fn component(&self, channel: Channel) -> Result<ImageBuffer, TextureErrors> {
        ExtractComponent::new(channel).execute(self)
    }

    /// Base color map, always `RGBA8`
    ///
    /// # Errors
    /// See [`ImageBuffer::convert`]
    pub fn color_map(&self) -> Result<ImageBuffer, TextureErrors> {
        self.convert(PixelFormat::RGBA8)
    }

    /// Tangent space normal map keeping the two stored components in `RG8`
    ///
    /// # Errors
    /// See [`ImageBuffer::convert`]
    pub fn normal_map(&self) -> Result<ImageBuffer, TextureErrors> {
        self.convert(PixelFormat::RG8)
    }

    /// Single channel map such as metallic or roughness packed into one
    /// channel of a texture
    ///
    /// # Errors
    /// See [`ImageBuffer::component`]
    pub fn channel_map(&self, channel: Channel) -> Result<ImageBuffer, TextureErrors> {
        self.component(channel)
    }
}

/// Repack 8 bit pixels with `from` channels into pixels with `to` channels
fn convert_u8(data: &[u8], from: usize, to: usize) -> Vec<u8> {
    let pixel_count = data.len() / from;
    let mut output = vec![0; pixel_count * to];

    for (src, dst) in data.chunks_exact(from).zip(output.chunks_exact_mut(to)) {
        let mut channels = [0, 0, 0, 255];

        channels[..from].copy_from_slice(src);
        dst.copy_from_slice(&channels[..to]);
    }
    output
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn float_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Unpack every pixel of an uncompressed image into RGBA floats
fn unpack_pixels(image: &ImageBuffer) -> Vec<[f32; 4]> {
    let format = image.format();

    match format {
        PixelFormat::RGBAF16 => {
            let halves = bytemuck::pod_collect_to_vec::<u8, u16>(image.data());
            let mut floats = vec![0.0; halves.len()];

            f16_slice_to_f32(&halves, &mut floats);

            floats
                .chunks_exact(4)
                .map(|pixel| [pixel[0], pixel[1], pixel[2], pixel[3]])
                .collect()
        }
        PixelFormat::RGBAF32 => bytemuck::pod_collect_to_vec::<u8, f32>(image.data())
            .chunks_exact(4)
            .map(|pixel| [pixel[0], pixel[1], pixel[2], pixel[3]])
            .collect(),
        _ => {
            let components = format.num_components();

            image
                .data()
                .chunks_exact(components)
                .map(|pixel| {
                    let mut channels = [0.0, 0.0, 0.0, 1.0];

                    for (channel, value) in channels.iter_mut().zip(pixel) {
                        *channel = f32::from(*value) / 255.0;
                    }
                    channels
                })
                .collect()
        }
    }
}

/// Pack RGBA floats into the layout of `format`
fn pack_pixels(pixels: &[[f32; 4]], format: PixelFormat) -> Vec<u8> {
    match format {
        PixelFormat::RGBAF16 => {
            let floats: &[f32] = bytemuck::cast_slice(pixels);
            let mut halves = vec![0_u16; floats.len()];

            f32_slice_to_f16(floats, &mut halves);

            bytemuck::cast_slice(&halves).to_vec()
        }
        PixelFormat::RGBAF32 => bytemuck::cast_slice(pixels).to_vec(),
        _ => {
            let components = format.num_components();

            pixels
                .iter()
                .flat_map(|pixel| pixel.map(float_to_u8).into_iter().take(components))
                .collect()
        }
    }
}
