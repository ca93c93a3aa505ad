/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Radiance HDR decoding support
//!
//! Radiance images carry three float channels, an opaque alpha
//! is inserted to produce `RGBAF32` images.
use zune_core::bytestream::ZCursor;
use zune_core::options::DecoderOptions;
use zune_hdr::HdrDecoder;

use crate::codecs::checked_dimensions;
use crate::errors::TextureErrors;
use crate::image::ImageBuffer;
use crate::traits::DecoderTrait;

/// Decoder for `.hdr` images
pub struct RadianceDecoder<'a> {
    data:       &'a [u8],
    options:    DecoderOptions,
    dimensions: Option<(usize, usize)>
}

impl<'a> RadianceDecoder<'a> {
    pub fn new(data: &'a [u8]) -> RadianceDecoder<'a> {
        Self::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> RadianceDecoder<'a> {
        RadianceDecoder {
            data,
            options,
            dimensions: None
        }
    }
}

/// Expand interleaved RGB floats into RGBA, alpha is `1.0`
pub fn rgb_to_rgba(pixels: &[f32]) -> Vec<f32> {
    let mut output = Vec::with_capacity(pixels.len() / 3 * 4);

    for pixel in pixels.chunks_exact(3) {
        output.extend_from_slice(pixel);
        output.push(1.0);
    }
    output
}

impl DecoderTrait for RadianceDecoder<'_> {
    fn decode(&mut self) -> Result<ImageBuffer, TextureErrors> {
        let mut decoder = HdrDecoder::new_with_options(ZCursor::new(self.data), self.options);

        let pixels = decoder.decode()?;
        let (width, height) = decoder.dimensions().ok_or_else(|| {
            TextureErrors::DecodeErrors("Radiance headers were not decoded".to_string())
        })?;
        self.dimensions = Some((width, height));

        let (width, height) = checked_dimensions(width, height)?;

        ImageBuffer::from_f32(width, height, &rgb_to_rgba(&pixels))
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        self.dimensions
    }

    fn name(&self) -> &'static str {
        "radiance"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::format::PixelFormat;

    /// 2x1 image, both pixels are (1.0, 0.5, 0.25)
    const RADIANCE: &[u8] =
        b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y 1 +X 2\n\x80\x40\x20\x81\x80\x40\x20\x81";

    fn header(width: usize, height: usize) -> Vec<u8> {
        format!("#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y {height} +X {width}\n").into_bytes()
    }

    /// 8x2 image with run length encoded scanlines and its RGBA floats
    ///
    /// Row one has a constant red, a green ramp stored as literals
    /// and blue in two runs. Row two is a constant 0.25 grey.
    pub(crate) fn rle_image() -> (Vec<u8>, Vec<f32>) {
        let mut data = header(8, 2);

        data.extend_from_slice(&[0x02, 0x02, 0x00, 0x08]);
        data.extend_from_slice(&[0x88, 0x80]);
        data.extend_from_slice(&[0x08, 0x00, 0x20, 0x40, 0x60, 0x80, 0xa0, 0xc0, 0xe0]);
        data.extend_from_slice(&[0x84, 0x20, 0x84, 0x40]);
        data.extend_from_slice(&[0x88, 0x81]);

        data.extend_from_slice(&[0x02, 0x02, 0x00, 0x08]);
        data.extend_from_slice(&[0x88, 0x40, 0x88, 0x40, 0x88, 0x40, 0x88, 0x80]);

        let mut pixels = Vec::new();

        for x in 0..8 {
            let blue = if x < 4 { 0.25 } else { 0.5 };
            pixels.extend_from_slice(&[1.0, x as f32 * 0.25, blue, 1.0]);
        }
        for _ in 0..8 {
            pixels.extend_from_slice(&[0.25, 0.25, 0.25, 1.0]);
        }
        (data, pixels)
    }

    /// 8x1 image with plain RGBE pixels and its RGBA floats
    pub(crate) fn flat_image() -> (Vec<u8>, Vec<f32>) {
        let mut data = header(8, 1);
        let mut pixels = Vec::new();

        for x in 0..8_u8 {
            data.extend_from_slice(&[0x80, x * 0x20, 0x40, 0x81]);
            pixels.extend_from_slice(&[1.0, f32::from(x) * 0.25, 0.5, 1.0]);
        }
        (data, pixels)
    }

    #[test]
    fn test_decode_radiance() {
        let mut decoder = RadianceDecoder::new(RADIANCE);
        let image = decoder.decode().unwrap();

        assert_eq!(decoder.dimensions(), Some((2, 1)));
        assert_eq!(image.format(), PixelFormat::RGBAF32);
        assert_eq!(
            image.to_vec_of::<f32>().unwrap(),
            vec![1.0, 0.5, 0.25, 1.0, 1.0, 0.5, 0.25, 1.0]
        );
    }

    #[test]
    fn test_decode_run_length_scanlines() {
        let (data, pixels) = rle_image();

        let mut decoder = RadianceDecoder::new(&data);
        let image = decoder.decode().unwrap();

        assert_eq!(decoder.dimensions(), Some((8, 2)));
        assert_eq!(image.to_vec_of::<f32>().unwrap(), pixels);
    }

    #[test]
    fn test_decode_flat_wide_scanlines() {
        let (data, pixels) = flat_image();

        let mut decoder = RadianceDecoder::new(&data);
        let image = decoder.decode().unwrap();

        assert_eq!(decoder.dimensions(), Some((8, 1)));
        assert_eq!(image.to_vec_of::<f32>().unwrap(), pixels);
    }

    #[test]
    fn test_rgb_to_rgba() {
        assert_eq!(
            rgb_to_rgba(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            vec![1.0, 2.0, 3.0, 1.0, 4.0, 5.0, 6.0, 1.0]
        );
    }

    #[test]
    fn test_bad_magic() {
        let mut decoder = RadianceDecoder::new(b"#?NOTRADIANCE\n");

        assert!(matches!(decoder.decode(), Err(TextureErrors::DecodeErrors(_))));
    }
}
