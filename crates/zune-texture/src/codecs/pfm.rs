/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Portable float map decoding
//!
//! `PF` files carry RGB and `Pf` files carry grayscale 32 bit floats.
//! Rows are stored bottom to top and the sign of the scale header picks
//! the byte order, negative for little endian.
//!
//! Decoded images are `RGBAF32`, grayscale is replicated into the
//! color channels and an opaque alpha is inserted.
use log::trace;
use zune_core::options::DecoderOptions;

use crate::codecs::checked_dimensions;
use crate::codecs::radiance::rgb_to_rgba;
use crate::errors::TextureErrors;
use crate::image::ImageBuffer;
use crate::traits::DecoderTrait;

/// Decoder for `.pfm` images
pub struct FloatMapDecoder<'a> {
    data:       &'a [u8],
    position:   usize,
    options:    DecoderOptions,
    dimensions: Option<(usize, usize)>
}

impl<'a> FloatMapDecoder<'a> {
    pub fn new(data: &'a [u8]) -> FloatMapDecoder<'a> {
        Self::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> FloatMapDecoder<'a> {
        FloatMapDecoder {
            data,
            position: 0,
            options,
            dimensions: None
        }
    }

    fn skip_spaces(&mut self) {
        while self
            .data
            .get(self.position)
            .is_some_and(u8::is_ascii_whitespace)
        {
            self.position += 1;
        }
    }

    /// Read the next whitespace delimited header value
    fn token(&mut self, name: &'static str) -> Result<&'a str, TextureErrors> {
        self.skip_spaces();

        let data = self.data;
        let start = self.position;

        while data
            .get(self.position)
            .is_some_and(|x| !x.is_ascii_whitespace())
        {
            self.position += 1;
        }
        let token = &data[start..self.position];

        if token.is_empty() {
            return Err(TextureErrors::DecodeErrors(format!(
                "No PFM {name} found, header ended early"
            )));
        }
        core::str::from_utf8(token)
            .map_err(|_| TextureErrors::DecodeErrors(format!("PFM {name} is not valid text")))
    }

    fn dimension(&mut self, name: &'static str, limit: usize) -> Result<usize, TextureErrors> {
        let token = self.token(name)?;
        let value = token.parse::<usize>().map_err(|_| {
            TextureErrors::DecodeErrors(format!("Invalid PFM {name} `{token}`"))
        })?;

        if value == 0 {
            return Err(TextureErrors::DecodeErrors(format!("PFM {name} is zero")));
        }
        if value > limit {
            return Err(TextureErrors::TooLargeDimensions(name, limit, value));
        }
        Ok(value)
    }
}

fn sample_to_f32(bytes: &[u8], little_endian: bool) -> f32 {
    let bytes = [bytes[0], bytes[1], bytes[2], bytes[3]];

    if little_endian {
        f32::from_le_bytes(bytes)
    } else {
        f32::from_be_bytes(bytes)
    }
}

impl DecoderTrait for FloatMapDecoder<'_> {
    fn decode(&mut self) -> Result<ImageBuffer, TextureErrors> {
        let channels = match self.data.get(..2) {
            Some(b"PF") => 3,
            Some(b"Pf") => 1,
            _ => {
                return Err(TextureErrors::DecodeErrors(
                    "Expected PF or Pf as the first PFM bytes".to_string()
                ))
            }
        };
        self.position = 2;

        let width = self.dimension("width", self.options.max_width())?;
        let height = self.dimension("height", self.options.max_height())?;

        let scale_token = self.token("scale")?;
        let scale = scale_token.parse::<f32>().map_err(|_| {
            TextureErrors::DecodeErrors(format!("Invalid PFM scale `{scale_token}`"))
        })?;

        if scale == 0.0 || !scale.is_finite() {
            return Err(TextureErrors::DecodeErrors(format!(
                "PFM scale {scale} does not give a byte order"
            )));
        }
        let little_endian = scale < 0.0;
        // exactly one whitespace byte ends the header
        self.position += 1;

        let row_size = width
            .checked_mul(channels * 4)
            .ok_or(TextureErrors::TooLargeDimensions("width", usize::MAX, width))?;
        let size = row_size
            .checked_mul(height)
            .ok_or(TextureErrors::TooLargeDimensions("height", usize::MAX, height))?;

        let raster = self
            .data
            .get(self.position..)
            .and_then(|x| x.get(..size))
            .ok_or_else(|| {
                TextureErrors::DecodeErrors(format!(
                    "PFM data is truncated, expected {size} bytes of samples"
                ))
            })?;

        trace!("PFM width: {width}, height: {height}, channels: {channels}");
        trace!("PFM little endian: {little_endian}");

        self.dimensions = Some((width, height));

        // bottom row first
        let samples: Vec<f32> = raster
            .chunks_exact(row_size)
            .rev()
            .flat_map(|row| row.chunks_exact(4))
            .map(|x| sample_to_f32(x, little_endian))
            .collect();

        let pixels = if channels == 3 {
            rgb_to_rgba(&samples)
        } else {
            samples.iter().flat_map(|&v| [v, v, v, 1.0]).collect()
        };
        let (width, height) = checked_dimensions(width, height)?;

        ImageBuffer::from_f32(width, height, &pixels)
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        self.dimensions
    }

    fn name(&self) -> &'static str {
        "pfm"
    }
}
