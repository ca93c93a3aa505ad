/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during texture preparation
use core::fmt::{Debug, Display, Formatter};

use crate::format::PixelFormat;

/// All errors that may occur when decoding, converting
/// or compressing textures
pub enum TextureErrors {
    /// The source bytes are malformed or truncated, the external
    /// decoder refused them
    DecodeErrors(String),
    /// The input is structurally valid but outside what we handle,
    /// e.g multi-part EXR files or images with more than four channels
    UnsupportedFormat(String),
    /// An operation was invoked on an image whose format forbids it,
    /// contains the operation name and the image format
    UnsupportedOperation(&'static str, PixelFormat),
    /// Image data length does not match the length required by
    /// its dimensions and format (expected, found)
    LengthMismatch(usize, usize),
    /// Too large dimensions for a given dimension
    TooLargeDimensions(&'static str, usize, usize),
    IoErrors(std::io::Error)
}

impl Debug for TextureErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            TextureErrors::DecodeErrors(err) => {
                writeln!(f, "Could not decode image: {err}")
            }
            TextureErrors::UnsupportedFormat(err) => {
                writeln!(f, "Unsupported image: {err}")
            }
            TextureErrors::UnsupportedOperation(operation, format) => {
                writeln!(
                    f,
                    "Operation {operation} cannot be applied to an image in {} format",
                    format.name()
                )
            }
            TextureErrors::LengthMismatch(expected, found) => {
                writeln!(
                    f,
                    "Image data length mismatch, expected {expected} bytes but found {found}"
                )
            }
            TextureErrors::TooLargeDimensions(dimension, expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions for {dimension} , {found} exceeds {expected}"
                )
            }
            TextureErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err:?}")
            }
        }
    }
}

impl Display for TextureErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for TextureErrors {}

impl From<std::io::Error> for TextureErrors {
    fn from(value: std::io::Error) -> Self {
        TextureErrors::IoErrors(value)
    }
}

impl From<zune_image::errors::ImageErrors> for TextureErrors {
    fn from(value: zune_image::errors::ImageErrors) -> Self {
        TextureErrors::DecodeErrors(format!("{value:?}"))
    }
}

impl From<zune_hdr::HdrDecodeErrors> for TextureErrors {
    fn from(value: zune_hdr::HdrDecodeErrors) -> Self {
        TextureErrors::DecodeErrors(format!("{value:?}"))
    }
}

impl From<exr::error::Error> for TextureErrors {
    fn from(value: exr::error::Error) -> Self {
        TextureErrors::DecodeErrors(value.to_string())
    }
}
