/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! GPU texture preparation
//!
//! This crate takes raster and high dynamic range images and turns them into
//! textures a renderer can upload
//!
//! # Stages
//! - Decoding: PNG, JPEG, BMP, PPM and QOI via `zune-image`, Radiance HDR via
//! `zune-hdr`, OpenEXR via `exr` and portable float maps, see [`codecs`].
//! - Conversion between pixel formats, see [`convert`].
//! - Mip chain generation, see [`mipmap`].
//! - BC6H compression of half float images, see [`compress`].
//! - Upload through a renderer supplied [`gpu::GpuResourceLayer`].
//!
//! [`pipeline::prepare_texture`] chains the stages according to
//! [`TextureOptions`].
//!
//! # Features
//! - `bc6h`: BC6H encoding through the `block_compression` crate,
//!  enabled by default.
//! - `log`: forward logging to the zune decoders, enabled by default.
//! - `serde-support`: serialize formats and options.
//!
//! # Example
//! ```no_run
//! use zune_texture::codecs::load_from_file;
//! use zune_texture::compress::IspcBc6hEncoder;
//! use zune_texture::pipeline::prepare_texture;
//! use zune_texture::TextureOptions;
//!
//! let options = TextureOptions::default();
//! let image = load_from_file("sky.hdr", &options).unwrap();
//! let texture =
//!     prepare_texture(image, &options, IspcBc6hEncoder::new(options.get_quality())).unwrap();
//! ```
#![forbid(unsafe_code)]

pub use errors::TextureErrors;
pub use format::{Channel, PixelFormat};
pub use image::{ImageBuffer, MipLevel};
pub use options::{CompressionQuality, TextureOptions};

pub mod codecs;
pub mod compress;
pub mod convert;
pub mod errors;
pub mod format;
pub mod gpu;
pub mod half;
pub mod image;
pub mod mipmap;
pub mod options;
pub mod pipeline;
mod serde;
mod tests;
pub mod tiler;
pub mod traits;
