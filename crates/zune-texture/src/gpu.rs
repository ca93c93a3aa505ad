/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Handing images to a GPU
//!
//! The library does not talk to a graphics API itself, renderers implement
//! [`GpuResourceLayer`] and [`upload_image`] drives it.
//!
//! An upload allocates one image with all mip levels, moves it to
//! [`ImageLayout::TransferDst`], sends the bytes and finally moves it to
//! [`ImageLayout::ShaderReadOnly`]. Data only ever flows to the layer,
//! nothing is read back.
use bitflags::bitflags;
use log::trace;

use crate::errors::TextureErrors;
use crate::format::PixelFormat;
use crate::image::ImageBuffer;

bitflags! {
    /// How a device image will be used
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct ImageUsage: u32 {
        /// The image can be sampled from shaders
        const SAMPLED      = 0b0001;
        /// The image can be the destination of a copy
        const TRANSFER_DST = 0b0010;
        /// The image can be the source of a copy
        const TRANSFER_SRC = 0b0100;
    }
}

/// Memory layout of a device image
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImageLayout {
    /// Freshly allocated, contents undefined
    Undefined,
    /// Ready to receive copies
    TransferDst,
    /// Ready to be sampled by shaders
    ShaderReadOnly
}

/// Everything a layer needs to allocate a device image
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ImageDescriptor {
    pub width:      u32,
    pub height:     u32,
    pub format:     PixelFormat,
    pub mip_levels: u32,
    pub usage:      ImageUsage
}

impl ImageDescriptor {
    /// Describe a sampled texture holding every level of `image`
    pub fn for_image(image: &ImageBuffer) -> ImageDescriptor {
        ImageDescriptor {
            width:      image.width(),
            height:     image.height(),
            format:     image.format(),
            mip_levels: image.mip_levels(),
            usage:      ImageUsage::SAMPLED | ImageUsage::TRANSFER_DST | ImageUsage::TRANSFER_SRC
        }
    }
}

/// A device side consumer of images
pub trait GpuResourceLayer {
    /// Handle to an allocated device image
    type Image;

    /// Allocate a device image
    ///
    /// # Errors
    /// Layer specific, e.g. the device ran out of memory
    fn create_image(&mut self, descriptor: &ImageDescriptor) -> Result<Self::Image, TextureErrors>;

    /// Move `mip_levels` levels of `image` from one layout to another
    ///
    /// # Errors
    /// Layer specific
    fn transition_layout(
        &mut self, image: &Self::Image, from: ImageLayout, to: ImageLayout, mip_levels: u32
    ) -> Result<(), TextureErrors>;

    /// Copy `bytes` into mip level `level` of `image`
    ///
    /// # Errors
    /// Layer specific
    fn send(
        &mut self, image: &Self::Image, width: usize, height: usize, bytes: &[u8],
        target_layout: ImageLayout, level: u32
    ) -> Result<(), TextureErrors>;
}

/// Upload `image` and all of its mip levels through `layer`
///
/// Uncompressed images are sent one level at a time, compressed images
/// are sent as a single stream at level 0.
///
/// # Errors
/// Any error the layer reports
pub fn upload_image<L: GpuResourceLayer>(
    layer: &mut L, image: &ImageBuffer
) -> Result<L::Image, TextureErrors> {
    let descriptor = ImageDescriptor::for_image(image);
    let device_image = layer.create_image(&descriptor)?;

    layer.transition_layout(
        &device_image,
        ImageLayout::Undefined,
        ImageLayout::TransferDst,
        descriptor.mip_levels
    )?;

    if image.is_compressed() {
        let (width, height) = image.dimensions();

        trace!(
            "Sending {} bytes of {} data",
            image.data().len(),
            image.format().name()
        );
        layer.send(&device_image, width, height, image.data(), ImageLayout::TransferDst, 0)?;
    } else {
        for level in image.levels() {
            trace!(
                "Sending level {} ({}x{}, {} bytes)",
                level.level,
                level.width,
                level.height,
                level.data.len()
            );
            layer.send(
                &device_image,
                level.width,
                level.height,
                level.data,
                ImageLayout::TransferDst,
                level.level
            )?;
        }
    }

    layer.transition_layout(
        &device_image,
        ImageLayout::TransferDst,
        ImageLayout::ShaderReadOnly,
        descriptor.mip_levels
    )?;

    Ok(device_image)
}
