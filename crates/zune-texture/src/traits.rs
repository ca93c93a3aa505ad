/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Traits implemented by decoders and image operations
use log::trace;

use crate::errors::TextureErrors;
use crate::format::PixelFormat;
use crate::image::ImageBuffer;

/// Encapsulates an image decoder.
///
/// All supported image decoders must implement this trait
pub trait DecoderTrait {
    /// Decode the buffer passed to the decoder on construction
    ///
    /// # Errors
    ///  - Any image decoding errors will be propagated to the caller.
    fn decode(&mut self) -> Result<ImageBuffer, TextureErrors>;

    /// Get width and height of the image
    ///
    /// # Returns
    /// - Some(width,height)
    /// - None -> If the image hasn't been decoded yet
    fn dimensions(&self) -> Option<(usize, usize)>;

    /// Get the name of the decoder
    fn name(&self) -> &'static str;
}

/// This encapsulates an image operation.
///
/// Operations never modify their input, they produce a new image
/// leaving the source untouched.
pub trait OperationsTrait {
    /// Get the name of this operation
    fn name(&self) -> &'static str;

    /// Formats this operation accepts as input
    fn supported_formats(&self) -> &'static [PixelFormat];

    /// Execute the operation without checking the input format
    ///
    /// Prefer [`execute`](OperationsTrait::execute) which validates the input
    /// and the result.
    ///
    /// # Errors
    /// Any operation error
    fn execute_impl(&self, image: &ImageBuffer) -> Result<ImageBuffer, TextureErrors>;

    /// Execute the operation on an image, producing a new image
    ///
    /// # Errors
    ///  - [`TextureErrors::UnsupportedOperation`] if the image format is not
    ///  one of [`supported_formats`](OperationsTrait::supported_formats)
    ///  - Any error raised by the operation
    fn execute(&self, image: &ImageBuffer) -> Result<ImageBuffer, TextureErrors> {
        if !self.supported_formats().contains(&image.format()) {
            return Err(TextureErrors::UnsupportedOperation(
                self.name(),
                image.format()
            ));
        }
        let result = self.execute_impl(image)?;
        // every stage hands out an image satisfying its size invariant
        result.validate()?;

        trace!(
            "{} produced {}x{} {} image with {} level(s), {} bytes",
            self.name(),
            result.width(),
            result.height(),
            result.format().name(),
            result.mip_levels(),
            result.data().len()
        );
        Ok(result)
    }
}
