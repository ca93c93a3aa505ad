/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Splitting half float images into 4x4 blocks for the block encoder
//!
//! Blocks are handed to the encoder in batches of [`BATCH_SIZE`] horizontally
//! adjacent blocks. Batches march across a block row `4 * BATCH_SIZE` pixels at
//! a time, then move down by 4 rows, so concatenating the encoder output of
//! every batch yields blocks in left to right, top to bottom order.
//!
//! Every pixel read is clamped to the image, blocks hanging over the right
//! or bottom edge replicate the last column/row.
use crate::format::BLOCK_DIMENSION;

/// Number of blocks the encoder consumes per call
pub const BATCH_SIZE: usize = 8;

/// A 4x4 block of RGBA half float pixels in row major order
pub type PixelBlock = [[u16; 4]; BLOCK_DIMENSION * BLOCK_DIMENSION];

/// A block where every channel is zero, used to pad partial batches
pub const EMPTY_BLOCK: PixelBlock = [[0; 4]; BLOCK_DIMENSION * BLOCK_DIMENSION];

/// Read the pixel at `(x, y)` with coordinates clamped to the image
///
/// `pixels` holds `width * height` RGBA half pixels, reads past the
/// end of a short buffer produce zeros.
fn read_pixel(x: usize, y: usize, width: usize, height: usize, pixels: &[u16]) -> [u16; 4] {
    let x = x.min(width.saturating_sub(1));
    let y = y.min(height.saturating_sub(1));

    let offset = (y * width + x) * 4;

    match pixels.get(offset..offset + 4) {
        Some(&[r, g, b, a]) => [r, g, b, a],
        _ => [0; 4]
    }
}

/// Read the 4x4 block whose top left corner is `(x, y)`
///
/// Each of the 16 positions is clamped independently to
/// `[0, width-1] x [0, height-1]`.
pub fn read_block(x: usize, y: usize, width: usize, height: usize, pixels: &[u16]) -> PixelBlock {
    let mut block = EMPTY_BLOCK;

    for (i, pixel) in block.iter_mut().enumerate() {
        let px = x + i % BLOCK_DIMENSION;
        let py = y + i / BLOCK_DIMENSION;

        *pixel = read_pixel(px, py, width, height, pixels);
    }
    block
}

/// A group of up to [`BATCH_SIZE`] blocks on the same block row
#[derive(Clone, Debug)]
pub struct BlockBatch {
    /// Pixel column of the first block
    pub x:      usize,
    /// Pixel row of the first block
    pub y:      usize,
    /// Blocks of this batch, entries past `count` are padding
    pub blocks: [PixelBlock; BATCH_SIZE],
    /// Number of blocks that lie inside the image
    pub count:  usize
}

/// Iterator over the batches of a single image level
///
/// Created by [`batches`]
pub struct BlockBatches<'a> {
    pixels: &'a [u16],
    width:  usize,
    height: usize,
    x:      usize,
    y:      usize
}

/// Split a `width` x `height` RGBA half image into encoder batches
pub fn batches(width: usize, height: usize, pixels: &[u16]) -> BlockBatches<'_> {
    BlockBatches {
        pixels,
        width,
        height,
        x: 0,
        y: 0
    }
}

impl Iterator for BlockBatches<'_> {
    type Item = BlockBatch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.x >= self.width {
            self.x = 0;
            self.y += BLOCK_DIMENSION;
        }
        if self.y >= self.height || self.width == 0 {
            return None;
        }
        let mut blocks = [EMPTY_BLOCK; BATCH_SIZE];
        let mut count = 0;

        for (i, block) in blocks.iter_mut().enumerate() {
            let block_x = self.x + BLOCK_DIMENSION * i;

            if block_x >= self.width {
                break;
            }
            *block = read_block(block_x, self.y, self.width, self.height, self.pixels);
            count += 1;
        }
        let batch = BlockBatch {
            x: self.x,
            y: self.y,
            blocks,
            count
        };
        self.x += BLOCK_DIMENSION * BATCH_SIZE;

        Some(batch)
    }
}
