/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::time::Instant;

use clap::ArgMatches;
use log::{info, warn};
use zune_texture::codecs::load_from_file;
use zune_texture::compress::{is_signed, IspcBc6hEncoder};
use zune_texture::pipeline::{prepare_texture, PreparedTexture};
use zune_texture::{ImageBuffer, PixelFormat, TextureErrors, TextureOptions};

/// The ispc encoder only has an unsigned mode, refuse images it
/// would fail on before any work is done
fn check_encoder_input(image: &ImageBuffer, options: &TextureOptions) -> Result<(), TextureErrors> {
    if !options.get_compress_hdr() || image.format() != PixelFormat::RGBAF16 {
        return Ok(());
    }
    let signed = image.to_vec_of::<u16>().is_some_and(|x| is_signed(&x));

    if signed {
        return Err(TextureErrors::UnsupportedFormat(
            "Image has negative values (or -0.0) and the ispc BC6H encoder has no signed mode, \
             pass --no-compress to keep it as half floats"
                .to_string()
        ));
    }
    Ok(())
}

pub(crate) fn create_and_exec_workflow_from_cmd(
    args: &ArgMatches, options: &TextureOptions
) -> Result<(), TextureErrors> {
    info!("Creating workflows from input");

    let (Some(in_file), Some(out_file)) =
        (args.get_one::<String>("in"), args.get_one::<String>("out"))
    else {
        warn!("Input and output files are both required");
        return Ok(());
    };
    let start = Instant::now();

    let image = load_from_file(in_file, options)?;
    check_encoder_input(&image, options)?;

    let encoder = IspcBc6hEncoder::new(options.get_quality());
    let texture = prepare_texture(image, options, encoder)?;

    if let PreparedTexture::Compressed { fallback, .. } = &texture {
        info!(
            "Compressed texture, {} byte RGBAF32 fallback is not written",
            fallback.data().len()
        );
    }
    let image = texture.image();

    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(out_file)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(image.data())?;
    writer.flush()?;

    info!(
        "Wrote {}x{} {} texture with {} level(s), {} bytes to {out_file}",
        image.width(),
        image.height(),
        image.format().name(),
        image.mip_levels(),
        image.data().len()
    );
    info!("Finished in {} ms", start.elapsed().as_millis());

    Ok(())
}
