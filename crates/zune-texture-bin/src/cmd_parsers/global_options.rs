/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use log::{info, Level};
use zune_texture::TextureOptions;

use crate::cmd_args::{IPixelFormat, IQuality};

/// Build texture options from the command line
pub fn parse_options(options: &ArgMatches) -> TextureOptions {
    let mut texture_options = TextureOptions::default()
        .set_strict_mode(options.get_flag("strict"))
        .set_generate_mipmaps(!options.get_flag("no-mipmaps"))
        .set_compress_hdr(!options.get_flag("no-compress"));

    if let Some(width) = options.get_one::<usize>("max-width") {
        texture_options = texture_options.set_max_width(*width);
    }
    if let Some(height) = options.get_one::<usize>("max-height") {
        texture_options = texture_options.set_max_height(*height);
    }
    if let Some(format) = options.get_one::<IPixelFormat>("format") {
        info!("Converting 8 bit images to {:?}", format);
        texture_options = texture_options.set_target_format(Some(format.to_pixel_format()));
    }
    if let Some(quality) = options.get_one::<IQuality>("quality") {
        info!("Setting BC6H quality to {}", quality.0.name());
        texture_options = texture_options.set_quality(quality.0);
    }
    texture_options
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level = if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("warn") {
        Level::Warn
    } else if options.get_flag("info") {
        Level::Info
    } else {
        Level::Warn
    };

    if let Err(err) = simple_logger::init_with_level(log_level) {
        eprintln!("Could not initialize logger: {err}");
        return;
    }

    info!("Initialized logger");
    info!("Log level :{}", log_level);
}
