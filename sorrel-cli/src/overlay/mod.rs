// Copyright (c) 2026, the sorrel developers
// Licensed under the MIT License

use std::sync::Mutex;

use clap::Args;
use kdam::TqdmParallelIterator;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use sorrel_core::constant;
use sorrel_core::cv::{ResizeFilter, blend, decode_mask};
use sorrel_core::error::SorrelError;
use sorrel_core::im::{ColorMap, OneHotMask, SorrelImage};
use sorrel_core::ut;

#[derive(Debug, Args)]
#[command(about = "Blend masks over their images for visual inspection.")]
pub struct OverlayArgs {
    #[arg(short = 'i', long, help = "Image directory.", required = true)]
    pub images: Option<String>,

    #[arg(
        short = 'm',
        long,
        help = "Mask directory. RGB mask images or (H, W, K) .npy tensors.",
        required = true
    )]
    pub masks: Option<String>,

    #[arg(
        short = 'c',
        long,
        help = "Class definition table, used when masks are .npy tensors. Defaults to the built-in CamVid schema."
    )]
    pub classes: Option<String>,

    #[arg(
        short = 'a',
        long,
        help = "Mask weight between 0 and 1.",
        default_value = "0.7"
    )]
    pub alpha: Option<f32>,

    #[arg(short = 'o', long, help = "Output directory.", required = true)]
    pub output: Option<String>,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn overlay(args: &OverlayArgs) {
    if let Some(threads) = args.threads.to_owned() {
        if threads < 1 {
            eprintln!("[sorrel::overlay] Threads must be set to a positive integer if provided.");
            std::process::exit(1);
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .unwrap();
    }

    let alpha = args.alpha.unwrap_or(constant::DEFAULT_OVERLAY_ALPHA);

    if !(0.0..=1.0).contains(&alpha) {
        eprintln!("[sorrel::overlay] ERROR: Alpha must be between 0 and 1.");
        std::process::exit(1);
    }

    let colormap = match args.classes.to_owned() {
        Some(classes) => ColorMap::open(classes).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        }),
        None => ColorMap::camvid(),
    };

    let image_files = ut::path::collect_file_paths(
        args.images.to_owned().unwrap(),
        constant::IMAGE_DYNAMIC_FORMATS.as_slice(),
    )
    .unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    let mask_files = ut::path::collect_file_paths(
        args.masks.to_owned().unwrap(),
        constant::SUPPORTED_IMAGE_FORMATS.as_slice(),
    )
    .unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    if image_files.is_empty() {
        eprintln!("[sorrel::overlay] ERROR: No image files were detected. Please check your path.");
        std::process::exit(1);
    }

    // Both listings are sorted, so files pair by position
    if image_files.len() != mask_files.len() {
        eprintln!(
            "[sorrel::overlay] ERROR: Found {} images but {} masks. Directories must pair one-to-one.",
            image_files.len(),
            mask_files.len()
        );
        std::process::exit(1);
    }

    let output = ut::path::create_directory(args.output.to_owned().unwrap()).unwrap_or_else(
        |err| {
            eprintln!("{}", err);
            std::process::exit(1);
        },
    );

    ut::track::progress_log(
        &format!(
            "Blending {} image and mask pairs.",
            ut::track::thousands_format(image_files.len())
        ),
        args.verbose,
    );

    let pb = ut::track::progress_bar(image_files.len(), "Blending", args.verbose);

    let failure: Mutex<Vec<String>> = Mutex::new(vec![]);

    (0..image_files.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .for_each(|idx| {
            let image_path = &image_files[idx];
            let mask_path = &mask_files[idx];

            let stem = image_path
                .file_stem()
                .unwrap()
                .to_string_lossy()
                .to_string();
            let output_path = output.join(format!("{}_overlay.png", stem));

            if let Err(err) = overlay_one(image_path, mask_path, &output_path, &colormap, alpha) {
                failure
                    .lock()
                    .unwrap()
                    .push(format!("{}\t{}", image_path.display(), err));
            }
        });

    let failure = failure.into_inner().unwrap();

    if args.verbose {
        println!();
    }

    ut::track::progress_log(
        &format!(
            "Complete. {} overlays written, {} failed.",
            ut::track::thousands_format(image_files.len() - failure.len()),
            failure.len()
        ),
        args.verbose,
    );

    if !failure.is_empty() {
        std::fs::write(output.join("overlay_errors.tsv"), failure.join("\n")).unwrap();
    }
}

fn overlay_one(
    image_path: &std::path::Path,
    mask_path: &std::path::Path,
    output_path: &std::path::Path,
    colormap: &ColorMap,
    alpha: f32,
) -> Result<(), SorrelError> {
    let image = SorrelImage::open(image_path)?;

    let is_tensor = mask_path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
        == Some("npy");

    let mut mask = if is_tensor {
        let onehot = OneHotMask::open(mask_path)?;
        decode_mask(&onehot, colormap)?
    } else {
        SorrelImage::open(mask_path)?
    };

    if mask.shape() != image.shape() {
        mask = mask.resize(image.width(), image.height(), ResizeFilter::Nearest)?;
    }

    let blended = blend(&image, &mask, alpha)?;

    blended.save(output_path)
}
