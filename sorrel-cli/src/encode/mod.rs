// Copyright (c) 2026, the sorrel developers
// Licensed under the MIT License

use std::sync::Mutex;

use clap::Args;
use kdam::TqdmParallelIterator;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use sorrel_core::constant;
use sorrel_core::cv::{ResizeFilter, encode_mask};
use sorrel_core::error::SorrelError;
use sorrel_core::im::{ColorMap, SorrelImage};
use sorrel_core::ut;

#[derive(Debug, Args)]
#[command(about = "One-hot encode RGB masks against a class definition table.")]
pub struct EncodeArgs {
    #[arg(short = 'm', long, help = "Mask directory.", required = true)]
    pub masks: Option<String>,

    #[arg(
        short = 'c',
        long,
        help = "Class definition table (.csv, .tsv, .txt, .json). Defaults to the built-in CamVid schema."
    )]
    pub classes: Option<String>,

    #[arg(short = 'o', long, help = "Output directory.", required = true)]
    pub output: Option<String>,

    #[arg(
        long,
        help = "Resize masks to this width before encoding (nearest-neighbor)."
    )]
    pub width: Option<u32>,

    #[arg(
        long,
        help = "Resize masks to this height before encoding (nearest-neighbor)."
    )]
    pub height: Option<u32>,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn encode(args: &EncodeArgs) {
    if let Some(threads) = args.threads.to_owned() {
        if threads < 1 {
            eprintln!("[sorrel::encode] Threads must be set to a positive integer if provided.");
            std::process::exit(1);
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .unwrap();
    }

    let target_size = match (args.width, args.height) {
        (Some(width), Some(height)) => Some((width, height)),
        (None, None) => None,
        _ => {
            eprintln!("[sorrel::encode] ERROR: Width and height must be provided together.");
            std::process::exit(1);
        }
    };

    let colormap = match args.classes.to_owned() {
        Some(classes) => ColorMap::open(classes).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        }),
        None => ColorMap::camvid(),
    };

    let mask_files = ut::path::collect_file_paths(
        args.masks.to_owned().unwrap(),
        constant::IMAGE_DYNAMIC_FORMATS.as_slice(),
    )
    .unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    if mask_files.is_empty() {
        eprintln!("[sorrel::encode] ERROR: No mask files were detected. Please check your path.");
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
            "Encoding {} masks against {} classes.",
            ut::track::thousands_format(mask_files.len()),
            colormap.len()
        ),
        args.verbose,
    );

    let pb = ut::track::progress_bar(mask_files.len(), "Encoding", args.verbose);

    let failure: Mutex<Vec<String>> = Mutex::new(vec![]);

    (0..mask_files.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .for_each(|idx| {
            let mask_path = &mask_files[idx];
            let stem = mask_path.file_stem().unwrap().to_string_lossy().to_string();
            let output_path = output.join(format!("{}.npy", stem));

            if let Err(err) = encode_one(mask_path, &output_path, &colormap, target_size) {
                failure
                    .lock()
                    .unwrap()
                    .push(format!("{}\t{}", mask_path.display(), err));
            }
        });

    let failure = failure.into_inner().unwrap();

    if args.verbose {
        println!();
    }

    ut::track::progress_log(
        &format!(
            "Complete. {} masks encoded, {} failed.",
            ut::track::thousands_format(mask_files.len() - failure.len()),
            failure.len()
        ),
        args.verbose,
    );

    if !failure.is_empty() {
        std::fs::write(output.join("encode_errors.tsv"), failure.join("\n")).unwrap();
    }
}

fn encode_one(
    mask_path: &std::path::Path,
    output_path: &std::path::Path,
    colormap: &ColorMap,
    target_size: Option<(u32, u32)>,
) -> Result<(), SorrelError> {
    let mut mask = SorrelImage::open(mask_path)?;

    if let Some((width, height)) = target_size {
        mask = mask.resize(width, height, ResizeFilter::Nearest)?;
    }

    let onehot = encode_mask(&mask, colormap)?;

    onehot.save(output_path)
}
