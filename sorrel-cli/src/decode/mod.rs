// Copyright (c) 2026, the sorrel developers
// Licensed under the MIT License

use std::sync::Mutex;

use clap::Args;
use kdam::TqdmParallelIterator;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use sorrel_core::constant;
use sorrel_core::cv::decode_mask;
use sorrel_core::error::SorrelError;
use sorrel_core::im::{ColorMap, OneHotMask};
use sorrel_core::ut;

#[derive(Debug, Args)]
#[command(about = "Decode one-hot or probability tensors back to RGB masks.")]
pub struct DecodeArgs {
    #[arg(
        short = 'i',
        long,
        help = "Directory of (H, W, K) .npy tensors.",
        required = true
    )]
    pub inputs: Option<String>,

    #[arg(
        short = 'c',
        long,
        help = "Class definition table (.csv, .tsv, .txt, .json). Defaults to the built-in CamVid schema."
    )]
    pub classes: Option<String>,

    #[arg(short = 'o', long, help = "Output directory.", required = true)]
    pub output: Option<String>,

    #[arg(
        short = 'f',
        long,
        help = "Output image format (e.g. png, bmp, tiff).",
        default_value = "png"
    )]
    pub format: Option<String>,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn decode(args: &DecodeArgs) {
    if let Some(threads) = args.threads.to_owned() {
        if threads < 1 {
            eprintln!("[sorrel::decode] Threads must be set to a positive integer if provided.");
            std::process::exit(1);
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .unwrap();
    }

    let format = args.format.to_owned().unwrap_or("png".to_string());

    if !constant::IMAGE_DYNAMIC_FORMATS.iter().any(|e| e == &format) {
        eprintln!(
            "[sorrel::decode] ERROR: Invalid output format. Must be one of: {}.",
            constant::IMAGE_DYNAMIC_FORMATS.join(", ")
        );
        std::process::exit(1);
    }

    let colormap = match args.classes.to_owned() {
        Some(classes) => ColorMap::open(classes).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        }),
        None => ColorMap::camvid(),
    };

    let tensor_files = ut::path::collect_file_paths(args.inputs.to_owned().unwrap(), &["npy"])
        .unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        });

    if tensor_files.is_empty() {
        eprintln!("[sorrel::decode] ERROR: No .npy tensors were detected. Please check your path.");
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
            "Decoding {} tensors against {} classes.",
            ut::track::thousands_format(tensor_files.len()),
            colormap.len()
        ),
        args.verbose,
    );

    let pb = ut::track::progress_bar(tensor_files.len(), "Decoding", args.verbose);

    let failure: Mutex<Vec<String>> = Mutex::new(vec![]);

    (0..tensor_files.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .for_each(|idx| {
            let tensor_path = &tensor_files[idx];
            let stem = tensor_path
                .file_stem()
                .unwrap()
                .to_string_lossy()
                .to_string();
            let output_path = output.join(format!("{}.{}", stem, format));

            if let Err(err) = decode_one(tensor_path, &output_path, &colormap) {
                failure
                    .lock()
                    .unwrap()
                    .push(format!("{}\t{}", tensor_path.display(), err));
            }
        });

    let failure = failure.into_inner().unwrap();

    if args.verbose {
        println!();
    }

    ut::track::progress_log(
        &format!(
            "Complete. {} tensors decoded, {} failed.",
            ut::track::thousands_format(tensor_files.len() - failure.len()),
            failure.len()
        ),
        args.verbose,
    );

    if !failure.is_empty() {
        std::fs::write(output.join("decode_errors.tsv"), failure.join("\n")).unwrap();
    }
}

fn decode_one(
    tensor_path: &std::path::Path,
    output_path: &std::path::Path,
    colormap: &ColorMap,
) -> Result<(), SorrelError> {
    let onehot = OneHotMask::open(tensor_path)?;
    let mask = decode_mask(&onehot, colormap)?;

    mask.save(output_path)
}
