// Copyright (c) 2026, the sorrel developers
// Licensed under the MIT License

use std::path::PathBuf;
use std::sync::Mutex;

use clap::Args;
use kdam::TqdmParallelIterator;
use polars::prelude::*;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use sorrel_core::constant;
use sorrel_core::im::{ColorMap, SorrelImage};
use sorrel_core::io;
use sorrel_core::ut;

#[derive(Debug, Args)]
#[command(about = "Tabulate per-class pixel counts across a mask directory.")]
pub struct StatsArgs {
    #[arg(short = 'm', long, help = "Mask directory.", required = true)]
    pub masks: Option<String>,

    #[arg(
        short = 'c',
        long,
        help = "Class definition table (.csv, .tsv, .txt, .json). Defaults to the built-in CamVid schema."
    )]
    pub classes: Option<String>,

    #[arg(
        short = 'o',
        long,
        help = "Output file (.csv, .txt, .tsv, .pq).",
        required = true
    )]
    pub output: Option<String>,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn stats(args: &StatsArgs) {
    if let Some(threads) = args.threads.to_owned() {
        if threads < 1 {
            eprintln!("[sorrel::stats] Threads must be set to a positive integer if provided.");
            std::process::exit(1);
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .unwrap();
    }

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
        eprintln!("[sorrel::stats] ERROR: No mask files were detected. Please check your path.");
        std::process::exit(1);
    }

    let output = PathBuf::from(args.output.to_owned().unwrap());

    let extension = output
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    match extension {
        Some(ext) if ["csv", "txt", "tsv", "pq", "parquet"].iter().any(|e| e == &ext) => {}
        _ => {
            eprintln!(
                "[sorrel::stats] ERROR: Invalid file extension. Must end with one of .csv, .txt, .tsv, .pq."
            );
            std::process::exit(1);
        }
    }

    if let Some(parent) = output.parent() {
        if !parent.is_dir() && parent.to_str().unwrap() != "" {
            eprintln!(
                "[sorrel::stats] ERROR: Invalid file path. Parent directory of output file path does not exist."
            );
            std::process::exit(1);
        }
    }

    ut::track::progress_log(
        &format!(
            "Counting class pixels across {} masks.",
            ut::track::thousands_format(mask_files.len())
        ),
        args.verbose,
    );

    let pb = ut::track::progress_bar(mask_files.len(), "Counting", args.verbose);

    // One slot per class plus a trailing slot for unlabelled pixels
    let slots = colormap.len() + 1;
    let failure: Mutex<Vec<String>> = Mutex::new(vec![]);

    let counts = (0..mask_files.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .map(|idx| {
            let mask_path = &mask_files[idx];
            let mut local = vec![0u64; slots];

            match SorrelImage::open(mask_path) {
                Ok(mask) => {
                    for pixel in mask.iter_pixels() {
                        let color = [pixel[0], pixel[1], pixel[2]];

                        match colormap.index_of(&color) {
                            Some(index) => local[index] += 1,
                            None => local[slots - 1] += 1,
                        }
                    }
                }
                Err(err) => {
                    failure
                        .lock()
                        .unwrap()
                        .push(format!("{}\t{}", mask_path.display(), err));
                }
            }

            local
        })
        .reduce(
            || vec![0u64; slots],
            |mut total, local| {
                for (t, l) in total.iter_mut().zip(local) {
                    *t += l;
                }
                total
            },
        );

    let failure = failure.into_inner().unwrap();

    if args.verbose {
        println!();
    }

    let total: u64 = counts.iter().sum();

    ut::track::progress_log(
        &format!(
            "Complete. {} pixels counted across {} masks ({} failed).",
            ut::track::thousands_format(total),
            ut::track::thousands_format(mask_files.len() - failure.len()),
            failure.len()
        ),
        args.verbose,
    );

    let mut names: Vec<String> = colormap.iter().map(|entry| entry.name.clone()).collect();
    names.push("Unlabelled".to_string());

    let frequency: Vec<f64> = counts
        .iter()
        .map(|&count| {
            if total > 0 {
                count as f64 / total as f64
            } else {
                0.0
            }
        })
        .collect();

    let mut df = DataFrame::new(vec![
        Column::new("class".into(), &names),
        Column::new("pixels".into(), &counts),
        Column::new("frequency".into(), &frequency),
    ])
    .unwrap();

    io::write_table(&mut df, &output).unwrap_or_else(|_| {
        eprintln!("[sorrel::stats] ERROR: Failed to write class statistics table.");
        std::process::exit(1);
    });

    if !failure.is_empty() {
        for line in &failure {
            eprintln!("[sorrel::stats] WARNING: Failed to read {}", line);
        }
    }
}
