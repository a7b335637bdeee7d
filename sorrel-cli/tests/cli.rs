// Copyright (c) 2026, the sorrel developers
// Licensed under the MIT License

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

const MASK_PIXELS: [u8; 12] = [0, 0, 0, 128, 64, 128, 128, 64, 128, 0, 0, 0];

fn workspace(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("sorrel_{}", name));

    if root.exists() {
        std::fs::remove_dir_all(&root).unwrap();
    }

    std::fs::create_dir_all(&root).unwrap();
    root
}

fn write_class_table(root: &PathBuf) -> PathBuf {
    let table = root.join("classes.csv");
    std::fs::write(&table, "name,r,g,b\nVoid,0,0,0\nRoad,128,64,128\n").unwrap();
    table
}

fn write_mask(root: &PathBuf, name: &str) -> PathBuf {
    let masks = root.join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    let path = masks.join(name);
    image::RgbImage::from_raw(2, 2, MASK_PIXELS.to_vec())
        .unwrap()
        .save(&path)
        .unwrap();

    path
}

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("sorrel")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("encode"))
        .stdout(predicate::str::contains("decode"))
        .stdout(predicate::str::contains("overlay"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn test_encode_decode_round_trip() {
    let root = workspace("round_trip");
    let table = write_class_table(&root);
    write_mask(&root, "0001_L.png");

    let encoded = root.join("encoded");
    let decoded = root.join("decoded");

    Command::cargo_bin("sorrel")
        .unwrap()
        .args([
            "encode",
            "-m",
            root.join("masks").to_str().unwrap(),
            "-c",
            table.to_str().unwrap(),
            "-o",
            encoded.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert!(encoded.join("0001_L.npy").exists());

    Command::cargo_bin("sorrel")
        .unwrap()
        .args([
            "decode",
            "-i",
            encoded.to_str().unwrap(),
            "-c",
            table.to_str().unwrap(),
            "-o",
            decoded.to_str().unwrap(),
        ])
        .assert()
        .success();

    let round_trip = image::open(decoded.join("0001_L.png")).unwrap().to_rgb8();
    assert_eq!(round_trip.into_raw(), MASK_PIXELS.to_vec());

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_overlay_writes_blended_image() {
    let root = workspace("overlay");
    let table = write_class_table(&root);
    write_mask(&root, "0001_L.png");

    let images = root.join("images");
    std::fs::create_dir_all(&images).unwrap();
    image::RgbImage::from_raw(2, 2, vec![100u8; 12])
        .unwrap()
        .save(images.join("0001.png"))
        .unwrap();

    let output = root.join("overlays");

    Command::cargo_bin("sorrel")
        .unwrap()
        .args([
            "overlay",
            "-i",
            images.to_str().unwrap(),
            "-m",
            root.join("masks").to_str().unwrap(),
            "-c",
            table.to_str().unwrap(),
            "-a",
            "0.5",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let blended = image::open(output.join("0001_overlay.png"))
        .unwrap()
        .to_rgb8();

    // Pixel (0, 1) blends (100, 100, 100) with half of (128, 64, 128)
    assert_eq!(blended.get_pixel(1, 0).0, [164, 132, 164]);

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_stats_writes_class_table() {
    let root = workspace("stats");
    let table = write_class_table(&root);
    write_mask(&root, "0001_L.png");

    let output = root.join("counts.csv");

    Command::cargo_bin("sorrel")
        .unwrap()
        .args([
            "stats",
            "-m",
            root.join("masks").to_str().unwrap(),
            "-c",
            table.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();

    assert!(written.contains("Void"));
    assert!(written.contains("Road"));
    assert!(written.contains("Unlabelled"));

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_encode_does_not_clobber_existing_output() {
    let root = workspace("no_clobber");
    let table = write_class_table(&root);
    write_mask(&root, "0001_L.png");

    let encoded = root.join("encoded");

    for _ in 0..2 {
        Command::cargo_bin("sorrel")
            .unwrap()
            .args([
                "encode",
                "-m",
                root.join("masks").to_str().unwrap(),
                "-c",
                table.to_str().unwrap(),
                "-o",
                encoded.to_str().unwrap(),
            ])
            .assert()
            .success();
    }

    // The second run lands in an incremented directory, leaving the first intact
    assert!(encoded.join("0001_L.npy").exists());
    assert!(root.join("encoded_0").join("0001_L.npy").exists());

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_encode_missing_directory_fails() {
    Command::cargo_bin("sorrel")
        .unwrap()
        .args(["encode", "-m", "NO_SUCH_DIRECTORY", "-o", "NO_SUCH_OUTPUT"])
        .assert()
        .failure();
}

#[test]
fn test_stats_invalid_extension_fails() {
    let root = workspace("stats_invalid");
    write_mask(&root, "0001_L.png");

    Command::cargo_bin("sorrel")
        .unwrap()
        .args([
            "stats",
            "-m",
            root.join("masks").to_str().unwrap(),
            "-o",
            root.join("counts.xyz").to_str().unwrap(),
        ])
        .assert()
        .failure();

    std::fs::remove_dir_all(&root).unwrap();
}
