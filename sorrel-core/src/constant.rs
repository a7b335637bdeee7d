// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

// All currently supported mask and image formats
pub const SUPPORTED_IMAGE_FORMATS: [&str; 18] = [
    "avif", "bmp", "dds", "hdr", "ico", "jpeg", "jpg", "exr", "png", "pbm", "pgm", "ppm", "qoi",
    "tga", "tif", "tiff", "webp", "npy",
];

// The currently supported common image formats
pub const IMAGE_DYNAMIC_FORMATS: [&str; 17] = [
    "avif", "bmp", "dds", "hdr", "ico", "jpeg", "jpg", "exr", "png", "pbm", "pgm", "ppm", "qoi",
    "tga", "tif", "tiff", "webp",
];

// The currently supported class definition table formats
pub const SUPPORTED_TABLE_FORMATS: [&str; 4] = ["csv", "tsv", "txt", "json"];

// Required columns for tabular class definition tables
pub const CLASS_TABLE_COLUMNS: [&str; 4] = ["name", "r", "g", "b"];

// Default weight applied to the mask layer when blending visualizations
pub const DEFAULT_OVERLAY_ALPHA: f32 = 0.7;

// Default (width, height) that paired datasets are resized to
pub const DEFAULT_TARGET_SIZE: (u32, u32) = (512, 512);

// The 32-class CamVid label schema. Row order defines class indices.
pub const CAMVID_CLASSES: [(&str, [u8; 3]); 32] = [
    ("Animal", [64, 128, 64]),
    ("Archway", [192, 0, 128]),
    ("Bicyclist", [0, 128, 192]),
    ("Bridge", [0, 128, 64]),
    ("Building", [128, 0, 0]),
    ("Car", [64, 0, 128]),
    ("CartLuggagePram", [64, 0, 192]),
    ("Child", [192, 128, 64]),
    ("Column_Pole", [192, 192, 128]),
    ("Fence", [64, 64, 128]),
    ("LaneMkgsDriv", [128, 0, 192]),
    ("LaneMkgsNonDriv", [192, 0, 64]),
    ("Misc_Text", [128, 128, 64]),
    ("MotorcycleScooter", [192, 0, 192]),
    ("OtherMoving", [128, 64, 64]),
    ("ParkingBlock", [64, 192, 128]),
    ("Pedestrian", [64, 64, 0]),
    ("Road", [128, 64, 128]),
    ("RoadShoulder", [128, 128, 192]),
    ("Sidewalk", [0, 0, 192]),
    ("SignSymbol", [192, 128, 128]),
    ("Sky", [128, 128, 128]),
    ("SUVPickupTruck", [64, 128, 192]),
    ("TrafficCone", [0, 0, 64]),
    ("TrafficLight", [0, 64, 64]),
    ("Train", [192, 64, 128]),
    ("Tree", [128, 128, 0]),
    ("Truck_Bus", [192, 128, 192]),
    ("Tunnel", [64, 0, 64]),
    ("VegetationMisc", [192, 192, 0]),
    ("Void", [0, 0, 0]),
    ("Wall", [64, 192, 0]),
];
