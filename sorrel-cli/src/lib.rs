// Copyright (c) 2026, the sorrel developers
// Licensed under the MIT License

pub mod decode;
pub mod encode;
pub mod overlay;
pub mod stats;
