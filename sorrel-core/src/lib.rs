// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

pub mod constant;
pub mod cv;
pub mod ds;
pub mod error;
pub mod im;
pub mod io;
pub mod ut;
