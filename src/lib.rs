// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod api;
pub mod budget;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod queries;
pub mod session;
pub mod store;
pub mod utils;
pub mod wire;

pub use utils::init_tracing;
