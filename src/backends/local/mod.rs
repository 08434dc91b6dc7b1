// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod factory;
pub mod stages;

pub use factory::{is_type_available, list_available_types, register_builtins};
pub use stages::*;
