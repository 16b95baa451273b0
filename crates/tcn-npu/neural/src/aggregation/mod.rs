// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Aggregation-window algorithms
//!
//! Pure functions used by the scanner when a node is due.

pub mod decay;
pub mod window;

pub use decay::{DecayTable, MAX_HALVING_WINDOW};
pub use window::{classify_signal, windowed_sum, SignalPhase};
