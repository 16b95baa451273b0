// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neural Types Module
//!
//! Core record types shared by every pool in the cascade engine.

pub mod connection;
pub mod error;
pub mod ids;
pub mod node;
pub mod signal;

/// Absolute position on the global discrete clock.
pub type Tick = u64;

// Re-export commonly used types
pub use connection::Connection;
pub use error::{NeuralError, Result};
pub use ids::{ConnectionId, NodeId, SignalSlot};
pub use node::Node;
pub use signal::Signal;
