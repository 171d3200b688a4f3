// SPDX-License-Identifier: GPL-3.0-only

//! Orchestrator operations
//!
//! Grouped by concern, each file adds an `impl Orchestrator` block.

pub mod capture;
pub mod gallery;
pub mod processing;
pub mod staging;
