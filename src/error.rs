// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use thiserror::Error;

/// Errors that abort a whole scan. Failures to fetch individual resources are
/// not errors at this level; they are recorded in the retrieved data instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Bad or missing input, rejected before any network activity
    #[error("{0}")]
    InvalidRequest(String),

    /// Anything the pipeline did not anticipate
    #[error("{0}")]
    Unexpected(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
