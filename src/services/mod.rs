// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod aggregator;
pub mod checks;
pub mod fetcher;
pub mod logging;
pub mod normalizer;
pub mod scanner;
