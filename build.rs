// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

// Stamps BOTCHECK_VERSION, the version reported by `GET /version`.
// Tagged release builds set BOTCHECK_PATCH_VERSION so that a rebuilt binary can
// be told apart from a local `cargo build` of the same Cargo.toml version.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=BOTCHECK_PATCH_VERSION");

    let version = env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let Some((major_minor, patch)) = version
        .rsplit_once('.')
        .filter(|(major_minor, _)| major_minor.contains('.'))
    else {
        panic!("Cargo.toml version must be MAJOR.MINOR.PATCH, got {version:?}");
    };

    let patch = match env::var("BOTCHECK_PATCH_VERSION") {
        Ok(stamp) if stamp.parse::<u32>().is_ok() => stamp,
        Ok(stamp) => panic!("BOTCHECK_PATCH_VERSION must be a number, got {stamp:?}"),
        Err(_) => patch.to_string(),
    };

    println!("cargo:rustc-env=BOTCHECK_VERSION={major_minor}.{patch}");
}
