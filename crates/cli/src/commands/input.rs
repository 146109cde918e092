// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File arguments shared by `format` and `lint`.

use anyhow::{bail, Context as _, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

use crate::context::Context;

/// One file to process.
pub struct Input {
    /// Path used for classification and templates
    pub path: PathBuf,
    pub content: String,
    /// Read from stdin; results go to stdout
    pub stdin: bool,
}

/// Read every argument; `-` reads stdin and takes its path from `stdin_filename`.
pub async fn read_inputs(
    ctx: &Context,
    files: &[PathBuf],
    stdin_filename: Option<&Path>,
) -> Result<Vec<Input>> {
    let mut inputs = Vec::with_capacity(files.len());
    let mut seen_stdin = false;
    for file in files {
        if file.as_os_str() == "-" {
            if seen_stdin {
                bail!("stdin may only be given once");
            }
            seen_stdin = true;
            let mut content = String::new();
            tokio::io::stdin().read_to_string(&mut content).await.context("failed to read stdin")?;
            let path = ctx.resolve(stdin_filename.unwrap_or(Path::new("stdin")));
            inputs.push(Input { path, content, stdin: true });
        } else {
            let path = ctx.resolve(file);
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            inputs.push(Input { path, content, stdin: false });
        }
    }
    Ok(inputs)
}

/// Path as the user gave it, relative to the working directory when possible.
pub fn display_path<'a>(ctx: &Context, path: &'a Path) -> &'a Path {
    path.strip_prefix(&ctx.cwd).unwrap_or(path)
}
