////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::{fs, io, path::Path};

use anyhow::{Context, Result};

/// What happened to an output file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Written,
    Unchanged,
}

fn differs(dest: &Path, content: &[u8]) -> Result<bool> {
    match fs::read(dest) {
        Ok(previous) => Ok(previous != content),
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(e).with_context(|| format!("Could not read {}", dest.display())),
    }
}

/// Writes `content` to `dest` unless it already holds exactly that, so builds depending on the
/// file are not triggered again.
pub fn write_if_changed(dest: &Path, content: &[u8]) -> Result<Outcome> {
    if !differs(dest, content)? {
        return Ok(Outcome::Unchanged);
    }
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create dirs for {}", dest.display()))?;
    }
    fs::write(dest, content).with_context(|| format!("Could not write {}", dest.display()))?;
    Ok(Outcome::Written)
}

/// Fails when `dest` does not hold exactly `content`. Nothing is written.
pub fn check_unchanged(dest: &Path, content: &[u8]) -> Result<()> {
    if differs(dest, content)? {
        anyhow::bail!("{} is out of date", dest.display());
    }
    Ok(())
}
