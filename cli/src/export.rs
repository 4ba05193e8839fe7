// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

//! Saving plots to image files.

use anyhow::{Context, Result};
use antview_pcv::PcvGrid;
use plotters::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::render::{draw_grid, RenderOptions};

/// The image formats plots can be exported to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExportFormat {
    Png,
    Bmp,
    Svg,
}

impl ExportFormat {
    /// The names accepted on the command line, which double as the file
    /// extensions.
    pub const NAMES: [&'static str; 3] = ["png", "bmp", "svg"];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Bmp => "bmp",
            ExportFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Error)]
#[error("unsupported export format `{0}` (expected one of png, bmp, svg)")]
pub struct UnknownExportFormat(String);

impl FromStr for ExportFormat {
    type Err = UnknownExportFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "bmp" => Ok(ExportFormat::Bmp),
            "svg" => Ok(ExportFormat::Svg),
            _ => Err(UnknownExportFormat(s.to_owned())),
        }
    }
}

/// Where and how to save plots.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub format: ExportFormat,

    /// The directory the files are written into.
    pub dir: PathBuf,
}

/// The file a grid's plot is exported to: the sanitized antenna label plus
/// the format's extension, inside *dir*.
pub fn export_path(grid: &PcvGrid, format: ExportFormat, dir: &Path) -> PathBuf {
    dir.join(format!("{}.{}", grid.file_stem(), format.extension()))
}

/// Render a grid into an image file, returning the path written.
pub fn export_grid(
    grid: &PcvGrid,
    opts: &RenderOptions,
    export: &ExportOptions,
) -> Result<PathBuf> {
    let path = export_path(grid, export.format, &export.dir);

    let result = match export.format {
        ExportFormat::Svg => {
            let root = SVGBackend::new(&path, opts.size).into_drawing_area();
            draw_grid(&root, grid, opts)
        }

        ExportFormat::Png | ExportFormat::Bmp => {
            let root = BitMapBackend::new(&path, opts.size).into_drawing_area();
            draw_grid(&root, grid, opts)
        }
    };

    result.with_context(|| format!("failed to export plot to `{}`", path.display()))?;
    Ok(path)
}
