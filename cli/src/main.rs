// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

/*! The antex-view command

Plots GNSS antenna Phase Center Variation grids, as extracted from ANTEX
files, either interactively or into image files.

*/

use anyhow::{bail, Context, Result};
use antview_core::an_note;
use antview_core::notify::{ClapNotificationArgsExt, NotificationBackend};
use clap::{crate_version, Arg, ArgAction, ArgMatches, Command};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

mod display;
mod export;
mod pipeline;
mod render;

use export::{ExportFormat, ExportOptions};
use render::{PlotStyle, RenderOptions};

const ABOUT: &str = "\
Plot GNSS antenna Phase Center Variation correction grid(s), as extracted
from an ANTEX file by the atxtr program.

By default, input is read from standard input; use `-f` to read from a file.
Several antennas may be plotted in one run. The plots are shown interactively
once all of the input has been read. Use `-s` to save them as well, and `-n`
to skip the interactive display.

The input format is strict. Structural problems stop the program with an
error; malformed values only skip the antenna they belong to. Antennas
without azimuth-dependent corrections (NOAZI) are given with the azimuth
line `AZI: 0 0 0` and are drawn as a profile.

Example input:

    ANT: LEIAR25.R4      NONE
    ZEN: 0 90 1
    AZI: 0 360 1
    0.003804
    ...";

fn make_app() -> Command {
    Command::new("antex-view")
        .version(crate_version!())
        .about("Plot GNSS antenna Phase Center Variation grids")
        .long_about(ABOUT)
        .antview_notify_args()
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("PCV_GRID")
                .value_parser(clap::value_parser!(PathBuf))
                .help("The input file containing the PCV grids [default: standard input]"),
        )
        .arg(
            Arg::new("altitude")
                .short('i')
                .long("altitude")
                .action(ArgAction::SetTrue)
                .help("Plot altitude (90 minus zenith distance) instead of zenith distance"),
        )
        .arg(
            Arg::new("save_as")
                .short('s')
                .long("save-as")
                .value_name("SAVE_FORMAT")
                .value_parser(ExportFormat::NAMES)
                .help("Export the plots in this format, named after each antenna"),
        )
        .arg(
            Arg::new("non_interactive")
                .short('n')
                .long("non-interactive")
                .action(ArgAction::SetTrue)
                .help("Do not show the plots interactively"),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value(".")
                .help("The directory to save exported plots into"),
        )
        .arg(
            Arg::new("style")
                .long("style")
                .value_name("STYLE")
                .value_parser(PlotStyle::NAMES)
                .default_value("surface")
                .help("How to draw azimuth-dependent grids"),
        )
        .arg(
            Arg::new("size")
                .long("size")
                .value_name("WIDTHxHEIGHT")
                .value_parser(parse_canvas_size)
                .default_value("1024x768")
                .help("The size of the plots, in pixels"),
        )
        .arg(
            Arg::new("resync")
                .long("resync")
                .action(ArgAction::SetTrue)
                .help("After a malformed antenna, skip ahead to the next `ANT:` line"),
        )
}

fn parse_canvas_size(text: &str) -> Result<(u32, u32)> {
    let Some((w, h)) = text.split_once(['x', 'X']) else {
        bail!("expected a size like `1024x768`, got `{}`", text);
    };

    let w: u32 = w.trim().parse().with_context(|| format!("bad width `{}`", w))?;
    let h: u32 = h.trim().parse().with_context(|| format!("bad height `{}`", h))?;

    if w < 64 || h < 64 {
        bail!("plots must be at least 64x64 pixels, got {}x{}", w, h);
    }

    Ok((w, h))
}

fn render_options(matches: &ArgMatches) -> Result<RenderOptions> {
    let style = match matches.get_one::<String>("style") {
        Some(s) => s.parse()?,
        None => PlotStyle::Surface,
    };

    Ok(RenderOptions {
        style,
        altitude: matches.get_flag("altitude"),
        size: matches
            .get_one::<(u32, u32)>("size")
            .copied()
            .unwrap_or((1024, 768)),
    })
}

fn export_options(matches: &ArgMatches) -> Result<Option<ExportOptions>> {
    let Some(format) = matches.get_one::<String>("save_as") else {
        return Ok(None);
    };

    let dir = matches
        .get_one::<PathBuf>("output_dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(Some(ExportOptions {
        format: format.parse()?,
        dir,
    }))
}

fn inner(matches: ArgMatches, nbe: &mut dyn NotificationBackend) -> Result<i32> {
    let opts = render_options(&matches)?;
    let saving = export_options(&matches)?;
    let resync = matches.get_flag("resync");

    let grids = match matches.get_one::<PathBuf>("file") {
        Some(path) => {
            let f = File::open(path)
                .with_context(|| format!("failed to open input file `{}`", path.display()))?;
            pipeline::read_grids(BufReader::new(f), resync, nbe)
        }

        None => pipeline::read_grids(io::stdin().lock(), resync, nbe),
    }
    .context("failed to read PCV grids")?;

    if let Some(saving) = saving {
        for grid in &grids {
            let path = export::export_grid(grid, &opts, &saving)?;
            an_note!(nbe, "plot exported to: {}", path.display());
        }
    }

    if !matches.get_flag("non_interactive") {
        display::show_all(&grids, &opts, nbe)?;
    }

    Ok(0)
}

fn main() {
    let matches = make_app().get_matches();
    process::exit(antview_core::notify::run_with_notifications(matches, inner));
}
