// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

/*!
Drawing PCV grids with plotters.

Azimuth-independent models are drawn as a profile against zenith distance.
Full models are drawn as a 3D surface (or wireframe) over zenith distance and
azimuth, with a colormap of the values projected onto the floor of the
chart, or as a flat heat map with a colorbar.

*/

use anyhow::Result;
use antview_pcv::{PcvGrid, Surface};
use ndarray::{Array1, Array2};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontStyle};
use std::str::FromStr;
use thiserror::Error;

const PROFILE_COLOR: RGBColor = RGBColor(214, 168, 0);
const WIRE_COLOR: RGBColor = RGBColor(31, 80, 160);
const TITLE_FONT_SIZE: u32 = 28;
const PCV_DESC: &str = "Pcv (mm)";
const AZIMUTH_DESC: &str = "Azimuth (°)";

/// How to draw azimuth-dependent grids.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlotStyle {
    /// A translucent 3D surface colored by value.
    Surface,

    /// A 3D wireframe.
    Wireframe,

    /// A flat heat map with a colorbar.
    Heatmap,
}

impl PlotStyle {
    /// The names accepted on the command line.
    pub const NAMES: [&'static str; 3] = ["surface", "wireframe", "heatmap"];
}

#[derive(Debug, Error)]
#[error("unknown plot style `{0}`")]
pub struct UnknownPlotStyle(String);

impl FromStr for PlotStyle {
    type Err = UnknownPlotStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "surface" => Ok(PlotStyle::Surface),
            "wireframe" => Ok(PlotStyle::Wireframe),
            "heatmap" => Ok(PlotStyle::Heatmap),
            other => Err(UnknownPlotStyle(other.to_owned())),
        }
    }
}

/// Settings shared by every plot of a run.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub style: PlotStyle,

    /// Plot altitude (90° minus zenith distance) instead of zenith distance.
    pub altitude: bool,

    /// Canvas size in pixels.
    pub size: (u32, u32),
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            style: PlotStyle::Surface,
            altitude: false,
            size: (1024, 768),
        }
    }
}

/// The axis shared by every kind of plot: zenith distance, or altitude if
/// requested.
struct SharedAxis {
    desc: &'static str,
    altitude: bool,
}

impl SharedAxis {
    fn new(opts: &RenderOptions) -> Self {
        SharedAxis {
            desc: if opts.altitude {
                "Altitude (°)"
            } else {
                "Zenith Distance (°)"
            },
            altitude: opts.altitude,
        }
    }

    fn map(&self, zenith: f64) -> f64 {
        if self.altitude {
            90. - zenith
        } else {
            zenith
        }
    }

    fn coordinates(&self, grid: &PcvGrid) -> Vec<f64> {
        grid.zenith_coordinates().iter().map(|&z| self.map(z)).collect()
    }

    /// The edges of the cells around each grid point: point `k` covers
    /// `edges[k]..edges[k + 1]`.
    fn edges(&self, grid: &PcvGrid) -> Vec<f64> {
        let zen = grid.zenith();
        cell_edges(zen.start, zen.step, zen.n_steps())
            .into_iter()
            .map(|z| self.map(z))
            .collect()
    }

    /// The plotted range covering the zenith axis, padded on both sides.
    fn range(&self, grid: &PcvGrid, pad: f64) -> std::ops::Range<f64> {
        let zen = grid.zenith();
        let (a, b) = (self.map(zen.start), self.map(zen.stop));
        (a.min(b) - pad)..(a.max(b) + pad)
    }
}

fn cell_edges(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..=n).map(|k| start + k as f64 * step).collect()
}

/// Draw one grid onto a drawing area and present it.
pub fn draw_grid<DB>(
    root: &DrawingArea<DB, Shift>,
    grid: &PcvGrid,
    opts: &RenderOptions,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    match grid.surface() {
        Surface::Profile(values) => draw_profile(root, grid, values, opts)?,
        Surface::Grid(values) => match opts.style {
            PlotStyle::Heatmap => draw_heatmap(root, grid, values, opts)?,
            PlotStyle::Surface | PlotStyle::Wireframe => draw_surface(root, grid, values, opts)?,
        },
    }

    root.present()?;
    Ok(())
}

fn title_font() -> FontDesc<'static> {
    ("sans-serif", TITLE_FONT_SIZE)
        .into_font()
        .style(FontStyle::Bold)
}

fn value_extent(grid: &PcvGrid) -> (f64, f64) {
    grid.surface().extent().unwrap_or((0., 0.))
}

fn draw_profile<DB>(
    root: &DrawingArea<DB, Shift>,
    grid: &PcvGrid,
    values: &Array1<f64>,
    opts: &RenderOptions,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let axis = SharedAxis::new(opts);
    let (lo, hi) = value_extent(grid);

    let mut chart = ChartBuilder::on(root)
        .caption(format!("{} (NOAZI)", grid.display_label()), title_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(axis.range(grid, 1.), (lo - 1.)..(hi + 1.))?;

    chart
        .configure_mesh()
        .x_desc(axis.desc)
        .y_desc(PCV_DESC)
        .draw()?;

    let points: Vec<(f64, f64)> = axis
        .coordinates(grid)
        .into_iter()
        .zip(values.iter().copied())
        .filter(|(_, v)| v.is_finite())
        .collect();

    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        PROFILE_COLOR.stroke_width(2),
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|&p| Circle::new(p, 4, PROFILE_COLOR.filled())),
    )?;

    Ok(())
}

/// Pick every n-th grid line so that roughly `max_lines` are drawn.
fn stride(n: usize, max_lines: usize) -> usize {
    (n / max_lines).max(1)
}

fn draw_surface<DB>(
    root: &DrawingArea<DB, Shift>,
    grid: &PcvGrid,
    values: &Array2<f64>,
    opts: &RenderOptions,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let axis = SharedAxis::new(opts);
    let (lo, hi) = value_extent(grid);
    let floor = (2. * lo).min(lo - 1.);

    let xs = axis.coordinates(grid);
    let x_edges = axis.edges(grid);
    let zs: Vec<f64> = grid
        .azimuth_coordinates()
        .map(|a| a.to_vec())
        .unwrap_or_default();
    let z_edges = grid
        .azimuth()
        .map(|a| cell_edges(a.start, a.step, a.n_steps()))
        .unwrap_or_default();
    let z_range = match (z_edges.first(), z_edges.last()) {
        (Some(&a), Some(&b)) => a.min(b)..a.max(b),
        _ => 0.0..360.0,
    };

    let (width, height) = root.dim_in_pixel();
    let (plot_area, legend_area) = root.split_vertically(height.saturating_sub(40) as i32);

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(grid.display_label(), title_font())
        .margin(20)
        .build_cartesian_3d(axis.range(grid, 0.), floor..(hi + 1.), z_range)?;

    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.35;
        pb.scale = 0.85;
        pb.into_matrix()
    });

    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.15))
        .max_light_lines(3)
        .draw()?;

    let (n_azi, n_zen) = values.dim();

    // Colormap projected onto the floor of the chart.
    chart.draw_series((0..n_azi).flat_map(|j| {
        let (x_edges, z_edges) = (&x_edges, &z_edges);
        (0..n_zen).map(move |i| {
            let color = coolwarm(normalize(values[[j, i]], lo, hi));
            Polygon::new(
                vec![
                    (x_edges[i], floor, z_edges[j]),
                    (x_edges[i + 1], floor, z_edges[j]),
                    (x_edges[i + 1], floor, z_edges[j + 1]),
                    (x_edges[i], floor, z_edges[j + 1]),
                ],
                color.filled(),
            )
        })
    }))?;

    match opts.style {
        PlotStyle::Wireframe => {
            let zen_stride = stride(n_zen, 36);
            let azi_stride = stride(n_azi, 36);

            chart.draw_series((0..n_azi).step_by(azi_stride).map(|j| {
                PathElement::new(
                    (0..n_zen)
                        .map(|i| (xs[i], values[[j, i]], zs[j]))
                        .collect::<Vec<_>>(),
                    WIRE_COLOR.mix(0.7).stroke_width(1),
                )
            }))?;

            chart.draw_series((0..n_zen).step_by(zen_stride).map(|i| {
                PathElement::new(
                    (0..n_azi)
                        .map(|j| (xs[i], values[[j, i]], zs[j]))
                        .collect::<Vec<_>>(),
                    WIRE_COLOR.mix(0.7).stroke_width(1),
                )
            }))?;
        }

        _ => {
            chart.draw_series((0..n_azi.saturating_sub(1)).flat_map(|j| {
                let (xs, zs) = (&xs, &zs);
                (0..n_zen.saturating_sub(1)).map(move |i| {
                    let corners = [
                        values[[j, i]],
                        values[[j, i + 1]],
                        values[[j + 1, i + 1]],
                        values[[j + 1, i]],
                    ];
                    let mean = corners.iter().sum::<f64>() / 4.;
                    Polygon::new(
                        vec![
                            (xs[i], corners[0], zs[j]),
                            (xs[i + 1], corners[1], zs[j]),
                            (xs[i + 1], corners[2], zs[j + 1]),
                            (xs[i], corners[3], zs[j + 1]),
                        ],
                        coolwarm(normalize(mean, lo, hi)).mix(0.6).filled(),
                    )
                })
            }))?;
        }
    }

    legend_area.draw(&Text::new(
        format!("x: {}    y: {}    z: {}", axis.desc, PCV_DESC, AZIMUTH_DESC),
        ((width / 2) as i32 - 200, 10),
        ("sans-serif", 16).into_font(),
    ))?;

    Ok(())
}

fn draw_heatmap<DB>(
    root: &DrawingArea<DB, Shift>,
    grid: &PcvGrid,
    values: &Array2<f64>,
    opts: &RenderOptions,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let axis = SharedAxis::new(opts);
    let (lo, hi) = value_extent(grid);
    let x_edges = axis.edges(grid);
    let z_edges = grid
        .azimuth()
        .map(|a| cell_edges(a.start, a.step, a.n_steps()))
        .unwrap_or_default();
    let z_range = match (z_edges.first(), z_edges.last()) {
        (Some(&a), Some(&b)) => a.min(b)..a.max(b),
        _ => 0.0..360.0,
    };

    let (width, _) = root.dim_in_pixel();
    let (plot_area, bar_area) = root.split_horizontally((width * 5 / 6) as i32);

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(grid.display_label(), title_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(axis.range(grid, 0.), z_range)?;

    chart
        .configure_mesh()
        .x_desc(axis.desc)
        .y_desc(AZIMUTH_DESC)
        .disable_mesh()
        .draw()?;

    let (n_azi, n_zen) = values.dim();

    chart.draw_series((0..n_azi).flat_map(|j| {
        let (x_edges, z_edges) = (&x_edges, &z_edges);
        (0..n_zen).map(move |i| {
            Rectangle::new(
                [(x_edges[i], z_edges[j]), (x_edges[i + 1], z_edges[j + 1])],
                coolwarm(normalize(values[[j, i]], lo, hi)).filled(),
            )
        })
    }))?;

    let (bar_lo, bar_hi) = if hi > lo { (lo, hi) } else { (lo - 1., hi + 1.) };

    let mut bar = ChartBuilder::on(&bar_area)
        .margin_top(60)
        .margin_bottom(60)
        .margin_right(20)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, bar_lo..bar_hi)?;

    bar.configure_mesh()
        .disable_x_axis()
        .disable_mesh()
        .y_desc(PCV_DESC)
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()?;

    let n_bands = 128;
    let delta = (bar_hi - bar_lo) / n_bands as f64;

    bar.draw_series((0..n_bands).map(|k| {
        let v0 = bar_lo + k as f64 * delta;
        Rectangle::new(
            [(0., v0), (1., v0 + delta)],
            coolwarm(normalize(v0 + 0.5 * delta, lo, hi)).filled(),
        )
    }))?;

    Ok(())
}

/// Map a value into `0..=1` relative to an extent. Non-finite values and
/// empty extents land in the middle.
fn normalize(v: f64, lo: f64, hi: f64) -> f64 {
    let span = hi - lo;

    if !v.is_finite() || !(span > 1e-12) {
        0.5
    } else {
        ((v - lo) / span).clamp(0., 1.)
    }
}

/// A diverging blue-white-red colormap.
fn coolwarm(t: f64) -> RGBColor {
    const COOL: (f64, f64, f64) = (59., 76., 192.);
    const MID: (f64, f64, f64) = (221., 221., 221.);
    const WARM: (f64, f64, f64) = (180., 4., 38.);

    let t = t.clamp(0., 1.);
    let (a, b, f) = if t < 0.5 {
        (COOL, MID, t * 2.)
    } else {
        (MID, WARM, (t - 0.5) * 2.)
    };

    let lerp = |x: f64, y: f64| (x + (y - x) * f).round() as u8;
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use antview_pcv::AxisSpec;

    fn noazi_grid() -> PcvGrid {
        PcvGrid::new("X", AxisSpec::new(0., 90., 30.), None, vec![1., 2., 3.]).unwrap()
    }

    fn sample_grids() -> Vec<PcvGrid> {
        let full: Vec<f64> = (0..12).map(|k| (k as f64 - 5.) * 0.7).collect();

        vec![
            PcvGrid::new(
                "LEIAR25.R4      NONE",
                AxisSpec::new(0., 90., 30.),
                Some(AxisSpec::new(0., 360., 90.)),
                full,
            )
            .unwrap(),
            noazi_grid(),
            PcvGrid::new(
                "ONE",
                AxisSpec::new(0., 5., 5.),
                Some(AxisSpec::new(0., 360., 360.)),
                vec![2.],
            )
            .unwrap(),
        ]
    }

    #[test]
    fn every_style_draws() {
        for grid in sample_grids() {
            for name in PlotStyle::NAMES {
                for altitude in [false, true] {
                    let opts = RenderOptions {
                        style: name.parse().unwrap(),
                        altitude,
                        size: (400, 300),
                    };

                    let mut svg = String::new();
                    {
                        let root = SVGBackend::with_string(&mut svg, opts.size).into_drawing_area();
                        draw_grid(&root, &grid, &opts).unwrap_or_else(|e| {
                            panic!("{} as {name} (altitude {altitude}): {e}", grid.label())
                        });
                    }

                    assert!(svg.contains("<svg"), "{} as {name}", grid.label());
                }
            }
        }
    }

    #[test]
    fn styles_parse() {
        for name in PlotStyle::NAMES {
            assert!(name.parse::<PlotStyle>().is_ok());
        }
        assert_eq!("heatmap".parse::<PlotStyle>().unwrap(), PlotStyle::Heatmap);
        assert!("contour".parse::<PlotStyle>().is_err());
    }

    #[test]
    fn altitude_is_the_complement() {
        let grid = noazi_grid();
        let opts = RenderOptions {
            altitude: true,
            ..RenderOptions::default()
        };
        let axis = SharedAxis::new(&opts);

        assert_eq!(axis.coordinates(&grid), vec![90., 60., 30.]);
        assert_eq!(axis.edges(&grid), vec![90., 60., 30., 0.]);
        assert_eq!(axis.range(&grid, 1.), -1.0..91.0);
        assert_eq!(axis.desc, "Altitude (°)");

        let axis = SharedAxis::new(&RenderOptions::default());
        assert_eq!(axis.coordinates(&grid), vec![0., 30., 60.]);
        assert_eq!(axis.range(&grid, 0.), 0.0..90.0);
    }

    #[test]
    fn colormap_ends() {
        assert_eq!(coolwarm(0.), RGBColor(59, 76, 192));
        assert_eq!(coolwarm(0.5), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(1.), RGBColor(180, 4, 38));
        assert_eq!(coolwarm(7.), coolwarm(1.));
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize(5., 0., 10.), 0.5);
        assert_eq!(normalize(-3., 0., 10.), 0.);
        assert_eq!(normalize(f64::NAN, 0., 10.), 0.5);
        assert_eq!(normalize(2., 2., 2.), 0.5);
    }

    #[test]
    fn strides() {
        assert_eq!(stride(18, 36), 1);
        assert_eq!(stride(72, 36), 2);
        assert_eq!(stride(360, 36), 10);
    }
}
