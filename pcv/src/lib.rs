// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

//! Reading antenna Phase Center Variation (PCV) grids.
//!
//! The input is the line-oriented text produced by the `atxtr` extraction
//! tool. Each antenna appears as a block:
//!
//! ```text
//! ANT: LEIAR25.R4      NONE
//! ZEN: 0 90 5
//! AZI: 0 360 5
//! 0.003804
//! ...
//! ```
//!
//! followed by one value per line, zenith varying slowest. An `AZI: 0 0 0`
//! line (any empty azimuth range) marks an azimuth-independent (NOAZI)
//! model with one value per zenith step. Blank lines and lines tagged
//! `[DEBUG]` may precede an `ANT:` header.
//!
//! The format is strict. A broken `ANT:`, `ZEN:` or `AZI:` line is a
//! `StructuralFormatError`; a broken value line is a `SampleFormatError`,
//! after which reading can continue with the next antenna.

use antview_core::io::{split_tag, LineReader};
use antview_core::num::{step_count, stepped_values};
use ndarray::Array1;
use std::fmt;
use std::io::BufRead;

pub mod errors;
pub mod surface;

pub use errors::{PcvError, SampleFormatError, StructuralFormatError};
pub use surface::Surface;

/// The tag that starts an antenna header line.
pub const ANTENNA_TAG: &str = "ANT:";

/// The tag of diagnostic lines that the extraction tool may interleave with
/// its output.
pub const DEBUG_TAG: &str = "[DEBUG]";

/// How many blank or debug lines may be skipped while looking for the next
/// antenna header.
pub const HEADER_SEARCH_BUDGET: usize = 100;

/// Which of the two grid axes a line describes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AxisKind {
    /// Zenith distance.
    Zenith,

    /// Azimuth.
    Azimuth,
}

impl AxisKind {
    /// The tag that starts the line declaring this axis.
    pub fn tag(self) -> &'static str {
        match self {
            AxisKind::Zenith => "ZEN:",
            AxisKind::Azimuth => "AZI:",
        }
    }
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            AxisKind::Zenith => "zenith",
            AxisKind::Azimuth => "azimuth",
        })
    }
}

/// A half-open range of angles, in degrees, sampled at a fixed step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisSpec {
    /// The first sampled angle.
    pub start: f64,

    /// The end of the range; never itself sampled.
    pub stop: f64,

    /// The spacing between samples.
    pub step: f64,
}

impl AxisSpec {
    /// Create a new axis specification.
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        AxisSpec { start, stop, step }
    }

    /// The number of samples along this axis: `floor((stop - start) / step)`.
    pub fn n_steps(&self) -> usize {
        step_count(self.start, self.stop, self.step)
    }

    /// The sampled angles, `start + k * step` for each of the `n_steps()`
    /// values of `k`.
    pub fn coordinates(&self) -> Array1<f64> {
        stepped_values(self.start, self.step, self.n_steps())
    }

    /// Whether this axis is empty by construction. For the azimuth axis this
    /// marks a NOAZI model.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.stop || self.step == 0.
    }
}

/// The PCV correction grid of one antenna.
#[derive(Clone, Debug)]
pub struct PcvGrid {
    label: String,
    zenith: AxisSpec,
    azimuth: Option<AxisSpec>,
    zenith_coords: Array1<f64>,
    azimuth_coords: Array1<f64>,
    surface: Surface,
}

impl PcvGrid {
    /// Assemble a grid from its parts.
    ///
    /// An `azimuth` of None gives an azimuth-independent model. The samples
    /// are in file order and must match the size of the grid exactly.
    pub fn new(
        label: impl Into<String>,
        zenith: AxisSpec,
        azimuth: Option<AxisSpec>,
        samples: Vec<f64>,
    ) -> Result<Self, SampleFormatError> {
        let surface = Surface::build(&zenith, azimuth.as_ref(), samples)?;
        let azimuth_coords = match azimuth {
            Some(ref a) => a.coordinates(),
            None => Array1::zeros(0),
        };

        Ok(PcvGrid {
            label: label.into(),
            zenith_coords: zenith.coordinates(),
            zenith,
            azimuth,
            azimuth_coords,
            surface,
        })
    }

    /// The antenna label exactly as given in the header, minus surrounding
    /// whitespace.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The label with internal whitespace runs collapsed to single spaces,
    /// for titles.
    pub fn display_label(&self) -> String {
        self.label.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// A lowercase, whitespace-free version of the label, usable as a file
    /// name stem.
    ///
    /// Whitespace runs become `_`, as do path separators.
    pub fn file_stem(&self) -> String {
        let stem = self
            .label
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .replace(['/', '\\'], "_")
            .to_lowercase();

        if stem.is_empty() {
            "antenna".to_owned()
        } else {
            stem
        }
    }

    /// The zenith-distance axis.
    pub fn zenith(&self) -> &AxisSpec {
        &self.zenith
    }

    /// The azimuth axis, or None for a NOAZI model.
    pub fn azimuth(&self) -> Option<&AxisSpec> {
        self.azimuth.as_ref()
    }

    /// Whether this is an azimuth-independent model.
    pub fn is_noazi(&self) -> bool {
        self.azimuth.is_none()
    }

    /// The zenith distances of the grid points, in degrees.
    pub fn zenith_coordinates(&self) -> &Array1<f64> {
        &self.zenith_coords
    }

    /// The azimuths of the grid points, in degrees, or None for a NOAZI
    /// model.
    pub fn azimuth_coordinates(&self) -> Option<&Array1<f64>> {
        self.azimuth.as_ref().map(|_| &self.azimuth_coords)
    }

    /// The PCV values.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

/// A reader that pulls PCV grids out of a text stream one antenna at a time.
///
/// The reader can be driven a step at a time (`next_antenna`, then
/// `read_grid`), which lets callers announce an antenna before its values are
/// read, or through `next`, which does both.
#[derive(Debug)]
pub struct PcvGridReader<R: BufRead> {
    lines: LineReader<R>,
    resync: bool,
}

impl<R: BufRead> PcvGridReader<R> {
    /// Create a new reader that gets data from the BufRead passed as an
    /// argument.
    pub fn new(inner: R) -> Self {
        PcvGridReader {
            lines: LineReader::new(inner),
            resync: false,
        }
    }

    /// Set whether the reader should skip ahead to the next `ANT:` line
    /// after a sample error.
    ///
    /// Without this, a bad value line leaves the rest of its block in the
    /// stream and the next header search will usually fail on it.
    pub fn resync(mut self, resync: bool) -> Self {
        self.resync = resync;
        self
    }

    /// Consume this reader, returning the underlying stream.
    pub fn into_inner(self) -> R {
        self.lines.into_inner()
    }

    /// The number of lines consumed so far.
    pub fn line_number(&self) -> u64 {
        self.lines.line_number()
    }

    fn read_line(&mut self) -> Result<Option<String>, PcvError> {
        Ok(self.lines.next_line()?.map(str::to_owned))
    }

    /// Locate the next antenna header and return its label.
    ///
    /// Blank and `[DEBUG]` lines are skipped, up to `HEADER_SEARCH_BUDGET` of
    /// them. Returns Ok(None) if the input ends first: that is the normal
    /// end of a batch. Any other line that is not an `ANT:` header is a
    /// structural error.
    pub fn next_antenna(&mut self) -> Result<Option<String>, PcvError> {
        let mut skipped = 0;

        loop {
            if skipped >= HEADER_SEARCH_BUDGET {
                return Err(StructuralFormatError::HeaderNotFound {
                    budget: HEADER_SEARCH_BUDGET,
                    line: self.line_number(),
                }
                .into());
            }

            let line = match self.read_line()? {
                Some(l) => l,
                None => return Ok(None),
            };

            match split_tag(&line) {
                None | Some((DEBUG_TAG, _)) => {
                    skipped += 1;
                }

                Some((ANTENNA_TAG, _)) => {
                    let label = line.trim_start()[ANTENNA_TAG.len()..].trim();
                    return Ok(Some(label.to_owned()));
                }

                Some(_) => {
                    return Err(StructuralFormatError::InvalidHeader {
                        line: self.line_number(),
                        text: line.trim().to_owned(),
                    }
                    .into());
                }
            }
        }
    }

    /// Read an axis declaration line of the given kind.
    ///
    /// The line must hold the axis tag followed by exactly three numbers:
    /// start, stop and step. Degenerate ranges are returned as-is.
    pub fn read_axis(&mut self, kind: AxisKind) -> Result<AxisSpec, PcvError> {
        let line = match self.read_line()? {
            Some(l) => l,
            None => {
                return Err(StructuralFormatError::UnexpectedEof {
                    kind,
                    line: self.line_number(),
                }
                .into())
            }
        };

        let invalid = || StructuralFormatError::InvalidAxis {
            kind,
            line: self.line_number(),
            text: line.trim().to_owned(),
        };

        let values = match split_tag(&line) {
            Some((tag, rest)) if tag == kind.tag() => rest
                .map(str::parse::<f64>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| invalid())?,
            _ => return Err(invalid().into()),
        };

        match values[..] {
            [start, stop, step] => Ok(AxisSpec::new(start, stop, step)),
            _ => Err(invalid().into()),
        }
    }

    /// Read exactly `n` value lines, each holding a single number.
    pub fn read_samples(&mut self, n: usize) -> Result<Vec<f64>, PcvError> {
        // Cap the preallocation; `n` comes straight from the input.
        let mut samples = Vec::with_capacity(n.min(1 << 16));

        while samples.len() < n {
            let line = match self.read_line()? {
                Some(l) => l,
                None => {
                    return Err(SampleFormatError::Truncated {
                        read: samples.len(),
                        expected: n,
                    }
                    .into())
                }
            };

            let mut tokens = line.split_whitespace();

            let value = match (tokens.next(), tokens.next()) {
                (Some(token), None) => token.parse::<f64>().ok(),
                _ => None,
            };

            match value {
                Some(v) => samples.push(v),

                None => {
                    let err = SampleFormatError::InvalidSample {
                        line: self.line_number(),
                        index: samples.len() + 1,
                        expected: n,
                        text: line.trim().to_owned(),
                    };

                    // A short block may have run into the next header.
                    if self.resync && matches!(split_tag(&line), Some((ANTENNA_TAG, _))) {
                        self.lines.unread();
                    }

                    return Err(err.into());
                }
            }
        }

        Ok(samples)
    }

    /// Read the body of an antenna block, whose header has just been
    /// consumed by `next_antenna`.
    ///
    /// On a sample error, and if resynchronization is enabled, the stream is
    /// advanced to the next `ANT:` line before the error is returned.
    pub fn read_grid(&mut self, label: &str) -> Result<PcvGrid, PcvError> {
        let result = self.read_grid_inner(label);

        if self.resync {
            if let Err(PcvError::Sample(_)) = result {
                self.skip_to_antenna()?;
            }
        }

        result
    }

    fn read_grid_inner(&mut self, label: &str) -> Result<PcvGrid, PcvError> {
        let zenith = self.read_axis(AxisKind::Zenith)?;
        check_extent(AxisKind::Zenith, &zenith, self.line_number())?;

        let azimuth = self.read_axis(AxisKind::Azimuth)?;
        let azimuth = if azimuth.is_degenerate() {
            None
        } else {
            check_extent(AxisKind::Azimuth, &azimuth, self.line_number())?;
            Some(azimuth)
        };

        let n_samples = sample_count(&zenith, azimuth.as_ref(), self.line_number())?;
        let samples = self.read_samples(n_samples)?;
        Ok(PcvGrid::new(label, zenith, azimuth, samples)?)
    }

    /// Discard lines up to, but not including, the next `ANT:` line.
    fn skip_to_antenna(&mut self) -> Result<(), PcvError> {
        while let Some(line) = self.lines.next_line()? {
            let is_header = matches!(split_tag(line), Some((ANTENNA_TAG, _)));

            if is_header {
                self.lines.unread();
                break;
            }
        }

        Ok(())
    }

    /// Read the next complete antenna grid.
    ///
    /// Returns Ok(None) at the normal end of the input. After an error that
    /// is not fatal (see `PcvError::is_fatal`) the caller may keep calling
    /// this function to get the following antennas.
    pub fn next(&mut self) -> Result<Option<PcvGrid>, PcvError> {
        match self.next_antenna()? {
            None => Ok(None),
            Some(label) => self.read_grid(&label).map(Some),
        }
    }
}

/// The number of values a grid declares. `step_count` saturates, so a
/// factor of `usize::MAX` counts as an overflow too.
fn sample_count(
    zenith: &AxisSpec,
    azimuth: Option<&AxisSpec>,
    line: u64,
) -> Result<usize, StructuralFormatError> {
    let n_zen = zenith.n_steps();
    let n_azi = azimuth.map_or(1, AxisSpec::n_steps);

    n_zen
        .checked_mul(n_azi)
        .filter(|&n| n < usize::MAX)
        .ok_or(StructuralFormatError::GridTooLarge {
            line,
            zenith: n_zen,
            azimuth: n_azi,
        })
}

fn check_extent(kind: AxisKind, axis: &AxisSpec, line: u64) -> Result<(), StructuralFormatError> {
    if axis.n_steps() == 0 {
        Err(StructuralFormatError::EmptyAxis {
            kind,
            line,
            start: axis.start,
            stop: axis.stop,
            step: axis.step,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(text: &str) -> PcvGridReader<Cursor<String>> {
        PcvGridReader::new(Cursor::new(text.to_owned()))
    }

    fn block(label: &str, zen: (f64, f64, f64), azi: (f64, f64, f64), first: f64) -> String {
        let zen_spec = AxisSpec::new(zen.0, zen.1, zen.2);
        let azi_spec = AxisSpec::new(azi.0, azi.1, azi.2);
        let n = zen_spec.n_steps() * if azi_spec.is_degenerate() { 1 } else { azi_spec.n_steps() };
        let mut s = format!(
            "ANT: {}\nZEN: {} {} {}\nAZI: {} {} {}\n",
            label, zen.0, zen.1, zen.2, azi.0, azi.1, azi.2
        );

        for k in 0..n {
            s.push_str(&format!("{}\n", first + k as f64));
        }

        s
    }

    #[test]
    fn axis_counts() {
        let a = AxisSpec::new(0., 90., 5.);
        assert_eq!(a.n_steps(), 18);
        assert_eq!(a.coordinates().len(), 18);
        assert_eq!(a.coordinates()[17], 85.);
        assert!(!a.is_degenerate());
        assert!(AxisSpec::new(0., 0., 0.).is_degenerate());
        assert!(AxisSpec::new(10., 10., 5.).is_degenerate());
        assert!(AxisSpec::new(0., 360., 0.).is_degenerate());
    }

    #[test]
    fn single_2d_block() {
        let text = block("LEIAR25.R4      LEIT", (0., 15., 5.), (0., 360., 90.), 0.);
        let mut r = reader(&text);
        let grid = r.next().unwrap().unwrap();

        assert_eq!(grid.label(), "LEIAR25.R4      LEIT");
        assert_eq!(grid.display_label(), "LEIAR25.R4 LEIT");
        assert_eq!(grid.file_stem(), "leiar25.r4_leit");
        assert!(!grid.is_noazi());
        assert_eq!(grid.zenith_coordinates().to_vec(), vec![0., 5., 10.]);
        assert_eq!(
            grid.azimuth_coordinates().unwrap().to_vec(),
            vec![0., 90., 180., 270.]
        );

        match grid.surface() {
            Surface::Grid(g) => {
                assert_eq!(g.dim(), (4, 3));
                // sample i * 4 + j lands at [j, i]
                assert_eq!(g[[1, 2]], 9.);
                assert_eq!(g[[3, 0]], 3.);
            }
            _ => panic!("expected a 2D grid"),
        }

        assert!(r.next().unwrap().is_none());
    }

    #[test]
    fn noazi_routes_to_profile() {
        for zen in &[(0., 90., 5.), (0., 10., 1.), (5., 80., 2.5)] {
            let text = block("TRM29659.00     NONE", *zen, (0., 0., 0.), 1.);
            let grid = reader(&text).next().unwrap().unwrap();
            assert!(grid.is_noazi());
            assert!(grid.azimuth_coordinates().is_none());
            assert!(grid.surface().is_profile());
            assert_eq!(grid.surface().len(), grid.zenith().n_steps());
        }

        let text = "ANT: X\nZEN: 0 20 10\nAZI: 0 360 0\n1\n2\n";
        assert!(reader(text).next().unwrap().unwrap().is_noazi());
    }

    #[test]
    fn header_after_99_debug_lines() {
        let mut text = String::new();

        for i in 0..99 {
            if i % 10 == 0 {
                text.push('\n');
            } else {
                text.push_str(&format!("[DEBUG] step {i}\n"));
            }
        }

        text.push_str(&block("AOAD/M_T        NONE", (0., 10., 5.), (0., 0., 0.), 0.));
        let grid = reader(&text).next().unwrap().unwrap();
        assert_eq!(grid.file_stem(), "aoad_m_t_none");
    }

    #[test]
    fn header_not_within_100_lines() {
        let mut text = "[DEBUG] chatter\n".repeat(100);
        text.push_str(&block("X", (0., 10., 5.), (0., 0., 0.), 0.));

        match reader(&text).next_antenna() {
            Err(PcvError::Structural(StructuralFormatError::HeaderNotFound { budget: 100, .. })) => {}
            other => panic!("unexpected result {other:?}"),
        }

        let text = "[DEBUG] chatter\n".repeat(100);
        assert!(reader(&text).next_antenna().is_err());
    }

    #[test]
    fn end_of_input_is_not_an_error() {
        assert!(reader("").next_antenna().unwrap().is_none());
        assert!(reader("[DEBUG] x\n\n  \n").next_antenna().unwrap().is_none());
    }

    #[test]
    fn structural_errors_are_fatal() {
        let cases = [
            "0.1\n",
            "ANTENNA: X\n",
            "ANT: X\nAZI: 0 360 5\n",
            "ANT: X\nZEN: 0 90\nAZI: 0 360 5\n",
            "ANT: X\nZEN: 0 90 5 1\nAZI: 0 360 5\n",
            "ANT: X\nZEN: 0 ninety 5\nAZI: 0 360 5\n",
            "ANT: X\nZEN: 0 90 5\n\n",
            "ANT: X\nZEN: 0 90 5\n",
            "ANT: X\nZEN: 0 0 0\nAZI: 0 0 0\n",
            "ANT: X\nZEN: 0 90 5\nAZI: 360 0 5\n",
        ];

        for text in &cases {
            let err = reader(text).next().unwrap_err();
            assert!(err.is_fatal(), "{text:?} gave {err}");
            assert!(matches!(err, PcvError::Structural(_)));
        }
    }

    #[test]
    fn oversized_grids_are_fatal() {
        for text in [
            "ANT: HUGE\nZEN: 0 1e10 1\nAZI: 0 1e10 1\n1.0\n",
            "ANT: HUGE\nZEN: 0 1e300 1\nAZI: 0 0 0\n1.0\n",
        ] {
            let err = reader(text).next().unwrap_err();
            assert!(err.is_fatal());
            assert!(
                matches!(
                    err,
                    PcvError::Structural(StructuralFormatError::GridTooLarge { line: 3, .. })
                ),
                "{text:?} gave {err}"
            );
        }

        // Large but representable: read until the input runs out.
        let err = reader("ANT: LONG\nZEN: 0 1e10 1\nAZI: 0 0 0\n1.0\n")
            .next()
            .unwrap_err();
        assert!(matches!(
            err,
            PcvError::Sample(SampleFormatError::Truncated { read: 1, .. })
        ));
    }

    #[test]
    fn short_block_is_a_sample_error() {
        let text = "ANT: X\nZEN: 0 15 5\nAZI: 0 0 0\n1.0\n2.0\n";
        let err = reader(text).next().unwrap_err();
        assert!(!err.is_fatal());
        assert!(matches!(
            err,
            PcvError::Sample(SampleFormatError::Truncated { read: 2, expected: 3 })
        ));
    }

    #[test]
    fn malformed_sample_lines() {
        for bad in &["", "1.0 2.0", "abc", "ZEN: 0"] {
            let text = format!("ANT: X\nZEN: 0 15 5\nAZI: 0 0 0\n1.0\n{bad}\n3.0\n");
            match reader(&text).next() {
                Err(PcvError::Sample(SampleFormatError::InvalidSample { line, index, .. })) => {
                    assert_eq!(line, 5);
                    assert_eq!(index, 2);
                }
                other => panic!("unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn two_blocks_do_not_mix() {
        let mut text = block("FIRST ANT", (0., 20., 10.), (0., 360., 120.), 100.);
        text.push_str("[DEBUG] between\n");
        text.push_str(&block("SECOND", (10., 40., 10.), (0., 0., 0.), -50.));

        let mut r = reader(&text);
        let first = r.next().unwrap().unwrap();
        let second = r.next().unwrap().unwrap();
        assert!(r.next().unwrap().is_none());

        assert_eq!(first.label(), "FIRST ANT");
        assert_eq!(first.zenith_coordinates().to_vec(), vec![0., 10.]);
        assert_eq!(first.surface().extent(), Some((100., 105.)));

        assert_eq!(second.label(), "SECOND");
        assert!(second.is_noazi());
        assert_eq!(second.zenith_coordinates().to_vec(), vec![10., 20., 30.]);
        assert_eq!(
            second.surface(),
            &Surface::Profile(Array1::from(vec![-50., -49., -48.]))
        );
    }

    #[test]
    fn without_resync_leftovers_are_fatal() {
        let mut text = "ANT: BAD\nZEN: 0 30 10\nAZI: 0 0 0\n1.0\noops\n3.0\n".to_owned();
        text.push_str(&block("GOOD", (0., 20., 10.), (0., 0., 0.), 0.));

        let mut r = reader(&text);
        assert!(!r.next().unwrap_err().is_fatal());
        assert!(r.next().unwrap_err().is_fatal());
    }

    #[test]
    fn resync_recovers_following_block() {
        let mut text = "ANT: BAD\nZEN: 0 30 10\nAZI: 0 0 0\n1.0\noops\n3.0\n".to_owned();
        text.push_str(&block("GOOD", (0., 20., 10.), (0., 0., 0.), 0.));
        // Declares three samples but only provides two before the next header.
        text.push_str("ANT: SHORT\nZEN: 0 30 10\nAZI: 0 0 0\n1.0\n2.0\n");
        text.push_str(&block("LAST", (0., 20., 10.), (0., 0., 0.), 7.));

        let mut r = reader(&text).resync(true);
        assert!(!r.next().unwrap_err().is_fatal());
        assert_eq!(r.next().unwrap().unwrap().label(), "GOOD");
        assert!(!r.next().unwrap_err().is_fatal());
        assert_eq!(r.next().unwrap().unwrap().label(), "LAST");
        assert!(r.next().unwrap().is_none());

        let inner = r.into_inner();
        assert_eq!(inner.position() as usize, text.len());
    }
}
