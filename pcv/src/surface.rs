// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

//! Turning flat PCV sample sequences into plottable surfaces.

use antview_core::num::{fill_row_major, finite_extent};
use antview_core::CoreError;
use ndarray::{Array1, Array2};

use crate::errors::SampleFormatError;
use crate::AxisSpec;

/// The PCV values of one antenna, shaped for plotting.
#[derive(Clone, Debug, PartialEq)]
pub enum Surface {
    /// An azimuth-independent (NOAZI) model: one value per zenith step.
    Profile(Array1<f64>),

    /// A full model, indexed `[azimuth][zenith]`.
    Grid(Array2<f64>),
}

impl Surface {
    /// Shape a flat sample sequence according to the grid axes.
    ///
    /// The samples are in the file's order: zenith varies slowest, azimuth
    /// fastest. With an azimuth axis, element `[j, i]` of the resulting grid
    /// is sample `i * n_azimuth + j`. Without one, the samples form a profile
    /// along the zenith axis.
    ///
    /// Returns an error if the number of samples does not match the grid.
    pub fn build(
        zenith: &AxisSpec,
        azimuth: Option<&AxisSpec>,
        samples: Vec<f64>,
    ) -> Result<Surface, SampleFormatError> {
        let n_zen = zenith.n_steps();

        match azimuth {
            None => {
                if samples.len() != n_zen {
                    return Err(CoreError::DimensionMismatch {
                        shape: vec![n_zen],
                        expected: n_zen,
                        actual: samples.len(),
                    }
                    .into());
                }

                Ok(Surface::Profile(Array1::from(samples)))
            }

            Some(azimuth) => {
                let by_zenith = fill_row_major((n_zen, azimuth.n_steps()), samples)?;
                let by_azimuth = by_zenith.reversed_axes();
                Ok(Surface::Grid(by_azimuth.as_standard_layout().into_owned()))
            }
        }
    }

    /// Whether this is an azimuth-independent profile.
    pub fn is_profile(&self) -> bool {
        matches!(self, Surface::Profile(_))
    }

    /// The total number of values in the surface.
    pub fn len(&self) -> usize {
        match self {
            Surface::Profile(p) => p.len(),
            Surface::Grid(g) => g.len(),
        }
    }

    /// Whether the surface holds no values at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The smallest and largest finite values, if any.
    pub fn extent(&self) -> Option<(f64, f64)> {
        match self {
            Surface::Profile(p) => finite_extent(p.iter()),
            Surface::Grid(g) => finite_extent(g.iter()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_transposed() {
        let zen = AxisSpec::new(0., 15., 5.);
        let azi = AxisSpec::new(0., 360., 90.);
        let (nz, na) = (zen.n_steps(), azi.n_steps());
        assert_eq!((nz, na), (3, 4));

        let samples: Vec<f64> = (0..nz * na).map(|k| k as f64 * 0.5).collect();
        let surface = Surface::build(&zen, Some(&azi), samples.clone()).unwrap();

        let grid = match surface {
            Surface::Grid(ref g) => g,
            _ => panic!("expected a grid"),
        };
        assert_eq!(grid.dim(), (na, nz));
        assert!(grid.is_standard_layout());

        for i in 0..nz {
            for j in 0..na {
                assert_eq!(grid[[j, i]], samples[i * na + j]);
            }
        }

        assert_eq!(surface.extent(), Some((0., 5.5)));
    }

    #[test]
    fn profile_maps_directly() {
        let zen = AxisSpec::new(0., 90., 30.);
        let surface = Surface::build(&zen, None, vec![1., -2., 3.]).unwrap();
        assert!(surface.is_profile());
        assert_eq!(surface, Surface::Profile(Array1::from(vec![1., -2., 3.])));
    }

    #[test]
    fn wrong_count_is_rejected() {
        let zen = AxisSpec::new(0., 90., 30.);
        let azi = AxisSpec::new(0., 360., 120.);
        assert!(matches!(
            Surface::build(&zen, Some(&azi), vec![0.; 8]),
            Err(SampleFormatError::Shape(_))
        ));
        assert!(Surface::build(&zen, None, vec![0.; 4]).is_err());
    }
}
