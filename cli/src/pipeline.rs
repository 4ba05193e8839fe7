// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

//! Reading every antenna grid from an input stream.

use antview_core::notify::NotificationBackend;
use antview_core::{an_note, an_severe};
use antview_pcv::{PcvError, PcvGrid, PcvGridReader};
use std::io::BufRead;

/// Read all of the antenna grids in *input*.
///
/// Antennas whose values are malformed are reported as severe notifications
/// and left out of the result. A structural problem with the input stops the
/// whole run and is returned as the error.
pub fn read_grids<R: BufRead>(
    input: R,
    resync: bool,
    nbe: &mut dyn NotificationBackend,
) -> Result<Vec<PcvGrid>, PcvError> {
    let mut reader = PcvGridReader::new(input).resync(resync);
    let mut grids = Vec::new();

    while let Some(label) = reader.next_antenna()? {
        an_note!(nbe, "found new antenna: {}", label);

        match reader.read_grid(&label) {
            Ok(grid) => {
                an_note!(nbe, "compiled plot for: {}", grid.display_label());
                grids.push(grid);
            }

            Err(e) if !e.is_fatal() => {
                an_severe!(nbe, "error compiling plot for: {}", label; e);
            }

            Err(e) => return Err(e),
        }
    }

    Ok(grids)
}
