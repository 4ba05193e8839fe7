// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

//! Showing plots in a window.

use anyhow::Result;
use antview_core::notify::NotificationBackend;
use antview_pcv::PcvGrid;

use crate::render::RenderOptions;

/// Show each plot in its own window, one after the other.
///
/// Closing a window or pressing Escape moves on to the next plot.
#[cfg(feature = "display")]
pub fn show_all(
    grids: &[PcvGrid],
    opts: &RenderOptions,
    nbe: &mut dyn NotificationBackend,
) -> Result<()> {
    use anyhow::Context;
    use antview_core::an_note;
    use minifb::{Key, Window, WindowOptions};
    use plotters::prelude::*;

    let (width, height) = opts.size;
    let (w, h) = (width as usize, height as usize);

    for (n, grid) in grids.iter().enumerate() {
        let mut rgb = vec![0u8; w * h * 3];

        {
            let root = BitMapBackend::with_buffer(&mut rgb, (width, height)).into_drawing_area();
            crate::render::draw_grid(&root, grid, opts)
                .with_context(|| format!("failed to draw plot for {}", grid.display_label()))?;
        }

        let frame = rgb_to_frame(&rgb);

        an_note!(
            nbe,
            "showing plot {} of {}: {} (close the window or press Escape to continue)",
            n + 1,
            grids.len(),
            grid.display_label()
        );

        let mut window = Window::new(&grid.display_label(), w, h, WindowOptions::default())
            .context("failed to open a plot window")?;
        window.set_target_fps(30);

        while window.is_open() && !window.is_key_down(Key::Escape) {
            window
                .update_with_buffer(&frame, w, h)
                .context("failed to update the plot window")?;
        }
    }

    Ok(())
}

/// Without windowing support, there is nothing to show.
#[cfg(not(feature = "display"))]
pub fn show_all(
    grids: &[PcvGrid],
    _opts: &RenderOptions,
    nbe: &mut dyn NotificationBackend,
) -> Result<()> {
    use antview_core::an_warning;

    if !grids.is_empty() {
        an_warning!(
            nbe,
            "this program was built without interactive display support; use --save-as to export the {} plot(s)",
            grids.len()
        );
    }

    Ok(())
}

/// Pack an RGB byte buffer into the `0RGB` words a window framebuffer wants.
#[cfg(feature = "display")]
fn rgb_to_frame(rgb: &[u8]) -> Vec<u32> {
    rgb.chunks_exact(3)
        .map(|p| (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32)
        .collect()
}

#[cfg(all(test, feature = "display"))]
mod tests {
    use super::*;

    #[test]
    fn frame_packing() {
        let frame = rgb_to_frame(&[255, 0, 0, 0, 128, 1, 9, 9]);
        assert_eq!(frame, vec![0x00ff_0000, 0x0000_8001]);
    }
}
