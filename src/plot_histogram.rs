use std::path::Path;

use plotters::prelude::{AreaSeries, BitMapBackend, ChartBuilder, Color, IntoDrawingArea, BLUE, RED, WHITE};

use crate::error::{Error, Result};
use crate::histogram::{Histogram, LEVELS};

fn plot_err<E: ToString>(e: E) -> Error {
    Error::Plot(e.to_string())
}

/// Draws `hist` as an area chart into a PNG at `path`.
pub fn plot(path: &Path, hist: &Histogram) -> Result<()> {
    let width = 1024;
    let height = 512;
    let y_max = hist.peak().max(1);

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(0i32)
        .build_cartesian_2d(0..LEVELS, 0u64..y_max)
        .map_err(plot_err)?;

    chart.configure_mesh().draw().map_err(plot_err)?;

    chart
        .draw_series(
            AreaSeries::new(
                (0..).zip(hist.counts().iter()).map(|(x, y)| (x, *y)),
                0,
                RED.mix(0.2),
            )
            .border_style(BLUE),
        )
        .map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    Ok(())
}
