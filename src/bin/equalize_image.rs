use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use histeq_dither::{transform_any_8bit_image, DitherMode, EqualizeParams, Quantize};
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about = "Histogram-equalize every channel of an 8-bit image", long_about = None)]
struct Parameters {
    ///Path to the input file.
    filename_in: PathBuf,
    ///Output file path, format taken from the extension.
    filename_out: PathBuf,
    ///Seed for the dithering generator, channel c uses seed + c.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = DitherMode::Random)]
    dither: DitherMode,
    #[arg(long, value_enum, default_value_t = Quantize::Floor)]
    quantize: Quantize,
    ///Equalize the alpha channel too.
    #[arg(long)]
    equalize_alpha: bool,
    ///Write before/after histogram plots of every channel into this directory.
    #[arg(long, value_name = "DIR")]
    plot_histograms: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

fn main() -> ExitCode {
    let params = Parameters::parse();
    tracing_subscriber::fmt().with_max_level(params.log_level).with_target(false).init();

    let eq_params = EqualizeParams {
        dither: params.dither,
        quantize: params.quantize,
        seed: params.seed,
        equalize_alpha: params.equalize_alpha,
    };

    if let Some(dir) = &params.plot_histograms {
        if let Err(e) = std::fs::create_dir_all(dir) {
            error!("cannot create {}: {e}", dir.display());
            return ExitCode::FAILURE;
        }
    }

    match transform_any_8bit_image(
        &params.filename_in,
        &params.filename_out,
        &eq_params,
        params.plot_histograms.as_deref(),
    ) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
