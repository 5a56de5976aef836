use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use image::{Rgb, RgbImage};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Kind {
    /// Narrow-range vertical gradient per channel.
    Gradient,
    /// Flat dark left half, flat bright right half.
    Bimodal,
    /// Red, green and blue triangles of low brightness range.
    Triangles,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Write low-contrast images for equalization tests", long_about = None)]
struct Parameters {
    #[arg(long, value_enum, default_value_t = Kind::Triangles)]
    kind: Kind,
    #[arg(long, default_value_t = 256)]
    height: u32,
    #[arg(long, default_value_t = 256)]
    width: u32,
    ///Output file path
    #[arg(long, default_value = "/tmp/test_triangles.png")]
    out: PathBuf,
}

fn gradient(width: u32, height: u32) -> RgbImage {
    let step = 1.0 / height as f32;
    RgbImage::from_fn(width, height, |_, y| {
        let t = y as f32 * step;
        Rgb([
            100 + (t * 40.0).round() as u8,
            60 + (t * 20.0).round() as u8,
            180 - (t * 30.0).round() as u8,
        ])
    })
}

fn bimodal(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([20, 25, 30])
        } else {
            Rgb([200, 210, 220])
        }
    })
}

fn triangles(width: u32, height: u32) -> RgbImage {
    let step = 1.0 / height as f32;
    let mut img_out = RgbImage::new(width, height);

    for y in 0..height {
        let r_brightness = 15 + (y as f32 * step * 80.0).round() as u8;
        let g_brightness = 95 + ((1.0 - y as f32 * step) * 80.0).round() as u8;
        let b_brightness = 175 + (y as f32 * step * 80.0).round() as u8;

        let gl_i = (y as f32 * step * width as f32).round() as u32;
        let rbl_i = (width - gl_i) / 2;

        for x in 0..rbl_i { //Red triangle
            img_out.put_pixel(x, y, Rgb([r_brightness, 0, 0]))
        }
        for x in rbl_i..rbl_i + gl_i { //Green triangle
            img_out.put_pixel(x, y, Rgb([0, g_brightness, 0]))
        }
        for x in rbl_i + gl_i..width { //Blue triangle
            img_out.put_pixel(x, y, Rgb([0, 0, b_brightness]))
        }
    }
    img_out
}

fn main() -> Result<(), image::ImageError> {
    let params = Parameters::parse();
    let img_out = match params.kind {
        Kind::Gradient => gradient(params.width, params.height),
        Kind::Bimodal => bimodal(params.width, params.height),
        Kind::Triangles => triangles(params.width, params.height),
    };
    img_out.save(&params.out)?;
    println!("{}", params.out.display());
    Ok(())
}
