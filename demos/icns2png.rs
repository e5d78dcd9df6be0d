//! Decodes every icon in an ICNS file and saves each one as a PNG.
//!
//! ```shell
//! cargo run --example icns2png <path/to/file.icns>
//! # Icons will be saved to path/to/file.<index>.<ostype>.png
//! ```
//!
//! Elements that fail to decode are skipped and reported.  Set `RUST_LOG`
//! (e.g. `RUST_LOG=debug`) to see what the decoder is doing.

extern crate icns_decode;

use icns_decode::{DecodeOptions, ElementPolicy};
use std::env;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

fn main() {
    env_logger::init();
    if env::args().count() != 2 {
        println!("Usage: icns2png <path>");
        return;
    }
    let path = env::args().nth(1).unwrap();
    let icns_path = Path::new(&path);
    let data = fs::read(icns_path).expect("failed to read ICNS file");
    let info = icns_decode::image_info(&data).expect("failed to read ICNS file");
    println!("ICNS file contains {} icon(s); the first is {}x{}.",
             info.count,
             info.width,
             info.height);
    let options = DecodeOptions::new(ElementPolicy::Skip);
    let decoded = icns_decode::decode_with_options(&data, &options)
        .expect("failed to decode ICNS file");
    for diagnostic in &decoded.diagnostics {
        println!("Skipped '{}' element at offset {}",
                 diagnostic.ostype(),
                 diagnostic.offset());
    }
    for (index, icon) in decoded.icons.iter().enumerate() {
        let ostype = icon.icon_type().ostype();
        let png_path = icns_path.with_extension(format!("{}.{}.png", index, ostype));
        let png_file = BufWriter::new(File::create(&png_path)
                                          .expect("failed to create PNG file"));
        icon.raster().write_png(png_file).expect("failed to write PNG file");
        println!("Icon {}: {} ({}x{}) -> {}",
                 index,
                 ostype,
                 icon.width(),
                 icon.height(),
                 png_path.display());
    }
}
