// Example runner for the `swatch_vision` library: extracts the six picker colors from a
// synthetic frame. See the `snapshot_tester` binary for the file-based tool.

use swatch_vision::core_modules::pixel::pixel::Pixel;
use swatch_vision::{FrameColorExtractor, RasterBuffer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    swatch_vision::logger::init();

    let frame = RasterBuffer::filled(640, 480, Pixel::opaque(0, 112, 243));
    let colors = FrameColorExtractor::default().extract(&frame).await?;

    for (index, sample) in colors.iter().enumerate() {
        println!("{index}: {sample}");
    }
    Ok(())
}
