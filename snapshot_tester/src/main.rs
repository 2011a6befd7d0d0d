use anyhow::{Context, bail};
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use swatch_vision::core_modules::collaborators::{
    ClipboardBuffer, DirectoryExporter, ImageFileSource, encode_png,
};
use swatch_vision::{
    Clipboard, ColorFormat, ExtractorConfig, FileExporter, FrameColorExtractor, FrameColorResult,
};
use swatch_vision_server::{ColorStore, JsonLinesColorStore, NewColorRecord};
use tracing::{error, info};

/// Samples the six picker colors from a still frame on disk.
#[derive(Parser, Debug)]
#[command(name = "snapshot_tester", version, about)]
struct Args {
    /// Still frame to sample (PNG, JPEG, ...)
    input: PathBuf,

    /// Edge length of each sample region in pixels
    #[arg(long, default_value_t = swatch_vision::DEFAULT_SAMPLE_SIZE)]
    sample_size: u32,

    /// Leave CMYK out of the report
    #[arg(long)]
    no_cmyk: bool,

    /// Copy one sample, e.g. `0:hex` or `3:hsl`
    #[arg(long, value_name = "INDEX:FORMAT")]
    copy: Option<CopyRequest>,

    /// Write the decoded frame as snapshot.png into this directory
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Append the center color to this JSON lines store
    #[arg(long, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Print the samples as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CopyRequest {
    index: usize,
    format: ColorFormat,
}

impl FromStr for CopyRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, format) = s
            .split_once(':')
            .ok_or_else(|| format!("expected INDEX:FORMAT, got {s:?}"))?;
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("sample index {index:?} is not a number"))?;
        Ok(Self {
            index,
            format: format.parse()?,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    swatch_vision::logger::init();

    // --- 1. Argument Parsing & Setup ---
    let args = Args::parse();
    let config = ExtractorConfig::builder()
        .sample_size(args.sample_size)
        .include_cmyk(!args.no_cmyk)
        .build();
    let extractor = FrameColorExtractor::new(config);

    // --- 2. Capture & Extraction ---
    let source = ImageFileSource::new(&args.input);
    let report = extractor
        .capture_and_extract(&source)
        .await
        .with_context(|| format!("failed to sample {}", args.input.display()))?;
    info!(
        width = report.frame.width(),
        height = report.frame.height(),
        "Sampled {}",
        args.input.display()
    );

    // --- 3. Persistence (runs alongside the rest of the report) ---
    let persist = args.store.clone().map(|path| {
        let record = NewColorRecord::from_sample(report.colors.center(), None);
        tokio::task::spawn_blocking(move || {
            match JsonLinesColorStore::open(&path).and_then(|store| store.save(record)) {
                Ok(saved) => info!(uuid = %saved.uuid, hex = %saved.hex, "Stored center color"),
                Err(e) => error!(path = %path.display(), error = %e, "Failed to store center color"),
            }
        })
    });

    // --- 4. Report ---
    print_colors(&report.colors, args.json)?;

    // --- 5. Copy ---
    if let Some(request) = args.copy {
        let Some(sample) = report.colors.get(request.index) else {
            bail!(
                "sample index {} is out of range (0..{})",
                request.index,
                report.colors.samples().len()
            );
        };
        let clipboard = ClipboardBuffer::new();
        clipboard.write(&sample.clipboard_text(request.format))?;
        if let Some(text) = clipboard.contents() {
            println!("Copied {}: {}", request.format, text);
        }
    }

    // --- 6. Snapshot Export ---
    if let Some(dir) = &args.export_dir {
        let png = encode_png(&report.frame)?;
        let path = DirectoryExporter::new(dir).save(&png, "snapshot.png")?;
        println!("Snapshot saved to {}", path.display());
    }

    // A failed save was already logged; it never changes the exit status.
    if let Some(handle) = persist {
        if let Err(e) = handle.await {
            error!(error = %e, "Store task ended abnormally");
        }
    }
    Ok(())
}

fn print_colors(colors: &FrameColorResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(colors)?);
        return Ok(());
    }
    for (index, sample) in colors.iter().enumerate() {
        let label = if index == 0 { "center" } else { "peripheral" };
        println!("{index} ({label}): {sample}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_copy_requests() {
        assert_eq!(
            "3:HSL".parse::<CopyRequest>().unwrap(),
            CopyRequest {
                index: 3,
                format: ColorFormat::Hsl
            }
        );
        assert!("hex".parse::<CopyRequest>().is_err());
        assert!("x:hex".parse::<CopyRequest>().is_err());
        assert!("0:lab".parse::<CopyRequest>().is_err());
    }

    #[test]
    fn parses_full_command_line() {
        let args = Args::try_parse_from([
            "snapshot_tester",
            "frame.png",
            "--sample-size",
            "8",
            "--no-cmyk",
            "--copy",
            "0:hex",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("frame.png"));
        assert_eq!(args.sample_size, 8);
        assert!(args.no_cmyk && args.json);
        assert_eq!(args.copy.map(|c| c.format), Some(ColorFormat::Hex));
        assert!(args.store.is_none());
    }

    #[test]
    fn sample_size_defaults_to_ten() {
        let args = Args::try_parse_from(["snapshot_tester", "frame.png"]).unwrap();
        assert_eq!(args.sample_size, 10);
        assert!(!args.no_cmyk);
    }
}
