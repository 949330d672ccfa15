//! jpgl CLI - lossy image codec tool
//!
//! Encodes PPM/PGM images into the jpgl container format and decodes them
//! back. The direction is inferred from the input file's magic bytes.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use jpgl::{DecodedImage, EncodeOptions, Encoder, Preset};

/// Qualities visited by `--sweep`.
const SWEEP_QUALITIES: [u8; 6] = [0, 20, 40, 60, 80, 100];

/// A lossy image codec with a compact self-describing container.
///
/// Reads PPM (P6) and PGM (P5) images; the direction is inferred from the
/// input magic, so the same command encodes and decodes.
#[derive(Parser, Debug)]
#[command(name = "jpgl")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    jpgl photo.ppm -o photo.jpgl             Encode with default settings
    jpgl photo.ppm -o photo.jpgl -q 90       Encode with higher quality
    jpgl photo.jpgl -o photo.ppm             Decode back to PPM
    jpgl photo.ppm --preset max              Use the maximum-quality preset
    jpgl photo.ppm --subsample 1x1           Keep chroma at full resolution
    jpgl photo.ppm --sweep --json            Size/PSNR metrics across qualities")]
struct Args {
    /// Input file (PPM, PGM, or a jpgl container)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (default: input with the extension swapped)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Quality (0-100, higher = better quality)
    #[arg(short, long, default_value = "75", value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: u8,

    /// Named preset (overrides quality/subsampling when set)
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// Chroma subsampling factors as VxH, e.g. 2x2 or 1x1
    #[arg(long, value_name = "VxH", default_value = "2x2", value_parser = parse_subsample)]
    subsample: (u8, u8),

    /// Encode and decode at qualities 0,20,40,60,80,100 and report metrics
    #[arg(long)]
    sweep: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    quiet: bool,

    /// Output results as JSON (for scripting)
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    /// Quality 50, 2x2 subsampling (smallest files)
    Fast,
    /// Quality 75, 2x2 subsampling (the default trade-off)
    Balanced,
    /// Quality 95, no subsampling (best fidelity)
    Max,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Fast => Preset::Fast,
            PresetArg::Balanced => Preset::Balanced,
            PresetArg::Max => Preset::MaxQuality,
        }
    }
}

fn parse_subsample(text: &str) -> Result<(u8, u8), String> {
    let (vertical, horizontal) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected VxH (e.g. 2x2), got '{text}'"))?;
    let vertical: u8 = vertical
        .parse()
        .map_err(|_| format!("invalid vertical factor '{vertical}'"))?;
    let horizontal: u8 = horizontal
        .parse()
        .map_err(|_| format!("invalid horizontal factor '{horizontal}'"))?;
    if vertical == 0 || horizontal == 0 {
        return Err("subsampling factors must be nonzero".into());
    }
    Ok((vertical, horizontal))
}

/// An input image as interleaved RGB.
struct InputImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    source_format: &'static str,
}

/// Read the next whitespace-delimited token, skipping `#` comments.
fn read_token<R: BufRead>(reader: &mut R, token: &mut String) -> std::io::Result<()> {
    token.clear();
    let mut in_comment = false;

    loop {
        let mut byte = [0u8; 1];
        if reader.read(&mut byte)? == 0 {
            break;
        }
        let ch = byte[0] as char;

        if in_comment {
            if ch == '\n' {
                in_comment = false;
            }
            continue;
        }
        if ch == '#' {
            in_comment = true;
            continue;
        }
        if ch.is_ascii_whitespace() {
            if !token.is_empty() {
                break;
            }
            continue;
        }
        token.push(ch);
    }
    Ok(())
}

/// Decode a PPM (P6) or PGM (P5) file into interleaved RGB.
fn load_pnm(path: &PathBuf) -> Result<InputImage, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut magic = String::new();
    read_token(&mut reader, &mut magic)?;
    let (channels, source_format) = match magic.as_str() {
        "P5" => (1usize, "PGM"),
        "P6" => (3usize, "PPM"),
        _ => return Err(format!("unsupported format '{magic}', expected P5 or P6").into()),
    };

    let mut token = String::new();
    read_token(&mut reader, &mut token)?;
    let width: u32 = token.parse()?;
    read_token(&mut reader, &mut token)?;
    let height: u32 = token.parse()?;
    read_token(&mut reader, &mut token)?;
    let max_val: u32 = token.parse()?;
    if max_val != 255 {
        return Err(format!("unsupported max value {max_val}, only 8-bit (255) supported").into());
    }

    let samples = width as usize * height as usize * channels;
    let mut raw = vec![0u8; samples];
    reader.read_exact(&mut raw)?;

    let pixels = if channels == 3 {
        raw
    } else {
        // gray -> RGB: replicate the sample into all three channels
        raw.iter().flat_map(|&s| [s, s, s]).collect()
    };

    Ok(InputImage {
        width,
        height,
        pixels,
        source_format,
    })
}

fn write_ppm(path: &PathBuf, image: &DecodedImage) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = format!("P6\n{} {}\n255\n", image.width, image.height).into_bytes();
    out.extend_from_slice(&image.data);
    fs::write(path, &out)?;
    Ok(())
}

fn is_container(path: &PathBuf) -> Result<bool, Box<dyn std::error::Error>> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 4];
    file.read_exact(&mut magic)?;
    Ok(&magic == b"JPGL")
}

/// Peak signal-to-noise ratio between two equal-length RGB buffers, in dB.
fn psnr(reference: &[u8], reconstructed: &[u8]) -> f64 {
    debug_assert_eq!(reference.len(), reconstructed.len());
    let sum_sq: f64 = reference
        .iter()
        .zip(reconstructed)
        .map(|(&a, &b)| {
            let diff = a as f64 - b as f64;
            diff * diff
        })
        .sum();
    let mse = sum_sq / reference.len() as f64;
    if mse == 0.0 {
        f64::INFINITY
    } else {
        10.0 * (255.0 * 255.0 / mse).log10()
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn build_options(args: &Args) -> EncodeOptions {
    match args.preset {
        Some(preset) => EncodeOptions::from_preset(preset.into()),
        None => EncodeOptions::builder()
            .quality(args.quality)
            .subsampling(args.subsample.0, args.subsample.1)
            .build(),
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if !args.input.exists() {
        return Err(format!(
            "File not found: '{}'. Check that the path is correct.",
            args.input.display()
        )
        .into());
    }

    if is_container(&args.input)? {
        decode_command(&args)
    } else if args.sweep {
        sweep_command(&args)
    } else {
        encode_command(&args)
    }
}

fn encode_command(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let image = load_pnm(&args.input)?;
    let options = build_options(args);

    if args.verbose {
        eprintln!("Loaded: {:?}", args.input);
        eprintln!("  Input format: {}", image.source_format);
        eprintln!("  Dimensions: {}x{}", image.width, image.height);
        eprintln!(
            "  Options: quality={}, subsampling={}x{}",
            options.quality, options.subsample_vertical, options.subsample_horizontal
        );
    }

    let encoder = Encoder::new(options)?;
    let start = Instant::now();
    let container = encoder.encode(&image.pixels, image.width, image.height)?;
    let encode_time = start.elapsed();

    let output_path = args.output.clone().unwrap_or_else(|| {
        let mut path = args.input.clone();
        path.set_extension("jpgl");
        path
    });
    fs::write(&output_path, &container)?;

    let input_size = fs::metadata(&args.input)?.len();
    let output_size = container.len() as u64;
    let ratio = output_size as f64 / input_size as f64 * 100.0;

    if args.json {
        println!(
            r#"{{"input":"{}","output":"{}","input_size":{input_size},"output_size":{output_size},"ratio":{ratio:.1}}}"#,
            args.input.display(),
            output_path.display()
        );
    } else if args.verbose {
        eprintln!("Output: {}", output_path.display());
        eprintln!("  Encode time: {encode_time:.2?}");
        eprintln!(
            "  Size: {} -> {} ({ratio:.1}%)",
            format_size(input_size),
            format_size(output_size)
        );
    } else if !args.quiet {
        println!(
            "{} -> {} ({ratio:.1}%)",
            format_size(input_size),
            format_size(output_size)
        );
    }
    Ok(())
}

fn decode_command(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let container = fs::read(&args.input)?;
    let start = Instant::now();
    let image = jpgl::decode(&container)?;
    let decode_time = start.elapsed();

    let output_path = args.output.clone().unwrap_or_else(|| {
        let mut path = args.input.clone();
        path.set_extension("ppm");
        path
    });
    write_ppm(&output_path, &image)?;

    if args.json {
        println!(
            r#"{{"input":"{}","output":"{}","width":{},"height":{}}}"#,
            args.input.display(),
            output_path.display(),
            image.width,
            image.height
        );
    } else if args.verbose {
        eprintln!("Decoded: {:?}", args.input);
        eprintln!("  Dimensions: {}x{}", image.width, image.height);
        eprintln!("  Decode time: {decode_time:.2?}");
        eprintln!("Output: {}", output_path.display());
    } else if !args.quiet {
        println!(
            "{} -> {} ({}x{})",
            args.input.display(),
            output_path.display(),
            image.width,
            image.height
        );
    }
    Ok(())
}

/// Encode the input at each sweep quality, writing `<stem>_qN.jpgl` beside
/// it and reporting size/ratio/PSNR per quality.
fn sweep_command(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let image = load_pnm(&args.input)?;
    let raw_size = image.pixels.len() as u64;
    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let dir = args.input.parent().map(PathBuf::from).unwrap_or_default();

    if !args.json && !args.quiet {
        println!(
            "{:>7}  {:>10}  {:>7}  {:>9}",
            "quality", "size", "ratio", "psnr"
        );
    }

    for quality in SWEEP_QUALITIES {
        let options = EncodeOptions::builder()
            .quality(quality)
            .subsampling(args.subsample.0, args.subsample.1)
            .build();
        let container = jpgl::encode(&image.pixels, image.width, image.height, &options)?;
        let decoded = jpgl::decode(&container)?;

        let output_path = dir.join(format!("{stem}_q{quality}.jpgl"));
        fs::write(&output_path, &container)?;

        let size = container.len() as u64;
        let ratio = size as f64 / raw_size as f64 * 100.0;
        // cap so a lossless result still prints as a number (JSON has no inf)
        let psnr_db = psnr(&image.pixels, &decoded.data).min(99.99);

        if args.json {
            println!(
                r#"{{"quality":{quality},"output":"{}","output_size":{size},"ratio":{ratio:.1},"psnr":{psnr_db:.2}}}"#,
                output_path.display()
            );
        } else if !args.quiet {
            println!(
                "{quality:>7}  {:>10}  {ratio:>6.1}%  {psnr_db:>6.2}dB",
                format_size(size)
            );
        }
    }
    Ok(())
}
