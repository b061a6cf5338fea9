//! smaz CLI - short-string compression tool
//!
//! Compresses or decompresses a file (or stdin) with the default dictionary
//! or one loaded from a table file.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use tracing::{debug, info};

use smaz::Codec;

/// Compress short strings with a fixed substring dictionary.
#[derive(Parser, Debug)]
#[command(name = "smaz")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file ("-" or omitted for stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Decompress instead of compressing
    #[arg(short, long)]
    decompress: bool,

    /// Dictionary file: one entry per line, supports \n \r \t \\ and \xHH escapes
    #[arg(short, long, value_name = "FILE")]
    table: Option<PathBuf>,

    /// Treat input as newline-separated records and code each one separately
    #[arg(short, long)]
    lines: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "smaz=debug" } else { "smaz=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let custom;
    let codec: &Codec = match &args.table {
        Some(path) => {
            let table = parse_table(&fs::read(path)?)?;
            info!(path = %path.display(), entries = table.len(), "loaded dictionary");
            custom = Codec::new(table)?;
            &custom
        }
        None => smaz::default_codec(),
    };

    let input = read_input(args.input.as_deref())?;

    let start = Instant::now();
    let output = match (args.decompress, args.lines) {
        (false, false) => codec.encode(&input),
        (true, false) => codec.decode(&input)?,
        (false, true) => encode_lines(codec, &input)?,
        (true, true) => decode_lines(codec, &input)?,
    };
    let elapsed = start.elapsed();

    match &args.output {
        Some(path) => fs::write(path, &output)?,
        None => io::stdout().lock().write_all(&output)?,
    }

    debug!(elapsed = ?elapsed, "processed input");
    if args.verbose {
        let (raw, coded) = if args.decompress {
            (output.len(), input.len())
        } else {
            (input.len(), output.len())
        };
        let ratio = if raw > 0 {
            (coded as f64 / raw as f64) * 100.0
        } else {
            0.0
        };
        eprintln!("  Dictionary: {} entries", codec.len());
        eprintln!("  Time: {:.2?}", elapsed);
        eprintln!(
            "  Size: {} -> {} ({:.1}%)",
            format_size(raw as u64),
            format_size(coded as u64),
            ratio
        );
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => fs::read(path),
        _ => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Encode each line as a frame: big-endian `u16` length, then the codes.
fn encode_lines(codec: &Codec, input: &[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut out = Vec::with_capacity(input.len());
    let mut encoded = Vec::new();
    for line in split_records(input) {
        codec.encode_into(&mut encoded, line);
        let len = u16::try_from(encoded.len())
            .map_err(|_| format!("record of {} bytes is too long to frame", line.len()))?;
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&encoded);
    }
    Ok(out)
}

fn decode_lines(codec: &Codec, input: &[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut out = Vec::with_capacity(input.len() * 2);
    let mut decoded = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        let [hi, lo, tail @ ..] = rest else {
            return Err("truncated frame header".into());
        };
        let len = u16::from_be_bytes([*hi, *lo]) as usize;
        if tail.len() < len {
            return Err(format!("frame needs {} bytes, only {} remain", len, tail.len()).into());
        }
        codec.decode_into(&mut decoded, &tail[..len])?;
        out.extend_from_slice(&decoded);
        out.push(b'\n');
        rest = &tail[len..];
    }
    Ok(out)
}

/// Split on `\n`, dropping a trailing `\r` and the empty piece after a final newline.
fn split_records(input: &[u8]) -> impl Iterator<Item = &[u8]> {
    let input = input.strip_suffix(b"\n").unwrap_or(input);
    input
        .split(|&b| b == b'\n')
        .filter(move |_| !input.is_empty())
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Parse a dictionary file, one entry per non-empty line.
fn parse_table(data: &[u8]) -> Result<Vec<Vec<u8>>, String> {
    let mut table = Vec::new();
    for (lineno, line) in data.split(|&b| b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        let entry = unescape(line).map_err(|e| format!("table line {}: {}", lineno + 1, e))?;
        table.push(entry);
    }
    Ok(table)
}

fn unescape(line: &[u8]) -> Result<Vec<u8>, String> {
    let mut out = Vec::with_capacity(line.len());
    let mut bytes = line.iter().copied();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        match bytes.next() {
            Some(b'n') => out.push(b'\n'),
            Some(b'r') => out.push(b'\r'),
            Some(b't') => out.push(b'\t'),
            Some(b'\\') => out.push(b'\\'),
            Some(b'x') => {
                let hex = [
                    bytes.next().ok_or("truncated \\x escape")?,
                    bytes.next().ok_or("truncated \\x escape")?,
                ];
                let hex = std::str::from_utf8(&hex).map_err(|_| "invalid \\x escape")?;
                let value =
                    u8::from_str_radix(hex, 16).map_err(|_| format!("invalid \\x escape {hex:?}"))?;
                out.push(value);
            }
            Some(other) => return Err(format!("unknown escape \\{}", other as char)),
            None => return Err("trailing backslash".into()),
        }
    }
    Ok(out)
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
