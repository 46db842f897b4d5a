use ld2_reader::ld2::codec::charset;
use ld2_reader::{convert, ConvertConfig, IndexLocation};
use std::env;
use std::path::Path;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Forwards the library's `log` records to stderr. `RUST_LOG` overrides
/// the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .finish()
        .init();
}

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} <path-to-ld2-file> <output-dir> [--name <DICTIONARY_NAME>] [--strict] [--reuse-inflated] [--no-inflated] [--encodings <ENC>,<ENC>,...]",
        program
    );
    std::process::exit(1);
}

fn main() {
    init_logging();
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        usage(&args[0]);
    }

    let ld2_path = Path::new(&args[1]);
    let output_dir = &args[2];

    // Default name: the input file stem
    let mut name = ld2_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Dictionary".to_string());
    let mut strict = false;
    let mut reuse_inflated = false;
    let mut persist_inflated = true;
    let mut candidates = None;

    let mut rest = args[3..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--name" => match rest.next() {
                Some(value) => name = value.clone(),
                None => {
                    eprintln!("ERROR: --name flag requires an argument.");
                    std::process::exit(1);
                }
            },
            "--strict" => strict = true,
            "--reuse-inflated" => reuse_inflated = true,
            "--no-inflated" => persist_inflated = false,
            "--encodings" => {
                let Some(list) = rest.next() else {
                    eprintln!("ERROR: --encodings flag requires an argument.");
                    std::process::exit(1);
                };
                let mut parsed = Vec::new();
                for label in list.split(',') {
                    match charset::parse_encoding(label) {
                        Some(encoding) => parsed.push(encoding),
                        None => {
                            eprintln!("ERROR: Unknown encoding '{}'.", label);
                            std::process::exit(1);
                        }
                    }
                }
                candidates = Some(parsed);
            }
            _ => usage(&args[0]),
        }
    }

    let mut config = ConvertConfig::new(name, output_dir)
        .with_strict_encoding(strict)
        .with_reuse_inflated(reuse_inflated)
        .with_persist_inflated(persist_inflated);
    if let Some(candidates) = candidates {
        config = config.with_candidates(candidates);
    }

    println!("Reading LD2 file: {}", ld2_path.display());
    println!("{}", "=".repeat(60));

    match convert(ld2_path, &config) {
        Ok(report) => {
            println!("\nContainer:");
            println!("  Type: {}", report.header.magic_str());
            println!("  Version: {}", report.header.version());
            println!("  ID: {:#x}", report.header.id);
            match report.location {
                IndexLocation::Direct { offset } => {
                    println!("  Index header: {:#x} (no additional information)", offset);
                }
                IndexLocation::AfterDescription { description_offset, length, offset, .. } => {
                    println!("  Description: {:#x} / {} B", description_offset, length);
                    println!("  Index header: {:#x}", offset);
                }
            }
            println!("  Dictionary type: {:#x}", report.index_header.dictionary_type);

            println!("\nSections:");
            println!(
                "  Index: {:#x} / {} B ({} groups)",
                report.index_header.index_offset,
                report.index_header.directory_offset - report.index_header.index_offset,
                report.index_header.index_group_count()
            );
            println!(
                "  Compressed data: {:#x} / {} B in {} segments",
                report.compressed_offset, report.compressed_len, report.segments
            );
            println!("  Word index (inflated): 0x0 / {} B", report.zones.words_index_len);
            println!(
                "  Headwords (inflated): {:#x} / {} B",
                report.zones.words_offset,
                report.zones.xml_offset - report.zones.words_offset
            );
            println!(
                "  Definitions (inflated): {:#x} / {} B",
                report.zones.xml_offset,
                report.zones.inflated_len - report.zones.xml_offset
            );
            println!("  Inflated size: {} KB", report.inflated_len / 1024);
            if let Some(path) = &report.inflated_path {
                let how = if report.reused_inflated { "reused" } else { "written" };
                println!("  Inflated buffer {}: {}", how, path.display());
            }

            println!("\nEncodings:");
            println!("  Headwords: {}", report.detection.encodings.word.name());
            println!("  Definitions: {}", report.detection.encodings.xml.name());
            if report.detection.fell_back {
                println!("  (detection failed, best-effort fallback used)");
            }

            println!("\n{}", "=".repeat(60));
            println!("SUCCESS! Conversion completed.");
            println!("{}", "=".repeat(60));
            println!("  Entries: {}", report.output.entries);
            println!("  Data chunks: {}", report.output.chunks);
            println!("  Index parts: {}", report.output.index_parts);
        }
        Err(e) => {
            eprintln!("\nERROR: Failed to convert LD2 file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
