use corsika_reader::{ByteSource, RawStream, Seekable, Sequential};
use std::collections::BTreeMap;
use std::env;
use std::io;

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-corsika-file | -> [--seek <BLOCK>]", args[0]);
        std::process::exit(1);
    }

    let input = &args[1];
    let mut seek: Option<u64> = None;
    // Parse --seek argument
    if let Some(seek_idx) = args.iter().position(|arg| arg == "--seek") {
        match args.get(seek_idx + 1).map(|s| s.parse::<u64>()) {
            Some(Ok(block)) => seek = Some(block),
            Some(Err(_)) => {
                eprintln!("ERROR: Invalid block number. Expected a non-negative integer.");
                std::process::exit(1);
            }
            None => {
                eprintln!("ERROR: --seek flag requires an argument.");
                std::process::exit(1);
            }
        }
    }

    // "-" reads stdin, which can only be consumed once
    let source: Box<dyn ByteSource> = if input == "-" {
        Box::new(Sequential::new(io::stdin().lock()))
    } else {
        match Seekable::open(input) {
            Ok(file) => Box::new(file),
            Err(e) => {
                eprintln!("ERROR: Failed to open {}: {}", input, e);
                std::process::exit(1);
            }
        }
    };

    println!("Reading CORSIKA file: {}", input);
    println!("{}", "=".repeat(60));

    let mut stream = match RawStream::new(source) {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("\nERROR: Failed to open CORSIKA file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    println!("  Layout: {}", stream.variant());
    println!("  Thinned: {}", stream.is_thinned());
    println!("  Seekable: {}", stream.is_seekable());

    if let Some(block) = seek {
        if let Err(e) = stream.seek_to(block) {
            eprintln!("\nERROR: Seek to block {} failed", block);
            eprintln!("  {}", e);
            std::process::exit(1);
        }
        println!("  Starting at block: {}", stream.position());
    }

    let start = stream.position();
    let mut tags: BTreeMap<String, u64> = BTreeMap::new();
    let mut failure = None;
    for result in stream.blocks() {
        match result {
            Ok(block) => {
                let name = block
                    .tag()
                    .map(|tag| tag.to_string())
                    .unwrap_or_else(|| "data".to_string());
                *tags.entry(name).or_insert(0) += 1;
            }
            Err(e) => failure = Some(e),
        }
    }

    println!("\nStatistics:");
    println!("  Logical blocks read: {}", stream.position() - start);
    for (name, count) in &tags {
        println!("  {:>5}: {}", name, count);
    }

    if let Some(e) = failure {
        eprintln!("\nERROR: Reading stopped at block {}", stream.position());
        eprintln!("  {}", e);
        std::process::exit(1);
    }
}
