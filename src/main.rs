use arsc_entry::arsc::pool::TablePools;
use arsc_entry::{BlockReader, Entry, MemoryStringPool, ResConfig, TableEntry};
use log::info;
use std::env;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} qualifiers <QUALIFIERS> [--json]", program);
    eprintln!("       {} entry <HEX_BYTES> [--json]", program);
    std::process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        usage(&args[0]);
    }

    let command = args[1].as_str();
    let operand = &args[2];
    let as_json = args.iter().skip(3).any(|arg| arg == "--json");

    match command {
        "qualifiers" => show_qualifiers(operand, as_json),
        "entry" => show_entry(operand, as_json),
        _ => {
            eprintln!("ERROR: Unknown command: {}", command);
            usage(&args[0]);
        }
    }
}

fn show_qualifiers(text: &str, as_json: bool) {
    let mut config = ResConfig::new();
    let parse = config.parse_qualifiers(text);
    config.trim_to_minimum_size();
    info!("Parsed qualifiers {:?} into a {} byte config", text, config.config_size());

    if as_json {
        match config.to_json_string() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("ERROR: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("Qualifiers: {}", config);
        println!("  Locale: {}", config.locale());
        println!("  Config size: {} bytes", config.config_size());
        println!("  Bytes: {}", hex::encode(config.value_bytes()));
    }

    if !parse.is_ok() {
        eprintln!("Rejected qualifiers: {}", parse.rejected.join(", "));
        std::process::exit(1);
    }
}

fn show_entry(hex_bytes: &str, as_json: bool) {
    let bytes = match hex::decode(hex_bytes.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("ERROR: Invalid hex input: {}", e);
            std::process::exit(1);
        }
    };

    let mut spec = MemoryStringPool::new();
    let mut strings = MemoryStringPool::new();
    let mut pools = TablePools {
        spec: &mut spec,
        strings: &mut strings,
    };
    let mut entry = Entry::new(0x7f, 0x01, 0);
    let mut reader = BlockReader::new(&bytes);
    if let Err(e) = entry.read(&mut reader, &mut pools) {
        eprintln!("\nERROR: Failed to decode entry");
        eprintln!("  {}", e);
        std::process::exit(1);
    }
    info!("Decoded {} of {} bytes", reader.position(), bytes.len());

    if as_json {
        let json = entry.to_json(&spec, &strings);
        match serde_json::to_string_pretty(&json) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("ERROR: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let Some(table_entry) = entry.table_entry() else {
        println!("Null entry");
        return;
    };
    let header = table_entry.header();
    println!("Entry:");
    println!("  Size: {} bytes", table_entry.size());
    println!("  Key: {}", header.key());
    println!("  Public: {}, Weak: {}", header.is_public(), header.is_weak());
    match table_entry {
        TableEntry::Scalar(scalar) => {
            let value = scalar.value();
            println!("  Compact: {}", scalar.is_compact());
            println!("  Value: {} {:#010x}", value.value_type(), value.data());
        }
        TableEntry::Compound(compound) => {
            println!("  Parent: {:#010x}", compound.parent_id());
            println!("  Pairs: {}", compound.len());
            for (i, pair) in compound.pairs().iter().enumerate() {
                let value = pair.value();
                println!(
                    "  {}. {:#010x} = {} {:#010x}",
                    i + 1,
                    pair.name(),
                    value.value_type(),
                    value.data()
                );
            }
        }
    }
}
