//! Capture log decoding utility
//! Reads a captured KX3 command log and prints the decoded memory frames
//!
//! Output options:
//! - Text report of every decoded frame (default)
//! - JSON of decoded channels, accumulated state and run counters (--json)
//! - CSV export of decoded channels (--csv <file>)
//! - Accumulated band/transverter state (--state), with raw bytes (--raw)

use kx3_mem::bitwise::format_frequency;
use kx3_mem::core::modes::mode_label;
use kx3_mem::formats::{export_channels, load_capture, CaptureLog};
use kx3_mem::records::{encode_hex, ChannelRecord, DecodedRecord};
use kx3_mem::session::{DecodeEvent, DecodeStats};
use kx3_mem::state::{decode_memslot, StateSnapshot};
use kx3_mem::{decode_frequency, Channel};
use serde::Serialize;
use std::env;
use std::ops::RangeInclusive;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

/// Command line arguments
struct Args {
    file: String,
    filter: Option<RangeInclusive<u16>>,
    json: bool,
    csv: Option<String>,
    show_state: bool,
    show_raw: bool,
}

#[derive(Serialize)]
struct JsonReport {
    channels: Vec<Channel>,
    state: StateSnapshot,
    stats: DecodeStats,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    let args = parse_args()?;
    let log = load_capture(&args.file)?;

    let in_filter = |slot: u16| args.filter.as_ref().map_or(true, |r| r.contains(&slot));
    let channels: Vec<Channel> = log
        .channels()
        .into_iter()
        .filter(|ch| in_filter(ch.number))
        .collect();

    if let Some(path) = &args.csv {
        let rows = export_channels(path, &channels)?;
        tracing::info!("Wrote {} channels to {}", rows, path);
    }

    if args.json {
        let report = JsonReport {
            channels,
            state: log.state.snapshot(),
            stats: log.stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for event in &log.events {
        if let DecodedRecord::Channel { slot, .. } = &event.record {
            if !in_filter(*slot) {
                continue;
            }
        } else if args.filter.is_some() {
            continue;
        }
        print_event(event, args.show_raw);
    }

    if args.show_state {
        print_state(&log, args.show_raw);
    }

    Ok(())
}

/// Parse command line arguments
fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = env::args().collect();
    let mut json = false;
    let mut csv = None;
    let mut show_state = false;
    let mut show_raw = false;
    let mut positional = vec![];

    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--state" => show_state = true,
            "--raw" => show_raw = true,
            "--csv" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--csv needs an output file"))?;
                csv = Some(path.clone());
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                std::process::exit(0);
            }
            _ if !arg.starts_with('-') => positional.push(arg.clone()),
            _ => {
                eprintln!("Unknown flag: {}", arg);
                print_usage(&args[0]);
                std::process::exit(1);
            }
        }
    }

    if positional.is_empty() {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let filter = positional.get(1).map(|s| parse_filter(s)).transpose()?;

    Ok(Args {
        file: positional[0].clone(),
        filter,
        json,
        csv,
        show_state,
        show_raw,
    })
}

/// Slot filter: a single slot ("40") or an inclusive range ("32-50")
fn parse_filter(text: &str) -> anyhow::Result<RangeInclusive<u16>> {
    match text.split_once('-') {
        Some((start, end)) => {
            let start: u16 = start.parse()?;
            let end: u16 = end.parse()?;
            if start > end {
                anyhow::bail!("Empty slot range {}", text);
            }
            Ok(start..=end)
        }
        None => {
            let slot: u16 = text.parse()?;
            Ok(slot..=slot)
        }
    }
}

/// Print usage information
fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS] <capture> [slot|range]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --json         Print channels and state as JSON");
    eprintln!("  --csv <file>   Export decoded channels to CSV");
    eprintln!("  --state        Show accumulated band/transverter state");
    eprintln!("  --raw          Show raw frame bytes (debug mode)");
    eprintln!("  -h, --help     Show this help message");
    eprintln!();
    eprintln!("Set RUST_LOG=debug to trace every frame.");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} capture.log             # Decode every frame", program);
    eprintln!("  {} capture.log 40          # Channel slot 40 only", program);
    eprintln!("  {} capture.log 32-50       # Slots 32 to 50", program);
    eprintln!("  {} --csv out.csv capture.log", program);
}

fn print_event(event: &DecodeEvent, show_raw: bool) {
    let prefix = format!("{} {:04X}", event.opcode, event.address);
    match &event.record {
        DecodedRecord::Channel { slot, record } => match event.channel() {
            Some(ch) => {
                println!("{} {}", prefix, ch);
                if show_raw {
                    print_channel_raw(record);
                }
            }
            None => print_partial_channel(&prefix, *slot, record),
        },
        DecodedRecord::Command(cmd) => {
            println!(
                "{} ack len {}",
                prefix,
                cmd.length.map(|l| format!("{:02X}", l)).unwrap_or_default()
            );
        }
        DecodedRecord::BandState { slots } | DecodedRecord::TransverterState { slots }
            if slots.is_empty() =>
        {
            println!("{} state request", prefix);
        }
        DecodedRecord::BandState { slots } => {
            println!("{} band state {:?}", prefix, slots);
        }
        DecodedRecord::TransverterState { slots } => {
            println!("{} transverter state {:?}", prefix, slots);
        }
    }
}

fn print_partial_channel(prefix: &str, slot: u16, rec: &ChannelRecord) {
    print!("{} {:3} (truncated)", prefix, slot);
    if let Some(vfo_a) = &rec.vfo_a {
        print!(" A {}", format_frequency(decode_frequency(vfo_a)));
    }
    if let Some(vfo_b) = &rec.vfo_b {
        print!(" B {}", format_frequency(decode_frequency(vfo_b)));
    }
    if let Some(modes) = rec.modes {
        let (a, b) = kx3_mem::core::decode_mode(modes);
        print!(" {}/{}", mode_label(a), mode_label(b));
    }
    println!();
}

fn print_channel_raw(rec: &ChannelRecord) {
    let byte = |b: Option<u8>| b.map(|b| format!("{:02X}", b)).unwrap_or_default();
    println!(
        "    vfo a {}  vfo b {}",
        rec.vfo_a.map(|v| encode_hex(&v)).unwrap_or_default(),
        rec.vfo_b.map(|v| encode_hex(&v)).unwrap_or_default()
    );
    println!(
        "    modes {} dmode {} band {} tone {} offset {} flags {}",
        byte(rec.modes),
        byte(rec.dmode),
        byte(rec.band),
        byte(rec.subtone),
        byte(rec.offset),
        byte(rec.repeater_flags)
    );
    println!(
        "    reserved {} / {}  label {}",
        rec.reserved_a.map(|v| encode_hex(&v)).unwrap_or_default(),
        rec.reserved_b.map(|v| encode_hex(&v)).unwrap_or_default(),
        rec.label.map(|v| encode_hex(&v)).unwrap_or_default()
    );
}

fn print_state(log: &CaptureLog, show_raw: bool) {
    println!();
    println!("=== Band State ===");
    for (index, slot) in log.state.written_band_slots() {
        let view = kx3_mem::state::BandState::from_slot(slot);
        println!(
            "Band {:2}: A {:>11} B {:>11} state {}",
            index,
            format_frequency(view.vfo_a_hz),
            format_frequency(view.vfo_b_hz),
            encode_hex(&view.state)
        );
        if show_raw {
            let mem = decode_memslot(slot);
            println!("    raw {}", encode_hex(slot));
            println!(
                "    as memory slot: A {} {} B {} {} {}",
                format_frequency(mem.vfo_a_hz),
                mode_label(mem.mode_a),
                format_frequency(mem.vfo_b_hz),
                mode_label(mem.mode_b),
                mem.submode.map(|s| s.to_string()).unwrap_or_default()
            );
        }
    }

    println!();
    println!("=== Transverter State ===");
    for (index, slot) in log.state.written_transverter_slots() {
        println!("Xvtr {}: {}", index, encode_hex(slot));
    }
}
