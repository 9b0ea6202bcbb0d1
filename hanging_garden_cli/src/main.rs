// CLI entry point for the Hanging Garden world inspector.
//
// Generates a world from a seed, optionally runs it forward a number of
// simulation ticks, and prints entity counts (or the full world snapshot)
// as JSON. Useful for eyeballing generation output and for scripting
// regression checks against pinned seeds.
//
// Usage:
//   garden [OPTIONS]
//     --seed <N>     World seed (default: 42)
//     --ticks <N>    Simulation ticks to run before printing (default: 0)
//     --dump         Print the full world snapshot instead of the summary
//     --pretty       Pretty-print the JSON output

use hanging_garden_sim::r#gen::generate_world;
use hanging_garden_sim::update::{Msg, update};
use hanging_garden_sim::world::summarize_world;

// Matches the ~20 Hz fast-tick cadence the reducer is tuned for.
const TICK_DT: f32 = 0.05;

struct Options {
    seed: u32,
    ticks: u64,
    dump: bool,
    pretty: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: 0,
            dump: false,
            pretty: false,
        }
    }
}

fn main() {
    let options = parse_args();

    let mut world = generate_world(options.seed);
    for _ in 0..options.ticks {
        world = update(&Msg::DayCycleTick { dt: TICK_DT }, &world);
        world = update(&Msg::Tick { dt: TICK_DT }, &world);
    }

    let json = if options.dump {
        if options.pretty {
            serde_json::to_string_pretty(&world)
        } else {
            serde_json::to_string(&world)
        }
    } else {
        let summary = summarize_world(&world);
        if options.pretty {
            serde_json::to_string_pretty(&summary)
        } else {
            serde_json::to_string(&summary)
        }
    };

    match json {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize world: {e}");
            std::process::exit(1);
        }
    }
}

/// Parse command-line arguments into `Options`. Uses simple
/// `std::env::args()` matching — no clap dependency.
fn parse_args() -> Options {
    let mut options = Options::default();
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                options.seed = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--seed requires a valid number");
                    std::process::exit(1);
                });
            }
            "--ticks" => {
                i += 1;
                options.ticks = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--ticks requires a valid number");
                    std::process::exit(1);
                });
            }
            "--dump" => {
                options.dump = true;
            }
            "--pretty" => {
                options.pretty = true;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    options
}

fn print_usage() {
    println!("Usage: garden [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --seed <N>     World seed (default: 42)");
    println!("  --ticks <N>    Simulation ticks to run before printing (default: 0)");
    println!("  --dump         Print the full world snapshot instead of the summary");
    println!("  --pretty       Pretty-print the JSON output");
    println!("  --help, -h     Show this help");
}
