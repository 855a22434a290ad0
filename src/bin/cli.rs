//! BlockVault CLI
//!
//! Creates device files and fetches blocks from them.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use blockvault::{BlockStore, DeviceBuilder, Geometry};

/// BlockVault CLI
#[derive(Parser, Debug)]
#[command(name = "blockvault")]
#[command(about = "Flat-file content-addressable block store")]
#[command(version)]
struct Args {
    /// Path to the block device file
    #[arg(short, long, default_value = "block_device.dat")]
    device: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new device file with the deterministic block layout
    Create,

    /// Fetch blocks by key (defaults to the three sample keys)
    Fetch {
        /// Keys to fetch
        keys: Vec<String>,
    },

    /// List every block's tag and payload length from the metadata index
    Info,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blockvault=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(2);
    }
}

fn run(args: Args) -> blockvault::Result<()> {
    let geometry = Geometry::default();

    match args.command {
        Commands::Create => {
            let info = DeviceBuilder::new(&args.device, geometry).build()?;
            println!(
                "Block device created at {} ({} blocks, {} bytes)",
                info.path.display(),
                info.block_count,
                info.file_size
            );
        }

        Commands::Fetch { keys } => {
            let keys = if keys.is_empty() {
                vec![
                    "sample_hash_1".to_string(),
                    "sample_hash_2".to_string(),
                    "sample_hash_3".to_string(),
                ]
            } else {
                keys
            };

            let store = BlockStore::open(&args.device, geometry)?;
            let responses = store.fetch_many(&keys)?;

            for response in responses {
                println!("Key: {}", response.key);
                println!("Data: {} bytes", response.payload.len());
                println!("-------------------------");
            }
        }

        Commands::Info => {
            let store = BlockStore::open(&args.device, geometry)?;
            let rows = store
                .with_index(|index| {
                    index
                        .iter()
                        .map(|(slot, entry)| (slot, entry.tag, entry.payload_len))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();

            for (slot, tag, payload_len) in rows {
                println!(
                    "block {:>3}  tag {:>12}  payload {:>4} bytes",
                    slot, tag, payload_len
                );
            }
        }
    }

    Ok(())
}
