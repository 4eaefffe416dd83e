//! Binary entry point for the `lineage` composition query CLI.
#![forbid(unsafe_code)]

use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sombra_lineage::{
    cli::{self, OutputFormat},
    storage::import::{load_store, EdgeImportConfig},
    check_window, Composition, CompositionError, DeviceId, NodeId, SampleId, TimeInterval,
    Timestamp, TraversalConfig,
};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "lineage",
    version,
    about = "Time-aware composition queries over device/sample edges",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(long, global = true, value_name = "CSV", help = "Edge file to load")]
    edges: Option<PathBuf>,

    #[arg(long, global = true, value_name = "TOML", help = "Traversal config file")]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        conflicts_with = "config",
        help = "Use tight traversal limits instead of the config file"
    )]
    strict: bool,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for results"
    )]
    format: OutputFormat,

    #[arg(
        long,
        global = true,
        help = "Accept edges that reuse a slot during overlapping intervals"
    )]
    lenient: bool,

    #[arg(short, long, global = true, help = "Log traversal details to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Copy)]
struct WindowArgs {
    #[arg(long, value_name = "TIME", help = "Window begin (RFC 3339 or epoch ms)")]
    begin: Option<Timestamp>,

    #[arg(long, value_name = "TIME", help = "Window end, exclusive")]
    end: Option<Timestamp>,
}

impl WindowArgs {
    fn interval(self) -> Result<TimeInterval, CompositionError> {
        check_window(TimeInterval::new(self.begin, self.end))
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Samples used together with a device")]
    Samples {
        #[arg(value_name = "DEVICE")]
        device: DeviceId,
        #[command(flatten)]
        window: WindowArgs,
    },

    #[command(about = "Devices a sample was used together with")]
    Devices {
        #[arg(value_name = "SAMPLE")]
        sample: SampleId,
        #[command(flatten)]
        window: WindowArgs,
    },

    #[command(about = "Everything installed below a device, with slot paths")]
    Contents {
        #[arg(value_name = "DEVICE")]
        device: DeviceId,
        #[command(flatten)]
        window: WindowArgs,
    },

    #[command(about = "Top-level devices containing a node")]
    Roots {
        #[arg(value_name = "NODE")]
        node: NodeId,
        #[command(flatten)]
        window: WindowArgs,
    },

    #[command(about = "Device filling a slot path for a whole window")]
    Resolve {
        #[arg(value_name = "DEVICE")]
        device: DeviceId,
        #[arg(long, value_name = "TIME")]
        begin: Timestamp,
        #[arg(long, value_name = "TIME")]
        end: Timestamp,
        #[arg(value_name = "SLOT", help = "Slot names from DEVICE downwards")]
        path: Vec<String>,
    },

    #[command(about = "Device holding a device at an instant")]
    Parent {
        #[arg(value_name = "DEVICE")]
        device: DeviceId,
        #[arg(long, value_name = "TIME")]
        at: Timestamp,
    },

    #[command(about = "Slots of a device filled at an instant")]
    Slots {
        #[arg(value_name = "DEVICE")]
        device: DeviceId,
        #[arg(long, value_name = "TIME")]
        at: Timestamp,
    },

    #[command(about = "Components of a device during a window")]
    Components {
        #[arg(value_name = "DEVICE")]
        device: DeviceId,
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long, help = "Include components present for only part of the window")]
        include_overlaps: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    cli::init_tracing(args.verbose);

    let config = if args.strict {
        TraversalConfig::strict()
    } else {
        TraversalConfig::load_or_default(args.config.as_deref())?
    };
    let edges = args
        .edges
        .clone()
        .ok_or("no edge file given; pass --edges <CSV>")?;
    let mut import_cfg = EdgeImportConfig::new(&edges);
    import_cfg.lenient = args.lenient;
    let (store, summary) = load_store(&import_cfg)?;
    debug!(edges = summary.edges_imported, ?config, "cli.store.ready");

    let comp = Composition::with_config(store, config);
    let format = args.format;
    match args.command {
        Command::Samples { device, window } => {
            let usages = comp.collect_samples(device, window.interval()?).await?;
            cli::emit(format, &usages, || cli::print_usages(&usages))?;
        }
        Command::Devices { sample, window } => {
            let usages = comp.collect_devices(sample, window.interval()?).await?;
            cli::emit(format, &usages, || cli::print_usages(&usages))?;
        }
        Command::Contents { device, window } => {
            let found = comp
                .collect_properties_with_path(device, window.interval()?)
                .await?;
            let hits = found.into_nodes();
            cli::emit(format, &hits, || cli::print_hits(&hits))?;
        }
        Command::Roots { node, window } => {
            let roots = comp.find_root_devices(node, window.interval()?).await?;
            cli::emit(format, &roots, || cli::print_roots(&roots))?;
        }
        Command::Resolve {
            device,
            begin,
            end,
            path,
        } => {
            let found = comp
                .resolve_device_at_path(device, &path, begin, end)
                .await?;
            cli::emit(format, &found, || println!("{found}"))?;
        }
        Command::Parent { device, at } => {
            let parent = comp.parent(device, at).await?;
            cli::emit(format, &parent, || cli::print_node(parent.map(NodeId::from)))?;
        }
        Command::Slots { device, at } => {
            let slots = comp.active_slots(device, at).await?;
            cli::emit(format, &slots, || cli::print_slots(&slots))?;
        }
        Command::Components {
            device,
            window,
            include_overlaps,
        } => {
            let found = comp
                .components(device, window.interval()?, include_overlaps)
                .await?;
            cli::emit(format, &found, || cli::print_hits(&found))?;
        }
    }

    Ok(())
}
