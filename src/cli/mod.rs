#![forbid(unsafe_code)]

//! Output and logging helpers shared by the `lineage` binary.
//!
//! Results are either pretty JSON (the serde shape of the library types) or
//! a compact line-oriented text rendering.

use std::error::Error;
use std::fmt::Display;

use clap::ValueEnum;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::storage::Edge;
use crate::traversal::{Hit, Root, Usage};
use crate::types::{NodeId, SlotPath};

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "sombra_lineage=debug";

/// Output format for command results.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Line-oriented text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Installs a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug output for
/// this crate.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

/// Prints `value` as JSON, or runs `printer` for text output.
pub fn emit<T, F>(format: OutputFormat, value: &T, printer: F) -> Result<(), Box<dyn Error>>
where
    T: Serialize + ?Sized,
    F: FnOnce(),
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{json}");
        }
        OutputFormat::Text => printer(),
    }
    Ok(())
}

/// One block per target, one indented line per merged timeframe.
pub fn print_usages<T: Display>(usages: &[Usage<T>]) {
    if usages.is_empty() {
        println!("(none)");
        return;
    }
    for usage in usages {
        println!("{}", usage.target);
        for frame in &usage.timeframes {
            println!("  {} via {}", frame.interval, display_path(&frame.path));
        }
    }
}

/// One line per raw hit.
pub fn print_hits<T: Display>(hits: &[Hit<T>]) {
    if hits.is_empty() {
        println!("(none)");
        return;
    }
    for hit in hits {
        println!("{} {} at {}", hit.id, hit.interval, display_path(&hit.path));
    }
}

/// One line per root device.
pub fn print_roots(roots: &[Root]) {
    if roots.is_empty() {
        println!("(none)");
        return;
    }
    for root in roots {
        println!("{} -> {}", root.device, display_path(&root.path));
    }
}

/// One line per filled slot.
pub fn print_slots(slots: &[Edge]) {
    if slots.is_empty() {
        println!("(none)");
        return;
    }
    for edge in slots {
        let end = edge
            .end
            .map(|end| end.to_string())
            .unwrap_or_else(|| "+inf".to_owned());
        println!("{} = {} [{}, {})", edge.name, edge.target, edge.begin, end);
    }
}

/// Prints a single optional node.
pub fn print_node(node: Option<NodeId>) {
    match node {
        Some(node) => println!("{node}"),
        None => println!("(none)"),
    }
}

fn display_path(path: &SlotPath) -> String {
    if path.is_empty() {
        "(self)".to_owned()
    } else {
        path.to_string()
    }
}
