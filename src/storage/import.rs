//! Loading composition edges from CSV.
//!
//! One edge per row. Columns are located by header name (case-insensitive);
//! an empty `end` cell marks an edge that is still installed.
//!
//! ```text
//! owner,name,target,begin,end
//! device:1,furnace,device:2,2024-01-01T00:00:00Z,
//! device:2,tube,sample:7,1704067200000,1704153600000
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use super::{Edge, MemoryEdgeStore, StoreError};
use crate::types::{DeviceId, NodeId, Timestamp};

/// Column names used when reading an edge CSV.
#[derive(Debug, Clone)]
pub struct EdgeColumns {
    /// Owning device column.
    pub owner: String,
    /// Slot name column.
    pub name: String,
    /// Target node column.
    pub target: String,
    /// Installation time column.
    pub begin: String,
    /// Removal time column (optional cell).
    pub end: String,
}

impl Default for EdgeColumns {
    fn default() -> Self {
        Self {
            owner: "owner".into(),
            name: "name".into(),
            target: "target".into(),
            begin: "begin".into(),
            end: "end".into(),
        }
    }
}

/// Configuration for importing edges from a CSV file.
#[derive(Debug, Clone)]
pub struct EdgeImportConfig {
    /// Path to the CSV file containing edge data.
    pub path: PathBuf,
    /// Header names of the edge columns.
    pub columns: EdgeColumns,
    /// Skip the slot-exclusivity check when inserting.
    pub lenient: bool,
}

impl EdgeImportConfig {
    /// Default column layout for the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            columns: EdgeColumns::default(),
            lenient: false,
        }
    }
}

/// Summary statistics from an import operation.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    /// Total number of edges imported.
    pub edges_imported: u64,
    /// Edges that are still installed (open end).
    pub open_edges: u64,
}

/// Reads the configured file into a fresh store.
pub fn load_store(cfg: &EdgeImportConfig) -> Result<(MemoryEdgeStore, ImportSummary), StoreError> {
    let edges = read_edges_from_path(&cfg.path, &cfg.columns)?;
    let store = if cfg.lenient {
        MemoryEdgeStore::lenient()
    } else {
        MemoryEdgeStore::new()
    };
    let summary = import_into(&store, edges)?;
    info!(
        path = %cfg.path.display(),
        edges = summary.edges_imported,
        open = summary.open_edges,
        "import.edges.loaded"
    );
    Ok((store, summary))
}

/// Inserts `edges` into `store`, stopping at the first rejected edge.
pub fn import_into(
    store: &MemoryEdgeStore,
    edges: impl IntoIterator<Item = Edge>,
) -> Result<ImportSummary, StoreError> {
    let mut summary = ImportSummary::default();
    for edge in edges {
        if edge.end.is_none() {
            summary.open_edges += 1;
        }
        store.insert(edge)?;
        summary.edges_imported += 1;
    }
    Ok(summary)
}

/// Parses every edge in the CSV file at `path`.
pub fn read_edges_from_path(path: &Path, columns: &EdgeColumns) -> Result<Vec<Edge>, StoreError> {
    let reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    read_records(reader, columns)
}

/// Parses every edge from an in-memory or streamed CSV source.
pub fn read_edges<R: Read>(source: R, columns: &EdgeColumns) -> Result<Vec<Edge>, StoreError> {
    let reader = ReaderBuilder::new().flexible(true).from_reader(source);
    read_records(reader, columns)
}

struct ColumnIndex {
    owner: usize,
    name: usize,
    target: usize,
    begin: usize,
    end: Option<usize>,
}

fn read_records<R: Read>(
    mut reader: csv::Reader<R>,
    columns: &EdgeColumns,
) -> Result<Vec<Edge>, StoreError> {
    let headers = reader.headers()?.clone();
    let index = ColumnIndex {
        owner: find_column(&headers, &columns.owner)?,
        name: find_column(&headers, &columns.name)?,
        target: find_column(&headers, &columns.target)?,
        begin: find_column(&headers, &columns.begin)?,
        end: headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(&columns.end)),
    };

    let mut edges = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |pos| pos.line());
        edges.push(parse_record(&record, &index, line)?);
    }
    debug!(edges = edges.len(), "import.edges.parsed");
    Ok(edges)
}

fn parse_record(record: &StringRecord, index: &ColumnIndex, line: u64) -> Result<Edge, StoreError> {
    let invalid = |reason: String| StoreError::InvalidRecord { line, reason };

    let owner: DeviceId = get_required(record, index.owner, "owner", line)?
        .parse()
        .map_err(|err| invalid(format!("{err}")))?;
    let name = get_required(record, index.name, "name", line)?.to_owned();
    let target: NodeId = get_required(record, index.target, "target", line)?
        .parse()
        .map_err(|err| invalid(format!("{err}")))?;
    let begin: Timestamp = get_required(record, index.begin, "begin", line)?
        .parse()
        .map_err(|err| invalid(format!("{err}")))?;
    let end = match index.end.and_then(|idx| record.get(idx)).map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(
            raw.parse::<Timestamp>()
                .map_err(|err| invalid(format!("{err}")))?,
        ),
        _ => None,
    };

    Ok(Edge {
        owner,
        name,
        target,
        begin,
        end,
    })
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize, StoreError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| StoreError::InvalidRecord {
            line: 1,
            reason: format!("column '{name}' not found"),
        })
}

fn get_required<'a>(
    record: &'a StringRecord,
    idx: usize,
    name: &str,
    line: u64,
) -> Result<&'a str, StoreError> {
    record
        .get(idx)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| StoreError::InvalidRecord {
            line,
            reason: format!("missing value for column '{name}'"),
        })
}
