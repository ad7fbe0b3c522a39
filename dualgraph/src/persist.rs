//! Hand-off of an edge table to a shapefile writer.

use std::path::Path;

use crate::config::ProjectionOptions;
use crate::error::{DualGraphError, GenericError, Result};
use crate::shapes::ShapeTable;
use crate::table::{EdgeTable, Reproject};
use crate::Graph;

/// Writer that persists an edge table at a path. Format and I/O errors are its own.
pub trait EdgeSink {
    fn write(&mut self, table: &EdgeTable, path: &Path) -> std::result::Result<(), GenericError>;
}

/// Checks the `.shp` extension and asks `sink` to write `table` at `path`.
pub fn write_edge_table(table: &EdgeTable, path: impl AsRef<Path>, sink: &mut dyn EdgeSink) -> Result<()> {
    let path = path.as_ref();
    let is_shp = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("shp"));
    if !is_shp {
        return Err(DualGraphError::InvalidPath(path.to_path_buf()));
    }
    log::info!("writing {} edges to {}", table.len(), path.display());
    sink.write(table, path).map_err(DualGraphError::Sink)
}

/// Projects `g` onto `shapes` and writes the result, without keeping the table.
pub fn edges_to_shapefile(
    g: &Graph,
    shapes: &ShapeTable,
    opts: &ProjectionOptions,
    reproject: Option<&dyn Reproject>,
    path: impl AsRef<Path>,
    sink: &mut dyn EdgeSink,
) -> Result<()> {
    let table = crate::algorithms::projection::edges_to_table(g, shapes, opts, reproject)?;
    write_edge_table(&table, path, sink)
}
