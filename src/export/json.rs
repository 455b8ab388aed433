use crate::error::ExportError;
use crate::export::ResultRow;
use crate::model::{Entity, Model};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn export_json<P: AsRef<Path>>(
    model: &Model,
    entities: &[&Entity],
    path: P,
) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;
    write_json(model, entities, BufWriter::new(file))
}

/// Write the selected entities as a pretty-printed array of [`ResultRow`]s.
pub fn write_json<W: Write>(
    model: &Model,
    entities: &[&Entity],
    mut out: W,
) -> Result<(), ExportError> {
    let rows = ResultRow::collect(model, entities)?;
    serde_json::to_writer_pretty(&mut out, &rows)?;
    out.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })
}
