use crate::error::ExportError;
use crate::export::ResultRow;
use crate::model::{Entity, Model};
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn export_csv<P: AsRef<Path>>(
    model: &Model,
    entities: &[&Entity],
    path: P,
) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;
    write_csv(model, entities, file)
}

pub fn write_csv<W: Write>(
    model: &Model,
    entities: &[&Entity],
    out: W,
) -> Result<(), ExportError> {
    let rows = ResultRow::collect(model, entities)?;
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(["ID", "Class", "Name", "Global ID", "Container"])?;

    for row in &rows {
        let id = row.id.to_string();
        writer.write_record([
            id.as_str(),
            row.class.as_str(),
            row.name.as_str(),
            row.global_id.as_str(),
            row.container.as_deref().unwrap_or(""),
        ])?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}
