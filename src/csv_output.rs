use std::io::Write;

use csv::{QuoteStyle, WriterBuilder};
use tracing::warn;

use crate::error::Result;
use crate::mission::{DerivedParams, MissionItem};
use crate::schema::Schema;

/// One output line, fields in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    fields: Vec<String>,
}

impl CsvRow {
    pub fn new(item: MissionItem, derived: DerivedParams) -> Self {
        let mut fields = vec![
            item.no,
            item.action,
            item.lat,
            item.lon,
            item.alt,
            derived.p1,
        ];
        fields.extend(derived.p2);
        for f in &fields {
            if f.contains([',', '"', '\n', '\r']) {
                warn!(
                    "mission item {}: field '{}' is written unquoted and will break the CSV layout",
                    item.index, f
                );
            }
        }
        CsvRow { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// writes the schema header followed by every row, unquoted, `\n` terminated
pub fn write_csv<W: Write>(writer: W, schema: Schema, rows: &[CsvRow]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);
    wtr.write_record(schema.header())?;
    for row in rows {
        wtr.write_record(row.fields())?;
    }
    wtr.flush()?;
    Ok(())
}
