use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

use tracing::info;

pub mod csv_output;
pub mod error;
pub mod mission;
pub mod numeric;
pub mod schema;

pub use csv_output::{write_csv, CsvRow};
pub use error::{ConvertError, Result};
pub use mission::{MissionItem, POSHOLD_TIME, WAYPOINT};
pub use numeric::NumericPolicy;
pub use schema::{Schema, SchemaSelection};

/// Conversion settings, built by the CLI from its arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub schema: SchemaSelection,
    pub numeric: NumericPolicy,
}

/// A fully converted document, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub schema: Schema,
    pub rows: Vec<CsvRow>,
}

impl Conversion {
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        write_csv(writer, self.schema, &self.rows)
    }
}

/// read the whole mission document from `path`, or from stdin when
/// `path` is absent or `-`
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            info!("processing {}", p.display());
            fs::read_to_string(p).map_err(|source| ConvertError::Read {
                path: p.display().to_string(),
                source,
            })
        }
        _ => {
            info!("processing <stdin>");
            let mut content = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut content)
                .map_err(|source| ConvertError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(content)
        }
    }
}

/// parses a mission XML document into CSV rows
/// # Errors
/// on malformed XML, an unrecognised layout, missing item fields
/// or, under [`NumericPolicy::Strict`], non-numeric parameters
pub fn convert(content: &str, options: &Options) -> Result<Conversion> {
    let doc = roxmltree::Document::parse_with_options(
        content,
        roxmltree::ParsingOptions {
            allow_dtd: true,
            nodes_limit: 100000,
        },
    )?;
    let root = doc.root_element();
    let schema = options.schema.resolve(root)?;
    info!("using {} schema", schema);

    let rows = mission::parse_items(root, schema)?
        .into_iter()
        .map(|item| -> Result<CsvRow> {
            let derived = item.derive(options.numeric)?;
            Ok(CsvRow::new(item, derived))
        })
        .collect::<Result<Vec<CsvRow>>>()?;
    info!("converted {} mission items", rows.len());
    Ok(Conversion { schema, rows })
}

/// read, convert and write one document, returning the number of data rows.
/// Nothing is written unless the whole document converts.
pub fn run<W: Write>(path: Option<&Path>, options: &Options, writer: W) -> Result<usize> {
    let content = read_input(path)?;
    let conversion = convert(&content, options)?;
    conversion.write_to(writer)?;
    Ok(conversion.rows.len())
}
