use std::io;

use thiserror::Error;

/// Everything that can abort a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("can't read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("can't parse an XML document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("no MISSIONITEM or missionitem elements under <{root}>")]
    MissingCollection { root: String },

    #[error("document mixes MISSIONITEM and missionitem elements")]
    MixedSchema,

    #[error("mission item {index} has no '{field}' field")]
    MissingField { index: usize, field: &'static str },

    #[error("mission item {index}: can't parse {field} value '{value}' as {expected}")]
    InvalidNumber {
        index: usize,
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("can't write CSV output: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
