use std::fmt;

use roxmltree::Node;

use crate::error::{ConvertError, Result};

/// Mission XML flavour.
///
/// `Legacy` is the uppercase MultiWii layout (`<MISSION><MISSIONITEM .../>`),
/// `Modern` the lowercase INAV layout which also carries `parameter2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Legacy,
    Modern,
}

impl Schema {
    /// Tag name of a single mission item element.
    pub fn item_tag(self) -> &'static str {
        match self {
            Schema::Legacy => "MISSIONITEM",
            Schema::Modern => "missionitem",
        }
    }

    pub fn root_tag(self) -> &'static str {
        match self {
            Schema::Legacy => "MISSION",
            Schema::Modern => "mission",
        }
    }

    pub fn has_p2(self) -> bool {
        matches!(self, Schema::Modern)
    }

    pub fn header(self) -> &'static [&'static str] {
        match self {
            Schema::Legacy => &["no", "wp", "lat", "lon", "alt", "p1"],
            Schema::Modern => &["no", "wp", "lat", "lon", "alt", "p1", "p2"],
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Legacy => write!(f, "legacy"),
            Schema::Modern => write!(f, "modern"),
        }
    }
}

/// How the schema of an input document is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaSelection {
    #[default]
    Auto,
    Forced(Schema),
}

impl SchemaSelection {
    pub fn resolve(self, root: Node) -> Result<Schema> {
        match self {
            SchemaSelection::Forced(schema) => Ok(schema),
            SchemaSelection::Auto => detect(root),
        }
    }
}

/// Picks the schema from the item elements present under `root`,
/// falling back to the root tag name for documents without items.
pub fn detect(root: Node) -> Result<Schema> {
    let mut legacy = false;
    let mut modern = false;
    for child in root.children().filter(|n| n.is_element()) {
        if child.has_tag_name(Schema::Legacy.item_tag()) {
            legacy = true;
        } else if child.has_tag_name(Schema::Modern.item_tag()) {
            modern = true;
        }
    }

    match (legacy, modern) {
        (true, true) => Err(ConvertError::MixedSchema),
        (true, false) => Ok(Schema::Legacy),
        (false, true) => Ok(Schema::Modern),
        (false, false) => [Schema::Legacy, Schema::Modern]
            .into_iter()
            .find(|s| root.has_tag_name(s.root_tag()))
            .ok_or_else(|| ConvertError::MissingCollection {
                root: root.tag_name().name().to_string(),
            }),
    }
}
