use roxmltree::Node;
use tracing::{debug, warn};

use crate::error::{ConvertError, Result};
use crate::numeric::{format_decimal, NumericPolicy, Parsed};
use crate::schema::Schema;

/// Action whose `parameter1` is a fixed-point value scaled by 100.
pub const WAYPOINT: &str = "WAYPOINT";
/// Action whose `parameter2` is a fixed-point value scaled by 100.
pub const POSHOLD_TIME: &str = "POSHOLD_TIME";

/// represents one mission item element as found in the document,
/// positional values are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionItem {
    /// 1-based position in the item collection
    pub index: usize,
    pub no: String,
    pub action: String,
    pub lat: String,
    pub lon: String,
    pub alt: String,
    pub parameter1: String,
    pub parameter2: Option<String>,
}

/// Computed parameter columns of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedParams {
    pub p1: String,
    pub p2: Option<String>,
}

/// collects every mission item element directly under `root`, in document order
/// # Errors
/// when an item lacks one of the fields required by `schema`
pub fn parse_items(root: Node, schema: Schema) -> Result<Vec<MissionItem>> {
    root.children()
        .filter(|n| n.is_element() && n.has_tag_name(schema.item_tag()))
        .enumerate()
        .map(|(i, node)| MissionItem::from_node(node, i + 1, schema))
        .collect()
}

impl MissionItem {
    fn from_node(node: Node, index: usize, schema: Schema) -> Result<Self> {
        let field = |name: &'static str| {
            field_value(node, name).ok_or(ConvertError::MissingField { index, field: name })
        };
        Ok(MissionItem {
            index,
            no: field("no")?,
            action: field("action")?,
            lat: field("lat")?,
            lon: field("lon")?,
            alt: field("alt")?,
            parameter1: field("parameter1")?,
            parameter2: if schema.has_p2() {
                Some(field("parameter2")?)
            } else {
                None
            },
        })
    }

    /// compute `p1` (and `p2` when the item carries `parameter2`)
    pub fn derive(&self, policy: NumericPolicy) -> Result<DerivedParams> {
        let p1 = if self.action == WAYPOINT {
            format_decimal(self.decimal("parameter1", &self.parameter1, policy)? / 100.0)
        } else {
            self.integer("parameter1", &self.parameter1, policy)?.to_string()
        };
        let p2 = match &self.parameter2 {
            Some(raw) if self.action == POSHOLD_TIME => {
                Some(format_decimal(self.decimal("parameter2", raw, policy)? / 100.0))
            }
            Some(raw) => Some(self.integer("parameter2", raw, policy)?.to_string()),
            None => None,
        };
        debug!(item = self.index, action = %self.action, %p1, ?p2, "derived parameters");
        Ok(DerivedParams { p1, p2 })
    }

    fn decimal(&self, field: &'static str, raw: &str, policy: NumericPolicy) -> Result<f64> {
        self.settle(field, raw, "a decimal", policy.decimal(raw))
    }

    fn integer(&self, field: &'static str, raw: &str, policy: NumericPolicy) -> Result<i64> {
        self.settle(field, raw, "a 64-bit integer", policy.integer(raw))
    }

    fn settle<T: std::fmt::Display>(
        &self,
        field: &'static str,
        raw: &str,
        expected: &'static str,
        parsed: Parsed<T>,
    ) -> Result<T> {
        match parsed {
            Parsed::Exact(v) => Ok(v),
            Parsed::Coerced(v) => {
                warn!(
                    "mission item {}: {} value '{}' is not {}, using {}",
                    self.index, field, raw, expected, v
                );
                Ok(v)
            }
            Parsed::Invalid => Err(ConvertError::InvalidNumber {
                index: self.index,
                field,
                value: raw.to_string(),
                expected,
            }),
        }
    }
}

/// attribute value, or the trimmed text of a same-named child element
fn field_value(node: Node, name: &str) -> Option<String> {
    if let Some(v) = node.attribute(name) {
        return Some(v.to_string());
    }
    node.children()
        .find(|n| n.is_element() && n.has_tag_name(name))
        .map(|n| n.text().unwrap_or("").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(xml: &str, schema: Schema) -> Result<Vec<MissionItem>> {
        let doc = roxmltree::Document::parse(xml).unwrap();
        parse_items(doc.root_element(), schema)
    }

    fn item(action: &str, p1: &str, p2: Option<&str>) -> MissionItem {
        MissionItem {
            index: 1,
            no: "1".into(),
            action: action.into(),
            lat: "0".into(),
            lon: "0".into(),
            alt: "0".into(),
            parameter1: p1.into(),
            parameter2: p2.map(String::from),
        }
    }

    #[test]
    fn single_item_stays_a_sequence() {
        let parsed = items(
            r#"<MISSION><MISSIONITEM no="1" action="WAYPOINT" lat="10.0" lon="20.0" alt="30" parameter1="500"/></MISSION>"#,
            Schema::Legacy,
        )
        .unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].lat, "10.0");
        assert_eq!(parsed[0].parameter2, None);
    }

    #[test]
    fn items_keep_document_order_and_skip_other_elements() {
        let parsed = items(
            r#"<mission>
                 <version value="2.0"/>
                 <missionitem no="3" action="RTH" lat="0" lon="0" alt="0" parameter1="0" parameter2="0"/>
                 <mwp cx="1" cy="2"/>
                 <missionitem no="1" action="WAYPOINT" lat="1" lon="2" alt="3" parameter1="0" parameter2="0"/>
               </mission>"#,
            Schema::Modern,
        )
        .unwrap();
        let nos: Vec<&str> = parsed.iter().map(|i| i.no.as_str()).collect();
        assert_eq!(nos, ["3", "1"]);
        assert_eq!(parsed[1].index, 2);
    }

    #[test]
    fn fields_may_be_child_elements() {
        let parsed = items(
            r#"<MISSION><MISSIONITEM no="1">
                 <action>WAYPOINT</action><lat> 1.5 </lat><lon>2.5</lon>
                 <alt>30</alt><parameter1>100</parameter1>
               </MISSIONITEM></MISSION>"#,
            Schema::Legacy,
        )
        .unwrap();
        assert_eq!(parsed[0].action, "WAYPOINT");
        assert_eq!(parsed[0].lat, "1.5");
    }

    #[test]
    fn missing_field_reports_item_and_name() {
        let err = items(
            r#"<mission><missionitem no="1" action="WAYPOINT" lat="1" lon="2" alt="3" parameter1="0"/></mission>"#,
            Schema::Modern,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MissingField { index: 1, field: "parameter2" }
        ));
    }

    #[test]
    fn waypoint_parameter1_is_scaled() {
        let d = item("WAYPOINT", "1234", None).derive(NumericPolicy::Strict).unwrap();
        assert_eq!(d.p1, "12.34");
        assert_eq!(d.p2, None);
    }

    #[test]
    fn other_actions_pass_parameter1_through() {
        let d = item("RTL", "5", None).derive(NumericPolicy::Strict).unwrap();
        assert_eq!(d.p1, "5");
    }

    #[test]
    fn poshold_time_parameter2_is_scaled() {
        let d = item("POSHOLD_TIME", "30", Some("250"))
            .derive(NumericPolicy::Strict)
            .unwrap();
        assert_eq!(d.p1, "30");
        assert_eq!(d.p2.as_deref(), Some("2.5"));

        let d = item("WAYPOINT", "500", Some("250"))
            .derive(NumericPolicy::Strict)
            .unwrap();
        assert_eq!(d.p1, "5.0");
        assert_eq!(d.p2.as_deref(), Some("250"));
    }

    #[test]
    fn strict_policy_rejects_non_numeric_parameters() {
        let err = item("RTL", "abc", None)
            .derive(NumericPolicy::Strict)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "mission item 1: can't parse parameter1 value 'abc' as a 64-bit integer"
        );
    }

    #[test]
    fn out_of_range_integer_names_the_range() {
        let err = item("RTL", "9999999999999999999", None)
            .derive(NumericPolicy::Strict)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "mission item 1: can't parse parameter1 value '9999999999999999999' as a 64-bit integer"
        );
    }

    #[test]
    fn large_and_small_waypoint_values_stay_positional() {
        let d = item("WAYPOINT", "1e18", None).derive(NumericPolicy::Strict).unwrap();
        assert_eq!(d.p1, "10000000000000000.0");
        let d = item("WAYPOINT", "0.001", None).derive(NumericPolicy::Strict).unwrap();
        assert_eq!(d.p1, "0.00001");
        let d = item("WAYPOINT", "1e400", None).derive(NumericPolicy::Lenient).unwrap();
        assert_eq!(d.p1, "0.0");
    }

    #[test]
    fn lenient_policy_coerces_to_zero() {
        let d = item("WAYPOINT", "abc", Some("x"))
            .derive(NumericPolicy::Lenient)
            .unwrap();
        assert_eq!(d.p1, "0.0");
        assert_eq!(d.p2.as_deref(), Some("0"));
    }
}
