use serde::{Deserialize, Serialize};

use crate::model::ColumnDescription;

/// Coarse classification of a SQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatatypeGroup {
    Number,
    Text,
    Datetime,
}

/// UI control used to render a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    #[default]
    Input,
    Textarea,
    Calendar,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatatypeRule {
    pub group: DatatypeGroup,
    pub keywords: &'static [&'static str],
    pub component: Component,
}

impl DatatypeRule {
    pub fn matches(&self, datatype: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| keyword.eq_ignore_ascii_case(datatype))
    }
}

/// Rules are scanned in order and the first match wins.
pub const DATATYPES: &[DatatypeRule] = &[
    DatatypeRule {
        group: DatatypeGroup::Number,
        keywords: &[
            "tinyint", "smallint", "int", "bigint", "mediumint", "float", "double", "decimal",
        ],
        component: Component::Input,
    },
    DatatypeRule {
        group: DatatypeGroup::Text,
        keywords: &["tinytext", "text", "mediumtext", "longtext"],
        component: Component::Textarea,
    },
    DatatypeRule {
        group: DatatypeGroup::Datetime,
        keywords: &["date", "datetime", "timestamp", "time"],
        component: Component::Calendar,
    },
];

/// Comment token that turns a recognised column into a toggle.
pub const BOOL_MARKER: &str = "bool";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub datatype: String,
    pub datatype_group: Option<DatatypeGroup>,
    pub component: Component,
}

/// Leading alphabetic run of a SQL type string: `varchar(255)` gives `varchar`.
/// Empty when the type does not start with a letter.
pub fn base_type(type_string: &str) -> &str {
    let end = type_string
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(type_string.len());
    &type_string[..end]
}

pub fn find_rule(datatype: &str) -> Option<&'static DatatypeRule> {
    DATATYPES.iter().find(|rule| rule.matches(datatype))
}

pub fn classify(description: &ColumnDescription) -> Classification {
    let datatype = base_type(&description.r#type).to_string();

    let Some(rule) = find_rule(&datatype) else {
        return Classification {
            datatype,
            datatype_group: None,
            component: Component::Input,
        };
    };

    let component = if description
        .comment
        .split_whitespace()
        .any(|token| token == BOOL_MARKER)
    {
        Component::Toggle
    } else {
        rule.component
    };

    Classification {
        datatype,
        datatype_group: Some(rule.group),
        component,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(r#type: &str, comment: &str) -> ColumnDescription {
        ColumnDescription::new("c", r#type).with_comment(comment)
    }

    #[test]
    fn test_base_type() {
        assert_eq!(base_type("varchar(255)"), "varchar");
        assert_eq!(base_type("int(11) unsigned"), "int");
        assert_eq!(base_type("DATETIME"), "DATETIME");
        assert_eq!(base_type("(11)"), "");
        assert_eq!(base_type(""), "");
    }

    #[test]
    fn test_number_group() {
        let classification = classify(&column("int(11)", ""));
        assert_eq!(classification.datatype, "int");
        assert_eq!(classification.datatype_group, Some(DatatypeGroup::Number));
        assert_eq!(classification.component, Component::Input);
    }

    #[test]
    fn test_bool_comment_forces_toggle() {
        let classification = classify(&column("tinyint(1)", "is active bool"));
        assert_eq!(classification.datatype_group, Some(DatatypeGroup::Number));
        assert_eq!(classification.component, Component::Toggle);

        // substring is not enough
        let classification = classify(&column("tinyint(1)", "boolean flag"));
        assert_eq!(classification.component, Component::Input);
    }

    #[test]
    fn test_bool_comment_ignored_without_rule() {
        let classification = classify(&column("varchar(255)", "bool"));
        assert_eq!(classification.datatype, "varchar");
        assert_eq!(classification.datatype_group, None);
        assert_eq!(classification.component, Component::Input);
    }

    #[test]
    fn test_text_and_datetime_groups() {
        let text = classify(&column("mediumtext", ""));
        assert_eq!(text.datatype_group, Some(DatatypeGroup::Text));
        assert_eq!(text.component, Component::Textarea);

        let date = classify(&column("TIMESTAMP", ""));
        assert_eq!(date.datatype, "TIMESTAMP");
        assert_eq!(date.datatype_group, Some(DatatypeGroup::Datetime));
        assert_eq!(date.component, Component::Calendar);
    }

    #[test]
    fn test_malformed_type_falls_back_to_input() {
        let classification = classify(&column("", ""));
        assert_eq!(classification.datatype, "");
        assert_eq!(classification.datatype_group, None);
        assert_eq!(classification.component, Component::Input);
    }

    #[test]
    fn test_rules_are_disjoint() {
        for (i, rule) in DATATYPES.iter().enumerate() {
            for keyword in rule.keywords {
                assert_eq!(find_rule(keyword).map(|r| r.group), Some(DATATYPES[i].group));
            }
        }
    }
}
