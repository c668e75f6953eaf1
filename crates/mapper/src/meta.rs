use tracing::{debug, trace};

use crate::datatype::classify;
use crate::error::{MappingError, Result};
use crate::field::{extract, extract_length, humanize};
use crate::model::{ColumnDescription, Dataset, FieldViewModel, MappedDataset, Resource};

/// Builds the view-model for one (resource, column) pair.
pub fn map_field(resource: &Resource, description: &ColumnDescription) -> FieldViewModel {
    let classification = classify(description);

    FieldViewModel {
        name: description.field.clone(),
        label: humanize(&description.field),
        value: extract(resource, &description.field).cloned(),
        optional: description.is_nullable(),
        default: description.default_text(),
        length: extract_length(&description.r#type),
        datatype: classification.datatype,
        datatype_group: classification.datatype_group,
        component: classification.component,
    }
}

/// Maps every resource against every column description.
///
/// The output has one row per resource and one field per description, both in
/// input order. The input dataset is left untouched.
pub fn meta(dataset: &Dataset) -> Result<MappedDataset> {
    let resources = dataset.data.as_ref().ok_or(MappingError::MissingData)?;
    let descriptions = dataset
        .descriptions
        .as_ref()
        .ok_or(MappingError::MissingDescriptions)?;

    let data: Vec<Vec<FieldViewModel>> = resources
        .iter()
        .map(|resource| {
            descriptions
                .iter()
                .map(|description| map_field(resource, description))
                .collect()
        })
        .collect();

    debug!(
        resources = data.len(),
        fields = descriptions.len(),
        "mapped dataset"
    );
    trace!(?data, "field view-models");

    Ok(MappedDataset {
        data,
        descriptions: descriptions.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::{Component, DatatypeGroup};
    use serde_json::json;

    #[test]
    fn test_map_field_nullable_with_default() {
        let description = ColumnDescription::new("status", "varchar(16)")
            .nullable()
            .with_default("draft");
        let resource = Resource::new(1).with_attribute("status", "published");

        let field = map_field(&resource, &description);
        assert_eq!(field.label, "Status");
        assert_eq!(field.value, Some(json!("published")));
        assert!(field.optional);
        assert_eq!(field.default, "draft");
        assert_eq!(field.length, 16);
        assert_eq!(field.datatype, "varchar");
        assert_eq!(field.datatype_group, None);
        assert_eq!(field.component, Component::Input);
    }

    #[test]
    fn test_meta_rejects_missing_sections() {
        let no_data = Dataset {
            data: None,
            descriptions: Some(vec![]),
        };
        assert!(matches!(meta(&no_data), Err(MappingError::MissingData)));

        let no_descriptions = Dataset {
            data: Some(vec![]),
            descriptions: None,
        };
        assert!(matches!(
            meta(&no_descriptions),
            Err(MappingError::MissingDescriptions)
        ));
    }

    #[test]
    fn test_meta_does_not_touch_input() {
        let dataset = Dataset::new(
            vec![Resource::new(1).with_attribute("age", "30")],
            vec![ColumnDescription::new("age", "int(3)")],
        );
        let before = dataset.clone();

        let mapped = meta(&dataset).unwrap();
        assert_eq!(dataset, before);
        assert_eq!(mapped.data[0][0].datatype_group, Some(DatatypeGroup::Number));
        assert_eq!(mapped.descriptions, before.descriptions.unwrap());
    }
}
