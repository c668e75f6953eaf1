use serde_json::Value;

use crate::model::Resource;

/// Name of the primary key column. Its value lives at the top level of a
/// resource; every other column is looked up under `attributes`.
pub const ID_FIELD: &str = "id";

/// Label token written in capitals by [`humanize`].
const ID_TOKEN: &str = "id";

/// Turns a column name into a form label: `user_id` becomes `User ID`.
pub fn humanize(name: &str) -> String {
    name.split(['_', ' '])
        .filter(|token| !token.is_empty())
        .map(|token| {
            if token == ID_TOKEN {
                return "ID".to_string();
            }

            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn extract<'a>(resource: &'a Resource, field: &str) -> Option<&'a Value> {
    if field == ID_FIELD {
        return resource.id.as_ref();
    }

    resource.attributes.as_ref()?.get(field)
}

/// Concatenates every digit of a raw SQL type. `decimal(10,2)` yields `102`.
pub fn extract_length(type_string: &str) -> u64 {
    let digits: String = type_string.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return 0;
    }

    digits.parse().unwrap_or_else(|_| {
        tracing::warn!(r#type = type_string, "column length overflows u64, using 0");
        0
    })
}
