use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One catalog response page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<PageInfo>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub records: Vec<RawRecord>,
}

/// Paging metadata returned alongside records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "totalrecords", default)]
    pub total_records: Option<u64>,
    #[serde(rename = "totalrecordsperquery", default)]
    pub records_per_query: Option<u64>,
    #[serde(default)]
    pub pages: Option<u64>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// A catalog object as delivered upstream.
///
/// Every field is optional and wrongly-typed values read as absent, so a
/// single odd record never fails the whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub primaryimageurl: Option<String>,
    #[serde(default, deserialize_with = "lenient_people")]
    pub people: Option<Vec<Person>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
}

/// A person credited on an object (artist, maker, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// `null` reads as no records; an entry that is not an object reads as an empty record
fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<RawRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            tracing::info!("Ignoring non-array records field: {}", other);
            return Ok(Vec::new());
        }
        None => return Ok(Vec::new()),
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| match entry {
            Value::Object(_) => RawRecord::deserialize(entry).unwrap_or_else(|e| {
                tracing::info!("Record {} could not be read: {}", idx, e);
                RawRecord::default()
            }),
            other => {
                tracing::info!("Record {} is not an object: {}", idx, other);
                RawRecord::default()
            }
        })
        .collect())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_people<'de, D>(deserializer: D) -> Result<Option<Vec<Person>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(mut map) => Person {
                        name: match map.remove("name") {
                            Some(Value::String(s)) => Some(s),
                            _ => None,
                        },
                    },
                    _ => Person::default(),
                })
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let json = r#"{
            "title": "[Sunset]",
            "primaryimageurl": "https://nrs.harvard.edu/urn-3:HUAM:1",
            "people": [{"name": "Claude Monet", "role": "Artist"}],
            "url": "https://harvardartmuseums.org/collections/object/1",
            "objectid": 1
        }"#;

        let record: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title.as_deref(), Some("[Sunset]"));
        assert_eq!(record.people.unwrap()[0].name.as_deref(), Some("Claude Monet"));
    }

    #[test]
    fn test_wrongly_typed_fields_read_as_absent() {
        let json = r#"{
            "title": null,
            "primaryimageurl": false,
            "people": "nobody",
            "url": {"href": "x"}
        }"#;

        let record: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, RawRecord::default());
    }

    #[test]
    fn test_people_entries_without_names() {
        let json = r#"{"title": "Vase", "people": [{"role": "Potter"}, 7]}"#;

        let record: RawRecord = serde_json::from_str(json).unwrap();
        let people = record.people.unwrap();
        assert_eq!(people.len(), 2);
        assert!(people.iter().all(|p| p.name.is_none()));
    }

    #[test]
    fn test_page_without_info() {
        let page: CatalogPage = serde_json::from_str(r#"{"records": []}"#).unwrap();
        assert!(page.info.is_none());
        assert!(page.records.is_empty());
    }

    #[test]
    fn test_non_object_records_read_as_empty() {
        let json = r#"{"records": [{"title": "Vase"}, null, 7, "x", {"title": "Bowl"}]}"#;

        let page: CatalogPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.records.len(), 5);
        assert_eq!(page.records[0].title.as_deref(), Some("Vase"));
        assert_eq!(page.records[1], RawRecord::default());
        assert_eq!(page.records[2], RawRecord::default());
        assert_eq!(page.records[4].title.as_deref(), Some("Bowl"));
    }

    #[test]
    fn test_null_or_scalar_records_field_is_empty() {
        for json in [r#"{"records": null}"#, r#"{"records": 3}"#, r#"{"records": {}}"#] {
            let page: CatalogPage = serde_json::from_str(json).unwrap();
            assert!(page.records.is_empty(), "{}", json);
        }
    }
}
