use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::api::client::PricesClient;
use crate::errors::Result;

/// Build an id -> name map from a mapping array, skipping entries without both keys
pub fn parse_item_mapping(content: &Value) -> HashMap<String, String> {
    let Some(items) = content.as_array() else {
        return HashMap::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let id = match item.get("id")? {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.clone(),
                _ => return None,
            };
            let name = item.get("name")?.as_str()?;
            Some((id, name.to_string()))
        })
        .collect()
}

pub async fn load_item_mapping_file(path: &Path) -> Result<HashMap<String, String>> {
    let content = tokio::fs::read(path).await?;
    let json: Value = serde_json::from_slice(&content)?;
    Ok(parse_item_mapping(&json))
}

/// Mapping from `path`, falling back to the API. Empty if neither is available.
pub async fn resolve_item_mapping(path: &Path, prices: &PricesClient) -> HashMap<String, String> {
    match load_item_mapping_file(path).await {
        Ok(mapping) => {
            tracing::info!(
                "Loaded {} item mappings from {}",
                mapping.len(),
                path.display()
            );
            return mapping;
        }
        Err(e) => tracing::warn!("Error loading item mapping from {}: {}", path.display(), e),
    }

    match prices.item_mapping().await {
        Ok(mapping) => {
            tracing::info!("Loaded {} item mappings from the prices API", mapping.len());
            mapping
        }
        Err(e) => {
            tracing::error!("Error loading item mapping: {}", e);
            HashMap::new()
        }
    }
}

/// Display name for an item, with a placeholder for unmapped ids
pub fn item_name(names: &HashMap<String, String>, item_id: &str) -> String {
    names
        .get(item_id)
        .cloned()
        .unwrap_or_else(|| format!("Unknown Item ({})", item_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_skips_incomplete_entries() {
        let content = json!([
            {"id": 4151, "name": "Abyssal whip", "members": true, "limit": 70},
            {"id": 561, "name": "Nature rune"},
            {"id": 2},
            {"name": "Nameless"},
            {"id": "995", "name": "Coins"},
            "not an object"
        ]);

        let mapping = parse_item_mapping(&content);
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping["4151"], "Abyssal whip");
        assert_eq!(mapping["561"], "Nature rune");
        assert_eq!(mapping["995"], "Coins");
    }

    #[test]
    fn test_parse_non_array_is_empty() {
        assert!(parse_item_mapping(&json!({"id": 1, "name": "x"})).is_empty());
    }

    #[test]
    fn test_item_name_fallback() {
        let mut names = HashMap::new();
        names.insert("4151".to_string(), "Abyssal whip".to_string());

        assert_eq!(item_name(&names, "4151"), "Abyssal whip");
        assert_eq!(item_name(&names, "30000"), "Unknown Item (30000)");
    }

    #[tokio::test]
    async fn test_load_mapping_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 2, "name": "Cannonball"}}]"#).unwrap();

        let mapping = load_item_mapping_file(file.path()).await.unwrap();
        assert_eq!(mapping["2"], "Cannonball");
    }

    #[tokio::test]
    async fn test_load_missing_or_invalid_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("mapping.json");
        tokio_test::assert_err!(load_item_mapping_file(&missing).await);

        std::fs::write(&missing, "{ not json").unwrap();
        tokio_test::assert_err!(load_item_mapping_file(&missing).await);
    }
}
