use serde::{Deserialize, Serialize};

/// Setting keys
pub mod keys {
    pub const CONVERTER: &str = "converter";
}

/// Conversion service overrides held by the link store
///
/// Values here win over the environment; empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterOverrides {
    #[serde(default)]
    pub sub_api: Option<String>,
    #[serde(default)]
    pub sub_config: Option<String>,
}

impl ConverterOverrides {
    pub fn sub_api(&self) -> Option<&str> {
        non_empty(self.sub_api.as_deref())
    }

    pub fn sub_config(&self) -> Option<&str> {
        non_empty(self.sub_config.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_overrides_are_unset() {
        let overrides = ConverterOverrides {
            sub_api: Some("".to_string()),
            sub_config: Some("  ".to_string()),
        };
        assert_eq!(overrides.sub_api(), None);
        assert_eq!(overrides.sub_config(), None);
    }

    #[test]
    fn test_overrides_deserialize_partial() {
        let overrides: ConverterOverrides =
            serde_json::from_str(r#"{"sub_api":"sub.example"}"#).unwrap();
        assert_eq!(overrides.sub_api(), Some("sub.example"));
        assert_eq!(overrides.sub_config(), None);
    }
}
