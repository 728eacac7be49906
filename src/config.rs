//! Import filters read from flags or the environment.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LIST_SEPARATOR: Regex = Regex::new(r"\s*,\s*").expect("Invalid separator regex");
}

/// What a bulk import fetches and how it treats failures
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportConfig {
    /// Restrict the import to these resource types (all registered when unset)
    pub resources: Option<Vec<String>>,
    /// Only resources carrying these tags
    pub tags: Vec<String>,
    /// Only resources whose name contains this text
    pub name: Option<String>,
    /// Keep importing other resource types when one fails
    pub continue_on_error: bool,
}

impl ImportConfig {
    /// Build from raw comma-separated values (e.g. `RESOURCE`, `TAGS`, `NAME`)
    pub fn from_filters(resource: Option<&str>, tags: Option<&str>, name: Option<&str>) -> Self {
        let resources = resource.map(split_list).filter(|list| !list.is_empty());

        Self {
            resources,
            tags: tags.map(split_list).unwrap_or_default(),
            name: name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            continue_on_error: false,
        }
    }

    /// Keep importing other resource types when one fails
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }
}

/// Split a comma-separated list, dropping blank entries
pub fn split_list(value: &str) -> Vec<String> {
    LIST_SEPARATOR
        .split(value.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("monitor,dash"), vec!["monitor", "dash"]);
        assert_eq!(split_list(" monitor , dash ,"), vec!["monitor", "dash"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_from_filters() {
        let config = ImportConfig::from_filters(
            Some("monitor, dash"),
            Some("team:ops,env:prod"),
            Some(" cpu "),
        );

        assert_eq!(
            config.resources,
            Some(vec!["monitor".to_string(), "dash".to_string()])
        );
        assert_eq!(config.tags, vec!["team:ops", "env:prod"]);
        assert_eq!(config.name, Some("cpu".to_string()));
        assert!(!config.continue_on_error);
    }

    #[test]
    fn test_from_filters_empty_values_are_unset() {
        let config = ImportConfig::from_filters(Some(""), Some(""), Some(""));
        assert_eq!(config, ImportConfig::default());
    }

    #[test]
    fn test_with_continue_on_error() {
        let config = ImportConfig::default().with_continue_on_error(true);
        assert!(config.continue_on_error);
    }
}
