use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingSettings {
    pub max_length: usize,
    pub pattern: String,
    /// How many leading description words make up the workflow name.
    pub workflow_name_words: usize,
    pub workflow_name_suffix: String,
    pub fallback_workflow_name: String,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            max_length: 50,
            pattern: r"^[A-Z][a-zA-Z0-9\s_-]*$".to_string(),
            workflow_name_words: 5,
            workflow_name_suffix: "Workflow".to_string(),
            fallback_workflow_name: "Generated Workflow".to_string(),
        }
    }
}

/// Compiled naming rules for nodes and workflows.
#[derive(Debug, Clone)]
pub struct NamingRules {
    max_length: usize,
    pattern: Regex,
    workflow_name_words: usize,
    workflow_name_suffix: String,
    fallback_workflow_name: String,
}

impl NamingRules {
    pub fn compile(settings: NamingSettings) -> Result<Self, ConfigError> {
        let pattern = Regex::new(&settings.pattern).map_err(|e| ConfigError::InvalidPattern {
            owner: "node naming".to_string(),
            pattern: settings.pattern.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            max_length: settings.max_length,
            pattern,
            workflow_name_words: settings.workflow_name_words,
            workflow_name_suffix: settings.workflow_name_suffix,
            fallback_workflow_name: settings.fallback_workflow_name,
        })
    }

    /// Why `name` breaks the rules, or `None` when it is acceptable.
    pub fn violation(&self, name: &str) -> Option<String> {
        let length = name.chars().count();
        if length > self.max_length {
            Some(format!(
                "'{}' is {} characters long (max {})",
                name, length, self.max_length
            ))
        } else if !self.pattern.is_match(name) {
            Some(format!(
                "'{}' does not match pattern {}",
                name,
                self.pattern.as_str()
            ))
        } else {
            None
        }
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.violation(name).is_none()
    }

    /// Capitalises the first few words of the description and appends the suffix.
    pub fn workflow_name(&self, description: &str) -> String {
        let words: Vec<String> = description
            .split_whitespace()
            .take(self.workflow_name_words)
            .map(capitalize)
            .collect();
        if words.is_empty() {
            return self.fallback_workflow_name.clone();
        }
        if self.workflow_name_suffix.is_empty() {
            words.join(" ")
        } else {
            format!("{} {}", words.join(" "), self.workflow_name_suffix)
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Title-cases a semantic key such as `send_email` into `Send Email`.
pub fn title_case(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(capitalize("hELLO"), "Hello");
        assert_eq!(title_case("send_email"), "Send Email");
        assert_eq!(title_case(""), "");
    }
}
