use crate::config::RulesConfig;
use crate::error::{AppError, Result};
use crate::models::Severity;
use crate::rules::builtin_definitions;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializable form of a rule, as loaded from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Regular expression tested against a single log line
    pub pattern: String,

    /// Cause label reported when the pattern matches
    pub cause: String,

    /// Base severity contributed by a match
    pub severity: Severity,

    /// Suggestions added the first time the cause is recorded
    #[serde(default)]
    pub suggestions: Vec<String>,

    /// Match exact case (defaults to case-insensitive)
    #[serde(default)]
    pub case_sensitive: bool,
}

/// A compiled rule
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    cause: String,
    severity: Severity,
    suggestions: Vec<String>,
    case_sensitive: bool,
}

impl Rule {
    /// Compile a rule definition
    pub fn compile(definition: RuleDefinition) -> Result<Self> {
        if definition.cause.trim().is_empty() {
            return Err(AppError::Configuration(format!(
                "rule with pattern '{}' has an empty cause",
                definition.pattern
            )));
        }

        let pattern = RegexBuilder::new(&definition.pattern)
            .case_insensitive(!definition.case_sensitive)
            .build()?;

        Ok(Self {
            pattern,
            cause: definition.cause,
            severity: definition.severity,
            suggestions: definition.suggestions,
            case_sensitive: definition.case_sensitive,
        })
    }

    /// Check whether the rule matches a line
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

/// Compact view of a rule for listings
#[derive(Debug, Clone, Serialize)]
pub struct RuleSummary {
    pub cause: String,
    pub severity: Severity,
    pub pattern: String,
    pub case_sensitive: bool,
    pub suggestions: usize,
}

/// Ordered, immutable rule catalog
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// Compile rules from definitions, keeping their order
    pub fn from_definitions<I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = RuleDefinition>,
    {
        let rules = definitions
            .into_iter()
            .map(Rule::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// The built-in catalog
    pub fn builtin() -> Result<Self> {
        Self::from_definitions(builtin_definitions())
    }

    /// Append extra rules after the existing ones
    pub fn with_extra<I>(self, definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = RuleDefinition>,
    {
        let mut rules = self.rules;
        for definition in definitions {
            rules.push(Rule::compile(definition)?);
        }
        Ok(Self { rules })
    }

    /// Build the effective catalog for a configuration
    pub fn load(config: &RulesConfig) -> Result<Self> {
        let catalog = Self::builtin()?;
        match &config.extra_rules_path {
            Some(path) => {
                let extra = Self::read_definitions(path)?;
                tracing::info!(
                    path = %path.display(),
                    extra_rules = extra.len(),
                    "Loaded extra rules"
                );
                catalog.with_extra(extra)
            }
            None => Ok(catalog),
        }
    }

    /// Read rule definitions from a YAML file
    pub fn read_definitions(path: &Path) -> Result<Vec<RuleDefinition>> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("cannot read rules file {}: {}", path.display(), e))
        })?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Listing of every rule in scan order
    pub fn summaries(&self) -> Vec<RuleSummary> {
        self.rules
            .iter()
            .map(|rule| RuleSummary {
                cause: rule.cause.clone(),
                severity: rule.severity,
                pattern: rule.pattern().to_string(),
                case_sensitive: rule.is_case_sensitive(),
                suggestions: rule.suggestions.len(),
            })
            .collect()
    }
}
