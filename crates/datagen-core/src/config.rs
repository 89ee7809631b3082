//! Configuration documents and the configuration loader.
//!
//! A run consumes four required JSON documents and one optional one:
//!
//! | Document          | Default file name          | Required |
//! |-------------------|----------------------------|----------|
//! | schema analysis   | `schema_analysis.json`     | yes      |
//! | generation plan   | `generation_plan.json`     | yes      |
//! | value lists       | `value_lists.json`         | yes      |
//! | generation rules  | `generation_rules.json`    | yes      |
//! | cardinality rules | `cardinality_rules.json`   | no       |
//!
//! File names can be overridden by a YAML [`RunManifest`] and then by
//! explicit CLI flags.

use crate::error::ConfigError;
use crate::schema::{IdProperty, SchemaAnalysis};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default file name of the schema analysis document.
pub const DEFAULT_SCHEMA_FILENAME: &str = "schema_analysis.json";
/// Default file name of the generation plan.
pub const DEFAULT_PLAN_FILENAME: &str = "generation_plan.json";
/// Default file name of the value lists.
pub const DEFAULT_VALUE_LISTS_FILENAME: &str = "value_lists.json";
/// Default file name of the generation rules.
pub const DEFAULT_GENERATION_RULES_FILENAME: &str = "generation_rules.json";
/// Default file name of the optional cardinality rules.
pub const DEFAULT_CARDINALITY_FILENAME: &str = "cardinality_rules.json";

// ============================================================================
// Documents
// ============================================================================

/// Number of instances to generate per node label.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct GenerationPlan(pub BTreeMap<String, u64>);

impl GenerationPlan {
    /// Planned count for a label (0 when absent).
    pub fn count(&self, label: &str) -> u64 {
        self.0.get(label).copied().unwrap_or(0)
    }

    /// Iterate over `(label, count)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Sum of all planned counts.
    pub fn total_planned(&self) -> u64 {
        self.0.values().sum()
    }

    /// Whether the plan has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Candidate string values per owner (label or relationship type) and property.
///
/// Deserialization is lenient below the top level: an owner that is not an
/// object, or a property that is not a list, is dropped with a warning and
/// behaves as if no list had been supplied. Numeric and boolean entries are
/// kept as their JSON text; null and nested entries are dropped.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct ValueLists(pub HashMap<String, HashMap<String, Vec<String>>>);

impl ValueLists {
    /// Candidate values for `owner.property`, if any were supplied.
    pub fn values_for(&self, owner: &str, property: &str) -> Option<&[String]> {
        self.0
            .get(owner)
            .and_then(|props| props.get(property))
            .map(Vec::as_slice)
    }

    /// Build from a parsed document, keeping every usable list.
    pub fn from_json_map(document: serde_json::Map<String, serde_json::Value>) -> Self {
        let mut lists = HashMap::new();
        for (owner, properties) in document {
            let properties = match properties {
                serde_json::Value::Object(properties) => properties,
                other => {
                    warn!(
                        "Value lists for '{}' are not an object ({}). Ignoring them.",
                        owner, other
                    );
                    continue;
                }
            };

            let mut owner_lists = HashMap::new();
            for (property, raw) in properties {
                let entries = match raw {
                    serde_json::Value::Array(entries) => entries,
                    other => {
                        warn!(
                            "Value list for '{}.{}' is not a list ({}). Ignoring it.",
                            owner, property, other
                        );
                        continue;
                    }
                };
                owner_lists.insert(property.clone(), list_entries(&owner, &property, entries));
            }
            lists.insert(owner, owner_lists);
        }
        Self(lists)
    }
}

/// String form of each usable list entry.
fn list_entries(owner: &str, property: &str, entries: Vec<serde_json::Value>) -> Vec<String> {
    let total = entries.len();
    let mut converted = 0;
    let values: Vec<String> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(_) | serde_json::Value::Bool(_) => {
                converted += 1;
                Some(entry.to_string())
            }
            _ => None,
        })
        .collect();

    if converted > 0 {
        warn!(
            "Value list for '{}.{}' has {} non-string entries. Using their JSON text.",
            owner, property, converted
        );
    }
    let dropped = total - values.len();
    if dropped > 0 {
        warn!(
            "Value list for '{}.{}' has {} null or nested entries. Dropping them.",
            owner, property, dropped
        );
    }
    values
}

impl<'de> Deserialize<'de> for ValueLists {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let document = serde_json::Map::deserialize(deserializer)?;
        Ok(Self::from_json_map(document))
    }
}

/// Where a rule was found during lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource {
    /// Keyed by the qualified property name
    Qualified,
    /// The type's `default` entry
    Default,
}

/// A rule found for a property, still in its raw JSON form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleMatch<'a> {
    /// The raw rule
    pub rule: &'a serde_json::Value,
    /// Which key matched
    pub source: RuleSource,
}

/// Range and distribution rules keyed by lowercase type name.
///
/// Rule values are kept raw: a malformed rule for one property degrades to a
/// default for that property instead of failing the whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerationRules {
    /// `type -> (qualified name | "default") -> rule`
    #[serde(default)]
    pub type_ranges: HashMap<String, HashMap<String, serde_json::Value>>,

    /// Reserved for cross-property dependencies (not interpreted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_dependencies: Option<serde_json::Value>,

    /// Reserved for derived properties (not interpreted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_properties: Option<serde_json::Value>,
}

impl GenerationRules {
    /// Rule table for a type key, matched case-insensitively.
    fn rules_for_type(&self, type_key: &str) -> Option<&HashMap<String, serde_json::Value>> {
        self.type_ranges.get(type_key).or_else(|| {
            self.type_ranges
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(type_key))
                .map(|(_, rules)| rules)
        })
    }

    /// Look up a rule: exact qualified name first, then the type's `default`.
    pub fn lookup(&self, type_key: &str, qualified_name: &str) -> Option<RuleMatch<'_>> {
        let rules = self.rules_for_type(type_key)?;
        if let Some(rule) = rules.get(qualified_name) {
            return Some(RuleMatch {
                rule,
                source: RuleSource::Qualified,
            });
        }
        rules.get("default").map(|rule| RuleMatch {
            rule,
            source: RuleSource::Default,
        })
    }
}

/// Per-source relationship count bounds for one relationship type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardinalityRule {
    /// Minimum relationships per source node
    #[serde(default)]
    pub min: i64,
    /// Maximum relationships per source node
    #[serde(default = "default_cardinality_max")]
    pub max: i64,
}

fn default_cardinality_max() -> i64 {
    1
}

impl CardinalityRule {
    /// Create a new rule.
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

/// Cardinality rules keyed by relationship type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardinalityRules(pub HashMap<String, CardinalityRule>);

impl CardinalityRules {
    /// Rule for a relationship type.
    pub fn get(&self, rel_type: &str) -> Option<&CardinalityRule> {
        self.0.get(rel_type)
    }

    /// Parse from a JSON value, dropping (with a warning) entries that are not
    /// `{min, max}` objects. Those types fall back to hybrid pairing.
    pub fn from_json(value: serde_json::Value) -> Self {
        let serde_json::Value::Object(entries) = value else {
            warn!("Cardinality rules document is not an object. Ignoring it.");
            return Self::default();
        };

        let mut rules = HashMap::new();
        for (rel_type, raw) in entries {
            match serde_json::from_value::<CardinalityRule>(raw.clone()) {
                Ok(rule) if raw.is_object() => {
                    rules.insert(rel_type, rule);
                }
                _ => warn!(
                    "Ignoring invalid cardinality rule for '{}': {}",
                    rel_type, raw
                ),
            }
        }
        Self(rules)
    }
}

// ============================================================================
// Input locations
// ============================================================================

/// Paths of the configuration documents for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFiles {
    /// Schema analysis document
    pub schema_analysis: PathBuf,
    /// Generation plan
    pub generation_plan: PathBuf,
    /// Value lists
    pub value_lists: PathBuf,
    /// Generation rules
    pub generation_rules: PathBuf,
    /// Optional cardinality rules
    pub cardinality_rules: Option<PathBuf>,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            schema_analysis: DEFAULT_SCHEMA_FILENAME.into(),
            generation_plan: DEFAULT_PLAN_FILENAME.into(),
            value_lists: DEFAULT_VALUE_LISTS_FILENAME.into(),
            generation_rules: DEFAULT_GENERATION_RULES_FILENAME.into(),
            cardinality_rules: Some(DEFAULT_CARDINALITY_FILENAME.into()),
        }
    }
}

impl InputFiles {
    /// Resolve every relative path against `base_dir`.
    pub fn resolve_against(&self, base_dir: &Path) -> Self {
        let resolve = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                base_dir.join(p)
            }
        };
        Self {
            schema_analysis: resolve(&self.schema_analysis),
            generation_plan: resolve(&self.generation_plan),
            value_lists: resolve(&self.value_lists),
            generation_rules: resolve(&self.generation_rules),
            cardinality_rules: self.cardinality_rules.as_ref().map(resolve),
        }
    }
}

/// YAML run manifest naming the input documents and run flags.
///
/// ```yaml
/// schema_analysis_filename: schema_analysis.json
/// generation_plan_filename: generation_plan.json
/// value_lists_filename: value_lists.json
/// generation_rules_filename: generation_rules.json
/// cardinality_rules_filename: cardinality_rules.json
/// enforce_date_consistency: true
/// seed: 42
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    #[serde(default)]
    pub schema_analysis_filename: Option<PathBuf>,
    #[serde(default)]
    pub generation_plan_filename: Option<PathBuf>,
    #[serde(default)]
    pub value_lists_filename: Option<PathBuf>,
    #[serde(default)]
    pub generation_rules_filename: Option<PathBuf>,
    #[serde(default)]
    pub cardinality_rules_filename: Option<PathBuf>,
    #[serde(default)]
    pub enforce_date_consistency: Option<bool>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RunManifest {
    /// Parse a manifest from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load a manifest from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay the file names named by this manifest onto `files`.
    pub fn apply_to(&self, files: &mut InputFiles) {
        if let Some(p) = &self.schema_analysis_filename {
            files.schema_analysis = p.clone();
        }
        if let Some(p) = &self.generation_plan_filename {
            files.generation_plan = p.clone();
        }
        if let Some(p) = &self.value_lists_filename {
            files.value_lists = p.clone();
        }
        if let Some(p) = &self.generation_rules_filename {
            files.generation_rules = p.clone();
        }
        if let Some(p) = &self.cardinality_rules_filename {
            files.cardinality_rules = Some(p.clone());
        }
    }
}

// ============================================================================
// Loader
// ============================================================================

/// All configuration for one run, loaded and validated.
#[derive(Debug, Clone)]
pub struct ConfigBundle {
    /// Schema analysis
    pub schema: SchemaAnalysis,
    /// Generation plan
    pub plan: GenerationPlan,
    /// Value lists
    pub value_lists: ValueLists,
    /// Generation rules
    pub generation_rules: GenerationRules,
    /// Cardinality rules (empty when not supplied)
    pub cardinality_rules: CardinalityRules,
    /// Identifier metadata for every label that has valid metadata
    pub id_properties: BTreeMap<String, IdProperty>,
    /// Where the documents were read from
    pub files: InputFiles,
}

impl ConfigBundle {
    /// Load all documents and validate the schema against the plan.
    pub fn load(files: &InputFiles) -> Result<Self, ConfigError> {
        let schema: SchemaAnalysis = load_required(&files.schema_analysis)?;
        let plan: GenerationPlan = load_required(&files.generation_plan)?;
        let value_lists: ValueLists = load_required(&files.value_lists)?;
        let generation_rules: GenerationRules = load_required(&files.generation_rules)?;
        let cardinality_rules = match &files.cardinality_rules {
            Some(path) => load_optional_cardinality(path),
            None => CardinalityRules::default(),
        };

        Self::from_parts(
            schema,
            plan,
            value_lists,
            generation_rules,
            cardinality_rules,
            files.clone(),
        )
    }

    /// Build a bundle from already-parsed documents, validating them.
    pub fn from_parts(
        schema: SchemaAnalysis,
        plan: GenerationPlan,
        value_lists: ValueLists,
        generation_rules: GenerationRules,
        cardinality_rules: CardinalityRules,
        files: InputFiles,
    ) -> Result<Self, ConfigError> {
        if plan.is_empty() {
            return Err(ConfigError::EmptyPlan);
        }
        if schema.nodes.is_empty() {
            return Err(ConfigError::NoNodes);
        }

        let id_properties = validate_id_properties(&schema, &plan)?;

        Ok(Self {
            schema,
            plan,
            value_lists,
            generation_rules,
            cardinality_rules,
            id_properties,
            files,
        })
    }
}

/// Resolve identifier metadata for every schema label.
///
/// Labels with a positive planned count must have valid metadata; for the
/// others invalid metadata only means they cannot take part in relationships.
fn validate_id_properties(
    schema: &SchemaAnalysis,
    plan: &GenerationPlan,
) -> Result<BTreeMap<String, IdProperty>, ConfigError> {
    let mut id_properties = BTreeMap::new();
    for label in schema.nodes.keys() {
        match schema.id_property(label) {
            Ok(Some(id)) => {
                id_properties.insert(label.clone(), id);
            }
            Ok(None) => {}
            Err(e) if plan.count(label) > 0 => return Err(e),
            Err(e) => warn!("Label '{}' is not planned and has invalid ID metadata: {}", label, e),
        }
    }
    Ok(id_properties)
}

fn load_required<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    info!("Loading required file: {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn load_optional_cardinality(path: &Path) -> CardinalityRules {
    info!("Loading optional file: {}", path.display());
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(
                "Optional file {} could not be read, using no cardinality rules: {}",
                path.display(),
                e
            );
            return CardinalityRules::default();
        }
    };
    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(value) => CardinalityRules::from_json(value),
        Err(e) => {
            warn!(
                "Invalid JSON in optional file {}, using no cardinality rules: {}",
                path.display(),
                e
            );
            CardinalityRules::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn write_minimal_config(dir: &Path) {
        write(
            dir,
            DEFAULT_SCHEMA_FILENAME,
            r#"{"nodes": {"Customer": {"properties": [{"name": "customerID", "type": "String"}],
                                      "id_property": "customerID"}},
                "relationships": []}"#,
        );
        write(dir, DEFAULT_PLAN_FILENAME, r#"{"Customer": 3}"#);
        write(dir, DEFAULT_VALUE_LISTS_FILENAME, r#"{}"#);
        write(dir, DEFAULT_GENERATION_RULES_FILENAME, r#"{"type_ranges": {}}"#);
    }

    #[test]
    fn test_rule_lookup_order() {
        let rules: GenerationRules = serde_json::from_value(json!({
            "type_ranges": {
                "integer": {
                    "default": [0, 10],
                    "Order.quantity": [1, 5]
                }
            }
        }))
        .unwrap();

        let specific = rules.lookup("integer", "Order.quantity").unwrap();
        assert_eq!(specific.source, RuleSource::Qualified);
        assert_eq!(specific.rule, &json!([1, 5]));

        let fallback = rules.lookup("integer", "Order.total").unwrap();
        assert_eq!(fallback.source, RuleSource::Default);
        assert_eq!(fallback.rule, &json!([0, 10]));

        assert!(rules.lookup("float", "Order.total").is_none());
    }

    #[test]
    fn test_rule_lookup_type_key_case_insensitive() {
        let rules: GenerationRules = serde_json::from_value(json!({
            "type_ranges": {"Float": {"default": [1.0, 2.0]}}
        }))
        .unwrap();
        assert!(rules.lookup("float", "X.y").is_some());
    }

    #[test]
    fn test_value_lists_lookup() {
        let lists: ValueLists =
            serde_json::from_value(json!({"Customer": {"name": ["Ada", "Grace"]}})).unwrap();
        assert_eq!(
            lists.values_for("Customer", "name"),
            Some(&["Ada".to_string(), "Grace".to_string()][..])
        );
        assert!(lists.values_for("Customer", "email").is_none());
        assert!(lists.values_for("Order", "name").is_none());
    }

    #[test]
    fn test_value_lists_tolerate_malformed_entries() {
        let lists: ValueLists = serde_json::from_str(
            r#"{
                "Customer": {"name": ["Ann", "Bob"]},
                "Order": {"status": [1, 2], "code": [true, null, ["x"], "A7"], "note": "n/a"},
                "Broken": ["not", "an", "object"]
            }"#,
        )
        .unwrap();

        assert_eq!(
            lists.values_for("Customer", "name"),
            Some(&["Ann".to_string(), "Bob".to_string()][..])
        );
        assert_eq!(
            lists.values_for("Order", "status"),
            Some(&["1".to_string(), "2".to_string()][..])
        );
        assert_eq!(
            lists.values_for("Order", "code"),
            Some(&["true".to_string(), "A7".to_string()][..])
        );
        assert!(lists.values_for("Order", "note").is_none());
        assert!(lists.values_for("Broken", "name").is_none());
    }

    #[test]
    fn test_value_lists_document_must_be_an_object() {
        assert!(serde_json::from_str::<ValueLists>("[1, 2]").is_err());
    }

    #[test]
    fn test_cardinality_rules_drop_invalid_entries() {
        let rules = CardinalityRules::from_json(json!({
            "PLACED": {"min": 1, "max": 3},
            "CONTAINS": {"max": 2},
            "BROKEN": [1, 2]
        }));
        assert_eq!(rules.get("PLACED"), Some(&CardinalityRule::new(1, 3)));
        assert_eq!(rules.get("CONTAINS"), Some(&CardinalityRule::new(0, 2)));
        assert!(rules.get("BROKEN").is_none());
    }

    #[test]
    fn test_manifest_overrides_file_names() {
        let manifest = RunManifest::from_yaml(
            r#"
schema_analysis_filename: my_schema.json
cardinality_rules_filename: rules/cardinality.json
enforce_date_consistency: true
seed: 7
"#,
        )
        .unwrap();

        let mut files = InputFiles::default();
        manifest.apply_to(&mut files);
        assert_eq!(files.schema_analysis, PathBuf::from("my_schema.json"));
        assert_eq!(files.generation_plan, PathBuf::from(DEFAULT_PLAN_FILENAME));
        assert_eq!(
            files.cardinality_rules,
            Some(PathBuf::from("rules/cardinality.json"))
        );
        assert_eq!(manifest.seed, Some(7));
        assert_eq!(manifest.enforce_date_consistency, Some(true));
    }

    #[test]
    fn test_load_bundle_without_cardinality_file() {
        let dir = TempDir::new().unwrap();
        write_minimal_config(dir.path());

        let files = InputFiles::default().resolve_against(dir.path());
        let bundle = ConfigBundle::load(&files).unwrap();

        assert_eq!(bundle.plan.count("Customer"), 3);
        assert!(bundle.cardinality_rules.0.is_empty());
        assert_eq!(bundle.id_properties["Customer"].name, "customerID");
    }

    #[test]
    fn test_load_bundle_with_one_bad_value_list() {
        let dir = TempDir::new().unwrap();
        write_minimal_config(dir.path());
        write(
            dir.path(),
            DEFAULT_VALUE_LISTS_FILENAME,
            r#"{"Customer": {"name": ["Ann", "Bob"]}, "Order": {"status": [1, 2], "note": null}}"#,
        );

        let files = InputFiles::default().resolve_against(dir.path());
        let bundle = ConfigBundle::load(&files).unwrap();

        assert_eq!(bundle.value_lists.values_for("Customer", "name").map(<[_]>::len), Some(2));
        assert!(bundle.value_lists.values_for("Order", "note").is_none());
    }

    #[test]
    fn test_missing_required_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_minimal_config(dir.path());
        fs::remove_file(dir.path().join(DEFAULT_VALUE_LISTS_FILENAME)).unwrap();

        let files = InputFiles::default().resolve_against(dir.path());
        assert!(matches!(
            ConfigBundle::load(&files),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_invalid_json_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_minimal_config(dir.path());
        write(dir.path(), DEFAULT_PLAN_FILENAME, "{not json");

        let files = InputFiles::default().resolve_against(dir.path());
        assert!(matches!(
            ConfigBundle::load(&files),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn test_invalid_optional_cardinality_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        write_minimal_config(dir.path());
        write(dir.path(), DEFAULT_CARDINALITY_FILENAME, "[[[");

        let files = InputFiles::default().resolve_against(dir.path());
        let bundle = ConfigBundle::load(&files).unwrap();
        assert!(bundle.cardinality_rules.0.is_empty());
    }

    #[test]
    fn test_planned_label_without_id_property_is_fatal() {
        let schema: SchemaAnalysis = serde_json::from_value(json!({
            "nodes": {"Ghost": {"properties": [{"name": "x", "type": "String"}]}}
        }))
        .unwrap();

        let mut plan = GenerationPlan::default();
        plan.0.insert("Ghost".into(), 2);
        let result = ConfigBundle::from_parts(
            schema.clone(),
            plan,
            ValueLists::default(),
            GenerationRules::default(),
            CardinalityRules::default(),
            InputFiles::default(),
        );
        assert!(matches!(result, Err(ConfigError::MissingIdProperty { .. })));

        // The same label with a zero count is tolerated.
        let mut plan = GenerationPlan::default();
        plan.0.insert("Ghost".into(), 0);
        let bundle = ConfigBundle::from_parts(
            schema,
            plan,
            ValueLists::default(),
            GenerationRules::default(),
            CardinalityRules::default(),
            InputFiles::default(),
        )
        .unwrap();
        assert!(bundle.id_properties.is_empty());
    }

    #[test]
    fn test_empty_plan_is_fatal() {
        let result = ConfigBundle::from_parts(
            SchemaAnalysis::default(),
            GenerationPlan::default(),
            ValueLists::default(),
            GenerationRules::default(),
            CardinalityRules::default(),
            InputFiles::default(),
        );
        assert!(matches!(result, Err(ConfigError::EmptyPlan)));
    }
}
