//! Property value synthesis.
//!
//! [`PropertySynthesizer`] produces one value for one declared property.
//! The rule source depends on the declared type:
//!
//! | Type       | Source                                   | No rule        | Malformed rule       |
//! |------------|------------------------------------------|----------------|----------------------|
//! | String     | value list `owner.property`              | `""`           | -                    |
//! | Integer    | `type_ranges.integer` `[min, max]`       | `0`            | `[0, 100]`           |
//! | Float      | `type_ranges.float` `[min, max]`         | `0.0`          | `[0.0, 1.0]`         |
//! | Boolean    | `type_ranges.boolean` `{probability_true}` | p = 0.5      | p = 0.5              |
//! | Date       | `type_ranges.date` `[start, end]`        | today          | `['-1Y', 'NOW']`     |
//! | DateTime   | `type_ranges.datetime` `[start, end]`    | now            | `['-1Y', 'NOW']`     |
//!
//! Under [`FallbackPolicy::Permissive`] every fallback logs a warning and
//! generation continues. Under [`FallbackPolicy::Strict`] the first fallback
//! is returned as a [`SynthesisError`].

use crate::date_expr::{DateExprError, DateResolver};
use crate::generators::{
    generate_bool, generate_date_between, generate_datetime_between, generate_float_range,
    generate_int_range, pick_from_list,
};
use chrono::{NaiveDate, NaiveDateTime};
use datagen_core::{
    GeneratedNode, GenerationRules, PropertyDefinition, PropertyMap, PropertyType, PropertyValue,
    RuleMatch, RuleSource, ValueLists,
};
use rand::Rng;
use serde_json::Value;
use tracing::{debug, warn};

/// Default window for date and datetime rules that cannot be read.
const DEFAULT_DATE_WINDOW: (&str, &str) = ("-1Y", "NOW");

/// Default range for integer rules that cannot be read.
const DEFAULT_INT_RANGE: (i64, i64) = (0, 100);

/// Default range for float rules that cannot be read.
const DEFAULT_FLOAT_RANGE: (f64, f64) = (0.0, 1.0);

/// Default probability of `true` for booleans.
const DEFAULT_PROBABILITY_TRUE: f64 = 0.5;

/// What to do when a property's rule cannot be applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Log a warning and use a type-appropriate default
    #[default]
    Permissive,
    /// Fail the run
    Strict,
}

/// Error type for property synthesis. Only returned under
/// [`FallbackPolicy::Strict`].
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// A String property has no (or an empty) value list
    #[error("No value list found for String property '{qualified}'")]
    MissingValueList { qualified: String },

    /// No rule (specific or default) exists for the property's type
    #[error("No generation rule (specific or default) found for '{qualified}' of type '{property_type}'")]
    MissingRule {
        qualified: String,
        property_type: PropertyType,
    },

    /// The rule exists but has the wrong shape
    #[error("Invalid {property_type} rule for '{qualified}' ({reason}). Rule: {rule}")]
    InvalidRule {
        qualified: String,
        property_type: PropertyType,
        rule: Value,
        reason: &'static str,
    },

    /// A date expression in the rule could not be resolved
    #[error("Invalid date expression in rule for '{qualified}': {source}")]
    DateExpr {
        qualified: String,
        #[source]
        source: DateExprError,
    },

    /// The declared type has no generator
    #[error("Unsupported property type '{property_type}' for '{qualified}'")]
    UnsupportedType {
        qualified: String,
        property_type: PropertyType,
    },
}

/// Temporal context from the two endpoints of a relationship.
///
/// Used to keep relationship dates from preceding the dates of the nodes
/// they connect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndpointContext {
    /// Latest Date/DateTime property of either endpoint
    pub earliest_allowed: Option<NaiveDateTime>,
}

impl EndpointContext {
    /// Collect the latest temporal property of the given endpoint nodes.
    pub fn from_endpoints(source: Option<&GeneratedNode>, target: Option<&GeneratedNode>) -> Self {
        let earliest_allowed = source
            .into_iter()
            .chain(target)
            .flat_map(|node| node.properties.values())
            .filter_map(PropertyValue::as_datetime)
            .max();
        Self { earliest_allowed }
    }
}

/// Synthesizes property values from value lists and generation rules.
#[derive(Debug, Clone)]
pub struct PropertySynthesizer<'a> {
    value_lists: &'a ValueLists,
    rules: &'a GenerationRules,
    dates: DateResolver,
    policy: FallbackPolicy,
}

impl<'a> PropertySynthesizer<'a> {
    /// Create a synthesizer over the loaded configuration.
    pub fn new(
        value_lists: &'a ValueLists,
        rules: &'a GenerationRules,
        dates: DateResolver,
        policy: FallbackPolicy,
    ) -> Self {
        Self {
            value_lists,
            rules,
            dates,
            policy,
        }
    }

    /// The date resolver used for date rules.
    pub fn dates(&self) -> &DateResolver {
        &self.dates
    }

    /// Synthesize all declared properties of one node or relationship.
    ///
    /// `skip` names a property that is assigned elsewhere (the node's
    /// identifier). Untyped properties are skipped with a warning and null
    /// values are left out of the map.
    pub fn synthesize_properties<R: Rng>(
        &self,
        rng: &mut R,
        owner: &str,
        properties: &[PropertyDefinition],
        skip: Option<&str>,
        context: Option<&EndpointContext>,
    ) -> Result<PropertyMap, SynthesisError> {
        let mut values = PropertyMap::new();
        for definition in properties {
            if definition.name.is_empty() {
                warn!("Skipping unnamed property of '{}'", owner);
                continue;
            }
            if skip == Some(definition.name.as_str()) {
                continue;
            }
            let Some(property_type) = &definition.property_type else {
                warn!(
                    "Property '{}' of '{}' has no type defined in schema. Skipping.",
                    definition.name, owner
                );
                continue;
            };

            let qualified = format!("{}.{}", owner, definition.name);
            let value = self.synthesize(rng, owner, &qualified, property_type, context)?;
            if !value.is_null() {
                values.insert(definition.name.clone(), value);
            }
        }
        Ok(values)
    }

    /// Synthesize one value.
    ///
    /// `owner` is the node label or relationship type, `qualified` the
    /// `Owner.property` rule key.
    pub fn synthesize<R: Rng>(
        &self,
        rng: &mut R,
        owner: &str,
        qualified: &str,
        property_type: &PropertyType,
        context: Option<&EndpointContext>,
    ) -> Result<PropertyValue, SynthesisError> {
        match property_type {
            PropertyType::String => self.synthesize_string(rng, owner, qualified),
            PropertyType::Integer => self.synthesize_integer(rng, qualified),
            PropertyType::Float => self.synthesize_float(rng, qualified),
            PropertyType::Boolean => self.synthesize_boolean(rng, qualified),
            PropertyType::Date | PropertyType::DateTime => {
                self.synthesize_temporal(rng, qualified, property_type, context)
            }
            PropertyType::Unsupported(_) => self.fallback(
                SynthesisError::UnsupportedType {
                    qualified: qualified.to_string(),
                    property_type: property_type.clone(),
                },
                "Returning null",
                PropertyValue::Null,
            ),
        }
    }

    fn synthesize_string<R: Rng>(
        &self,
        rng: &mut R,
        owner: &str,
        qualified: &str,
    ) -> Result<PropertyValue, SynthesisError> {
        let simple = qualified
            .rsplit_once('.')
            .map_or(qualified, |(_, name)| name);

        let picked = self
            .value_lists
            .values_for(owner, simple)
            .and_then(|values| pick_from_list(rng, values));

        match picked {
            Some(value) => Ok(PropertyValue::String(value.clone())),
            None => self.fallback(
                SynthesisError::MissingValueList {
                    qualified: qualified.to_string(),
                },
                "Returning empty string",
                PropertyValue::String(String::new()),
            ),
        }
    }

    fn synthesize_integer<R: Rng>(
        &self,
        rng: &mut R,
        qualified: &str,
    ) -> Result<PropertyValue, SynthesisError> {
        let property_type = PropertyType::Integer;
        let Some(found) = self.find_rule(&property_type, qualified) else {
            return self.fallback(
                self.missing_rule(qualified, property_type),
                "Using 0",
                PropertyValue::Integer(0),
            );
        };

        let (min, max) = match parse_int_range(found.rule) {
            Ok(range) => range,
            Err(reason) => self.fallback(
                invalid_rule(qualified, property_type, found.rule, reason),
                "Using default range [0, 100]",
                DEFAULT_INT_RANGE,
            )?,
        };
        Ok(PropertyValue::Integer(generate_int_range(rng, min, max)))
    }

    fn synthesize_float<R: Rng>(
        &self,
        rng: &mut R,
        qualified: &str,
    ) -> Result<PropertyValue, SynthesisError> {
        let property_type = PropertyType::Float;
        let Some(found) = self.find_rule(&property_type, qualified) else {
            return self.fallback(
                self.missing_rule(qualified, property_type),
                "Using 0.0",
                PropertyValue::Float(0.0),
            );
        };

        let (min, max) = match parse_float_range(found.rule) {
            Ok(range) => range,
            Err(reason) => self.fallback(
                invalid_rule(qualified, property_type, found.rule, reason),
                "Using default range [0.0, 1.0]",
                DEFAULT_FLOAT_RANGE,
            )?,
        };
        Ok(PropertyValue::Float(generate_float_range(rng, min, max)))
    }

    fn synthesize_boolean<R: Rng>(
        &self,
        rng: &mut R,
        qualified: &str,
    ) -> Result<PropertyValue, SynthesisError> {
        let property_type = PropertyType::Boolean;
        let probability = match self.find_rule(&property_type, qualified) {
            // Booleans normally have no rule table.
            None => DEFAULT_PROBABILITY_TRUE,
            Some(found) => match parse_probability(found.rule) {
                Ok(p) if (0.0..=1.0).contains(&p) => p,
                Ok(p) => {
                    warn!(
                        "Boolean probability {} for '{}' is outside [0.0, 1.0]. Clamping.",
                        p, qualified
                    );
                    p.clamp(0.0, 1.0)
                }
                Err(reason) => self.fallback(
                    invalid_rule(qualified, property_type, found.rule, reason),
                    "Using probability 0.5",
                    DEFAULT_PROBABILITY_TRUE,
                )?,
            },
        };
        Ok(PropertyValue::Bool(generate_bool(rng, probability)))
    }

    fn synthesize_temporal<R: Rng>(
        &self,
        rng: &mut R,
        qualified: &str,
        property_type: &PropertyType,
        context: Option<&EndpointContext>,
    ) -> Result<PropertyValue, SynthesisError> {
        let want_datetime = *property_type == PropertyType::DateTime;
        let Some(found) = self.find_rule(&property_type, qualified) else {
            let now = self.dates.now();
            let fallback_value = if want_datetime {
                PropertyValue::DateTime(now)
            } else {
                PropertyValue::Date(now.date())
            };
            return self.fallback(
                self.missing_rule(qualified, property_type.clone()),
                "Using current date",
                fallback_value,
            );
        };

        let (start_expr, end_expr) = match parse_date_window(found.rule) {
            Ok(window) => window,
            Err(reason) => self.fallback(
                invalid_rule(qualified, property_type.clone(), found.rule, reason),
                "Using default window ['-1Y', 'NOW']",
                DEFAULT_DATE_WINDOW,
            )?,
        };

        let mut start = self.resolve_expr(qualified, start_expr)?;
        let mut end = self.resolve_expr(qualified, end_expr)?;
        if start > end {
            warn!(
                "Start '{}' ({}) is after end '{}' ({}) for '{}'. Swapping them.",
                start_expr, start, end_expr, end, qualified
            );
            std::mem::swap(&mut start, &mut end);
        }

        if let Some(floor) = context.and_then(|c| c.earliest_allowed) {
            if floor > start {
                debug!("Raising window start for '{}' to {}", qualified, floor);
                start = floor;
                if start > end {
                    end = start;
                }
            }
        }

        if want_datetime {
            Ok(PropertyValue::DateTime(generate_datetime_between(
                rng, start, end,
            )))
        } else {
            Ok(PropertyValue::Date(date_between(rng, start, end)))
        }
    }

    /// Resolve one date expression under the active policy.
    fn resolve_expr(&self, qualified: &str, expr: &str) -> Result<NaiveDateTime, SynthesisError> {
        match self.policy {
            FallbackPolicy::Permissive => Ok(self.dates.resolve_datetime(expr)),
            FallbackPolicy::Strict => {
                self.dates
                    .try_resolve(expr)
                    .map_err(|source| SynthesisError::DateExpr {
                        qualified: qualified.to_string(),
                        source,
                    })
            }
        }
    }

    /// Rule for a property: its qualified entry, else the type's `default`.
    fn find_rule(&self, property_type: &PropertyType, qualified: &str) -> Option<RuleMatch<'a>> {
        let found = self.rules.lookup(&property_type.rule_key(), qualified)?;
        if found.source == RuleSource::Default {
            debug!(
                "No {} rule for '{}'. Using the type default {}.",
                property_type, qualified, found.rule
            );
        }
        Some(found)
    }

    fn missing_rule(&self, qualified: &str, property_type: PropertyType) -> SynthesisError {
        SynthesisError::MissingRule {
            qualified: qualified.to_string(),
            property_type,
        }
    }

    /// Apply the fallback policy: warn and substitute, or fail.
    fn fallback<T>(&self, error: SynthesisError, action: &str, value: T) -> Result<T, SynthesisError> {
        match self.policy {
            FallbackPolicy::Strict => Err(error),
            FallbackPolicy::Permissive => {
                warn!("{}. {}.", error, action);
                Ok(value)
            }
        }
    }
}

/// Draw a date in a window whose bounds carry a time of day.
///
/// A floor with a time of day still allows its own calendar day.
fn date_between<R: Rng>(rng: &mut R, start: NaiveDateTime, end: NaiveDateTime) -> NaiveDate {
    generate_date_between(rng, start.date(), end.date())
}

fn invalid_rule(
    qualified: &str,
    property_type: PropertyType,
    rule: &Value,
    reason: &'static str,
) -> SynthesisError {
    SynthesisError::InvalidRule {
        qualified: qualified.to_string(),
        property_type,
        rule: rule.clone(),
        reason,
    }
}

fn pair(rule: &Value) -> Result<(&Value, &Value), &'static str> {
    match rule.as_array().map(Vec::as_slice) {
        Some([a, b]) => Ok((a, b)),
        _ => Err("expected a two-element list"),
    }
}

fn parse_int_range(rule: &Value) -> Result<(i64, i64), &'static str> {
    let (a, b) = pair(rule)?;
    let to_int = |v: &Value| -> Option<i64> {
        v.as_i64().or_else(|| {
            v.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        })
    };
    match (to_int(a), to_int(b)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err("expected integer bounds"),
    }
}

fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_float_range(rule: &Value) -> Result<(f64, f64), &'static str> {
    let (a, b) = pair(rule)?;
    match (as_number(a), as_number(b)) {
        (Some(a), Some(b)) if a.is_finite() && b.is_finite() && (b - a).is_finite() => Ok((a, b)),
        (Some(_), Some(_)) => Err("bounds must be finite"),
        _ => Err("expected numeric bounds"),
    }
}

fn parse_probability(rule: &Value) -> Result<f64, &'static str> {
    rule.get("probability_true")
        .ok_or("expected an object with 'probability_true'")
        .and_then(|p| as_number(p).ok_or("'probability_true' is not a number"))
        .and_then(|p| {
            if p.is_nan() {
                Err("'probability_true' is not a number")
            } else {
                Ok(p)
            }
        })
}

fn parse_date_window(rule: &Value) -> Result<(&str, &str), &'static str> {
    let (a, b) = pair(rule)?;
    match (a.as_str(), b.as_str()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err("expected date expression strings"),
    }
}
