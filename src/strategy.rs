// Strategy parameters
//
// A strategy is an immutable record of weights, thresholds and flags. Bots get
// their own copy by merging an override map onto the defaults with `resolve`.
// Overrides are forgiving: blanks are skipped, values are coerced to the
// parameter's type, and unknown names are ignored.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upper bound for the openness look-ahead depth when no override is given
pub const DEFAULT_OPENNESS_DEPTH_CAP: i32 = 8;

/// External parameter names, in camelCase
pub const PARAMETER_NAMES: [&str; 15] = [
    "healthThreshold",
    "aggression",
    "foodWeight",
    "spaceWeight",
    "escapeRouteWeight",
    "opennessWeight",
    "avoidLargerSnakes",
    "centerPreference",
    "enemyPredictionWeight",
    "trapAvoidance",
    "lookaheadDepth",
    "growthPriority",
    "targetLead",
    "trappingAggression",
    "opennessDepthCap",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrategyConfig {
    /// Below this health (after growth adjustment) the snake seeks food
    pub health_threshold: i32,
    /// 0..1, hunting only starts at 0.3
    pub aggression: f64,
    pub food_weight: f64,
    pub space_weight: f64,
    pub escape_route_weight: f64,
    pub openness_weight: f64,
    pub avoid_larger_snakes: bool,
    pub center_preference: f64,
    pub enemy_prediction_weight: f64,
    pub trap_avoidance: f64,
    /// Turns of tail retraction assumed by the look-ahead fill; 0 disables it
    pub lookahead_depth: i32,
    pub growth_priority: f64,
    /// Length lead over the biggest opponent the snake tries to hold
    pub target_lead: i32,
    pub trapping_aggression: f64,
    pub openness_depth_cap: i32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            health_threshold: 50,
            aggression: 0.0,
            food_weight: 1.0,
            space_weight: 1.0,
            escape_route_weight: 2.0,
            openness_weight: 1.0,
            avoid_larger_snakes: true,
            center_preference: 0.5,
            enemy_prediction_weight: 0.3,
            trap_avoidance: 1.0,
            lookahead_depth: 2,
            growth_priority: 0.5,
            target_lead: 2,
            trapping_aggression: 0.5,
            openness_depth_cap: DEFAULT_OPENNESS_DEPTH_CAP,
        }
    }
}

impl StrategyConfig {
    /// Shorthand for `resolve(self, overrides)`
    pub fn with_overrides(&self, overrides: &Map<String, Value>) -> Self {
        resolve(self, overrides)
    }

    fn apply(&mut self, name: &str, value: &Value) -> Result<(), String> {
        match canonical_name(name).as_str() {
            "healththreshold" => self.health_threshold = coerce_int(value)?,
            "aggression" => self.aggression = coerce_float(value)?,
            "foodweight" => self.food_weight = coerce_float(value)?,
            "spaceweight" => self.space_weight = coerce_float(value)?,
            "escaperouteweight" => self.escape_route_weight = coerce_float(value)?,
            "opennessweight" => self.openness_weight = coerce_float(value)?,
            "avoidlargersnakes" => self.avoid_larger_snakes = coerce_bool(value)?,
            "centerpreference" => self.center_preference = coerce_float(value)?,
            "enemypredictionweight" => self.enemy_prediction_weight = coerce_float(value)?,
            "trapavoidance" => self.trap_avoidance = coerce_float(value)?,
            "lookaheaddepth" => self.lookahead_depth = coerce_int(value)?,
            "growthpriority" => self.growth_priority = coerce_float(value)?,
            "targetlead" => self.target_lead = coerce_int(value)?,
            "trappingaggression" => self.trapping_aggression = coerce_float(value)?,
            "opennessdepthcap" => self.openness_depth_cap = coerce_int(value)?,
            _ => debug!("Ignoring unknown strategy parameter '{}'", name),
        }
        Ok(())
    }
}

/// Merges `overrides` onto `defaults` without touching either.
///
/// # Arguments
/// * `defaults` - Base strategy
/// * `overrides` - Parameter name to value; camelCase or snake_case names
///
/// # Returns
/// * `StrategyConfig` - The merged strategy. Never fails: a value that cannot be
///   coerced leaves the default in place.
pub fn resolve(defaults: &StrategyConfig, overrides: &Map<String, Value>) -> StrategyConfig {
    let mut resolved = *defaults;

    for (name, value) in overrides {
        if is_blank(value) {
            continue;
        }
        if let Err(e) = resolved.apply(name, value) {
            warn!("Strategy parameter '{}' kept its default: {}", name, e);
        }
    }

    resolved
}

fn canonical_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn coerce_float(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("{} is not representable as a float", n)),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("'{}' is not a number: {}", s, e)),
        other => Err(format!("expected a number, got {}", other)),
    }
}

fn coerce_int(value: &Value) -> Result<i32, String> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(i.clamp(i32::MIN as i64, i32::MAX as i64) as i32),
            None => coerce_float(value).map(|f| f as i32),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i32>()
                .or_else(|_| trimmed.parse::<f64>().map(|f| f as i32))
                .map_err(|e| format!("'{}' is not a number: {}", s, e))
        }
        Value::Bool(b) => Ok(*b as i32),
        other => Err(format!("expected an integer, got {}", other)),
    }
}

fn coerce_bool(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().map_or(false, |f| f != 0.0)),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(format!("'{}' is not a boolean", s)),
        },
        other => Err(format!("expected a boolean, got {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn overrides(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test overrides must be an object"),
        }
    }

    #[test]
    fn test_defaults() {
        let s = StrategyConfig::default();
        assert_eq!(s.health_threshold, 50);
        assert_eq!(s.escape_route_weight, 2.0);
        assert!(s.avoid_larger_snakes);
        assert_eq!(s.lookahead_depth, 2);
        assert_eq!(s.openness_depth_cap, 8);
    }

    #[test]
    fn test_resolve_is_shallow_and_pure() {
        let defaults = StrategyConfig::default();
        let resolved = resolve(&defaults, &overrides(json!({ "aggression": 0.8 })));
        assert_eq!(resolved.aggression, 0.8);
        assert_eq!(resolved.food_weight, defaults.food_weight);
        assert_eq!(defaults.aggression, 0.0);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let resolved = resolve(
            &StrategyConfig::default(),
            &overrides(json!({ "healthThreshold": null, "foodWeight": "", "spaceWeight": "  " })),
        );
        assert_eq!(resolved, StrategyConfig::default());
    }

    #[test]
    fn test_values_are_coerced() {
        let resolved = resolve(
            &StrategyConfig::default(),
            &overrides(json!({
                "healthThreshold": "70",
                "aggression": "0.4",
                "avoidLargerSnakes": "false",
                "lookaheadDepth": 3.7,
                "trapAvoidance": true,
                "target_lead": 4,
            })),
        );
        assert_eq!(resolved.health_threshold, 70);
        assert_eq!(resolved.aggression, 0.4);
        assert!(!resolved.avoid_larger_snakes);
        assert_eq!(resolved.lookahead_depth, 3);
        assert_eq!(resolved.trap_avoidance, 1.0);
        assert_eq!(resolved.target_lead, 4);
    }

    #[test]
    fn test_unknown_and_uncoercible_values_keep_defaults() {
        let resolved = resolve(
            &StrategyConfig::default(),
            &overrides(json!({
                "notAParameter": 12,
                "foodWeight": "lots",
                "avoidLargerSnakes": [1, 2],
            })),
        );
        assert_eq!(resolved, StrategyConfig::default());
    }

    #[test]
    fn test_every_parameter_name_is_recognized() {
        let mut map = Map::new();
        for name in PARAMETER_NAMES {
            map.insert(name.to_string(), json!(0));
        }
        let resolved = resolve(&StrategyConfig::default(), &map);
        assert_eq!(resolved.health_threshold, 0);
        assert!(!resolved.avoid_larger_snakes);
        assert_eq!(resolved.openness_depth_cap, 0);
        assert_eq!(resolved.trapping_aggression, 0.0);
    }
}
