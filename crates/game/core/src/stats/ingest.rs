//! Lenient ingestion of externally supplied stat blocks.
//!
//! Content tables and save data may carry stat containers that are missing
//! fields, hold numeric strings, or hold garbage. Ingestion never propagates
//! corruption into combat arithmetic: every unusable field is replaced by a
//! documented default and reported as an [`IngestWarning`].

use super::base::BaseStats;

/// A single raw field value as found in external data.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RawValue {
    #[default]
    Missing,
    Number(f64),
    Text(String),
    /// Anything else (booleans, lists, maps).
    Invalid,
}

impl RawValue {
    fn parse(&self) -> Result<f64, IngestIssue> {
        match self {
            RawValue::Missing => Err(IngestIssue::Missing),
            RawValue::Number(value) => Ok(*value),
            RawValue::Text(text) => text.trim().parse::<f64>().map_err(|_| IngestIssue::NotNumeric),
            RawValue::Invalid => Err(IngestIssue::NotNumeric),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_owned())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RawValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{IgnoredAny, MapAccess, SeqAccess, Visitor};

        struct RawValueVisitor;

        impl<'de> Visitor<'de> for RawValueVisitor {
            type Value = RawValue;

            fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                f.write_str("any value")
            }

            fn visit_i64<E>(self, v: i64) -> Result<RawValue, E> {
                Ok(RawValue::Number(v as f64))
            }

            fn visit_u64<E>(self, v: u64) -> Result<RawValue, E> {
                Ok(RawValue::Number(v as f64))
            }

            fn visit_f64<E>(self, v: f64) -> Result<RawValue, E> {
                Ok(RawValue::Number(v))
            }

            fn visit_str<E>(self, v: &str) -> Result<RawValue, E> {
                Ok(RawValue::Text(v.to_owned()))
            }

            fn visit_bool<E>(self, _: bool) -> Result<RawValue, E> {
                Ok(RawValue::Invalid)
            }

            fn visit_unit<E>(self) -> Result<RawValue, E> {
                Ok(RawValue::Missing)
            }

            fn visit_none<E>(self) -> Result<RawValue, E> {
                Ok(RawValue::Missing)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<RawValue, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserializer.deserialize_any(RawValueVisitor)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<RawValue, A::Error>
            where
                A: SeqAccess<'de>,
            {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(RawValue::Invalid)
            }

            fn visit_map<A>(self, mut map: A) -> Result<RawValue, A::Error>
            where
                A: MapAccess<'de>,
            {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(RawValue::Invalid)
            }
        }

        deserializer.deserialize_any(RawValueVisitor)
    }
}

/// Untrusted stat container.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawStatBlock {
    pub health: RawValue,
    pub max_health: RawValue,
    pub power: RawValue,
    pub armor: RawValue,
    pub speed: RawValue,
    pub resource: RawValue,
    pub max_resource: RawValue,
    pub fortune: RawValue,
}

/// Why a field was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestIssue {
    Missing,
    NotNumeric,
    NonFinite,
    Negative,
}

impl core::fmt::Display for IngestIssue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            IngestIssue::Missing => "missing",
            IngestIssue::NotNumeric => "not numeric",
            IngestIssue::NonFinite => "not finite",
            IngestIssue::Negative => "negative",
        };
        f.write_str(text)
    }
}

/// A substituted field.
#[derive(Clone, Debug, PartialEq)]
pub struct IngestWarning {
    pub field: &'static str,
    pub issue: IngestIssue,
    pub substituted: f64,
}

impl core::fmt::Display for IngestWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "stat `{}` is {}; using default {}",
            self.field, self.issue, self.substituted
        )
    }
}

struct Ingestor {
    warnings: Vec<IngestWarning>,
}

impl Ingestor {
    fn field(&mut self, field: &'static str, raw: &RawValue, default: f64) -> f64 {
        let checked = raw.parse().and_then(|value| {
            if !value.is_finite() {
                Err(IngestIssue::NonFinite)
            } else if value < 0.0 {
                Err(IngestIssue::Negative)
            } else {
                Ok(value)
            }
        });

        match checked {
            Ok(value) => value,
            // Absent pools start full.
            Err(IngestIssue::Missing) if matches!(field, "health" | "resource") => default,
            Err(issue) => {
                tracing::warn!(
                    target: "combat::ingest",
                    field,
                    %issue,
                    default,
                    "substituting default for corrupt stat"
                );
                self.warnings.push(IngestWarning {
                    field,
                    issue,
                    substituted: default,
                });
                default
            }
        }
    }

    fn int(&mut self, field: &'static str, raw: &RawValue, default: i32) -> i32 {
        self.field(field, raw, default as f64).min(i32::MAX as f64) as i32
    }
}

impl BaseStats {
    /// Builds base stats from an untrusted block.
    ///
    /// Missing `health` / `resource` start full. Everything else falls back
    /// to the `DEFAULT_*` constants. Pools are clamped to their maxima.
    pub fn ingest(raw: &RawStatBlock) -> (BaseStats, Vec<IngestWarning>) {
        let mut ingestor = Ingestor {
            warnings: Vec::new(),
        };

        let max_health = ingestor
            .int("max_health", &raw.max_health, Self::DEFAULT_HEALTH)
            .max(1);
        let max_resource = ingestor.int("max_resource", &raw.max_resource, Self::DEFAULT_RESOURCE);
        let health = ingestor.int("health", &raw.health, max_health).min(max_health);
        let resource = ingestor
            .field("resource", &raw.resource, max_resource as f64)
            .min(max_resource as f64);

        let stats = BaseStats {
            health,
            max_health,
            power: ingestor.int("power", &raw.power, Self::DEFAULT_POWER),
            armor: ingestor.int("armor", &raw.armor, Self::DEFAULT_ARMOR),
            speed: ingestor.int("speed", &raw.speed, Self::DEFAULT_SPEED),
            resource,
            max_resource,
            fortune: ingestor.int("fortune", &raw.fortune, Self::DEFAULT_FORTUNE),
        };

        (stats, ingestor.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> RawStatBlock {
        RawStatBlock {
            health: RawValue::Number(80.0),
            max_health: RawValue::Number(100.0),
            power: RawValue::Number(12.0),
            armor: RawValue::Number(4.0),
            speed: RawValue::Number(100.0),
            resource: RawValue::Number(30.0),
            max_resource: RawValue::Number(50.0),
            fortune: RawValue::Number(3.0),
        }
    }

    #[test]
    fn clean_block_has_no_warnings() {
        let (stats, warnings) = BaseStats::ingest(&block());
        assert!(warnings.is_empty());
        assert_eq!(stats.health, 80);
        assert_eq!(stats.power, 12);
        assert_eq!(stats.resource, 30.0);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let raw = RawStatBlock {
            power: " 25 ".into(),
            ..block()
        };
        let (stats, warnings) = BaseStats::ingest(&raw);
        assert!(warnings.is_empty());
        assert_eq!(stats.power, 25);
    }

    #[test]
    fn garbage_is_replaced_with_defaults() {
        let raw = RawStatBlock {
            power: "lots".into(),
            armor: RawValue::Number(-3.0),
            speed: RawValue::Number(f64::NAN),
            fortune: RawValue::Invalid,
            ..block()
        };
        let (stats, warnings) = BaseStats::ingest(&raw);

        assert_eq!(stats.power, BaseStats::DEFAULT_POWER);
        assert_eq!(stats.armor, BaseStats::DEFAULT_ARMOR);
        assert_eq!(stats.speed, BaseStats::DEFAULT_SPEED);
        assert_eq!(stats.fortune, BaseStats::DEFAULT_FORTUNE);

        let issues: Vec<_> = warnings.iter().map(|w| (w.field, w.issue)).collect();
        assert_eq!(
            issues,
            vec![
                ("power", IngestIssue::NotNumeric),
                ("armor", IngestIssue::Negative),
                ("speed", IngestIssue::NonFinite),
                ("fortune", IngestIssue::NotNumeric),
            ]
        );
    }

    #[test]
    fn missing_pools_start_full() {
        let raw = RawStatBlock {
            health: RawValue::Missing,
            resource: RawValue::Missing,
            ..block()
        };
        let (stats, warnings) = BaseStats::ingest(&raw);
        assert!(warnings.is_empty());
        assert_eq!(stats.health, 100);
        assert_eq!(stats.resource, 50.0);
    }

    #[test]
    fn pools_are_clamped_to_maxima() {
        let raw = RawStatBlock {
            health: RawValue::Number(500.0),
            resource: RawValue::Number(999.0),
            ..block()
        };
        let (stats, _) = BaseStats::ingest(&raw);
        assert_eq!(stats.health, 100);
        assert_eq!(stats.resource, 50.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_mixed_json() {
        let raw: RawStatBlock = serde_json::from_str(
            r#"{"max_health": "90", "power": true, "armor": [1, 2], "speed": null}"#,
        )
        .unwrap();

        assert_eq!(raw.max_health, RawValue::Text("90".into()));
        assert_eq!(raw.power, RawValue::Invalid);
        assert_eq!(raw.armor, RawValue::Invalid);
        assert_eq!(raw.speed, RawValue::Missing);

        let (stats, _) = BaseStats::ingest(&raw);
        assert_eq!(stats.max_health, 90);
        assert_eq!(stats.health, 90);
    }
}
