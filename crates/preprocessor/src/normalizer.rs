//! Record Normalization

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use telemetry::{GpsReading, SensorFrame, Vector3};
use tracing::debug;

use crate::error::ValidationError;

/// Accepted keys for the accelerometer group, in lookup order
const ACCELEROMETER_KEYS: [&str; 2] = ["accelerometer", "acceleration"];

/// ISO-8601 layouts carrying a numeric offset, with or without a colon
const OFFSET_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

/// Naive ISO-8601 layouts, interpreted as UTC
const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalize a raw record, stamping it with the current instant if it has no timestamp
pub fn preprocess(raw: &Value) -> Result<SensorFrame, ValidationError> {
    preprocess_at(raw, Utc::now())
}

/// Parse and normalize a JSON text record
pub fn preprocess_str(raw: &str) -> Result<SensorFrame, ValidationError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    preprocess(&value)
}

/// Normalize a raw record, using `fallback` when the timestamp is absent
pub fn preprocess_at(raw: &Value, fallback: DateTime<Utc>) -> Result<SensorFrame, ValidationError> {
    normalize(raw, fallback).map_err(|e| {
        debug!("Rejected telemetry record: {}", e);
        e
    })
}

fn normalize(raw: &Value, fallback: DateTime<Utc>) -> Result<SensorFrame, ValidationError> {
    let record = raw.as_object().ok_or_else(|| ValidationError::NotAnObject {
        field: "record",
        found: type_name(raw).to_string(),
    })?;

    let accel = ACCELEROMETER_KEYS
        .iter()
        .find_map(|key| record.get(*key))
        .map(|value| group("accelerometer", value))
        .transpose()?;
    let gyro = record
        .get("gyroscope")
        .map(|value| group("gyroscope", value))
        .transpose()?;
    let gps = record
        .get("gps")
        .map(|value| group("gps", value))
        .transpose()?;

    Ok(SensorFrame {
        timestamp: timestamp(record.get("timestamp"), fallback)?,
        acceleration: Vector3 {
            x: number("accelerometer.x", leaf(accel, "x"))?,
            y: number("accelerometer.y", leaf(accel, "y"))?,
            z: number("accelerometer.z", leaf(accel, "z"))?,
        },
        gyroscope: Vector3 {
            x: number("gyroscope.x", leaf(gyro, "x"))?,
            y: number("gyroscope.y", leaf(gyro, "y"))?,
            z: number("gyroscope.z", leaf(gyro, "z"))?,
        },
        gps: GpsReading {
            latitude: number("gps.latitude", leaf(gps, "latitude"))?,
            longitude: number("gps.longitude", leaf(gps, "longitude"))?,
            speed: number("gps.speed", leaf(gps, "speed"))?,
        },
        audio_level: number("audio_level", record.get("audio_level"))?,
    })
}

/// Resolve a sensor group; `null` counts as absent
fn group<'a>(
    field: &'static str,
    value: &'a Value,
) -> Result<Option<&'a Map<String, Value>>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => Err(ValidationError::NotAnObject {
            field,
            found: type_name(other).to_string(),
        }),
    }
}

fn leaf<'a>(group: Option<Option<&'a Map<String, Value>>>, key: &str) -> Option<&'a Value> {
    group.flatten().and_then(|map| map.get(key))
}

/// Coerce a leaf to a finite number; absent or `null` yields 0.0
fn number(field: &'static str, value: Option<&Value>) -> Result<f64, ValidationError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(0.0),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| ValidationError::NotNumeric {
            field,
            value: n.to_string(),
        })?,
        Some(Value::String(s)) => {
            s.trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::NotNumeric {
                    field,
                    value: format!("{:?}", s),
                })?
        }
        Some(other) => {
            return Err(ValidationError::NotNumeric {
                field,
                value: other.to_string(),
            })
        }
    };

    if !parsed.is_finite() {
        return Err(ValidationError::NonFinite {
            field,
            value: parsed,
        });
    }
    Ok(parsed)
}

fn timestamp(
    value: Option<&Value>,
    fallback: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(fallback),
        Some(Value::String(s)) => {
            parse_iso8601(s).ok_or_else(|| ValidationError::InvalidTimestamp(s.clone()))
        }
        Some(other) => Err(ValidationError::InvalidTimestamp(other.to_string())),
    }
}

fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(parsed) = OFFSET_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
    {
        return Some(parsed.with_timezone(&Utc));
    }

    // a trailing `Z` is UTC, same as no designator
    let raw = raw
        .strip_suffix('Z')
        .or_else(|| raw.strip_suffix('z'))
        .unwrap_or(raw);
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn fixed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_full_record() {
        let raw = json!({
            "timestamp": "2024-03-01T08:30:00Z",
            "accelerometer": {"x": -25.0, "y": 5.0, "z": -8.0},
            "gyroscope": {"x": 2.0, "y": 7.0, "z": 1.0},
            "gps": {"latitude": 12.9716, "longitude": 77.5946, "speed": 15.0},
            "audio_level": 95.0
        });

        let frame = preprocess(&raw).unwrap();
        assert_eq!(frame.timestamp, fixed_instant());
        assert_eq!(frame.acceleration, Vector3::new(-25.0, 5.0, -8.0));
        assert_eq!(frame.gyroscope, Vector3::new(2.0, 7.0, 1.0));
        assert_eq!(frame.gps.speed, 15.0);
        assert_eq!(frame.gps.latitude, 12.9716);
        assert_eq!(frame.audio_level, 95.0);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let frame = preprocess_at(&json!({}), fixed_instant()).unwrap();
        assert_eq!(frame, SensorFrame::at(fixed_instant()));

        let frame = preprocess_at(
            &json!({"accelerometer": {"x": 3.0}, "gps": {"speed": 40.0}}),
            fixed_instant(),
        )
        .unwrap();
        assert_eq!(frame.acceleration, Vector3::new(3.0, 0.0, 0.0));
        assert_eq!(frame.gps.speed, 40.0);
        assert_eq!(frame.gps.latitude, 0.0);
    }

    #[test]
    fn test_null_values_default() {
        let raw = json!({
            "timestamp": null,
            "accelerometer": null,
            "gyroscope": {"x": null, "y": 1.5},
            "audio_level": null
        });

        let frame = preprocess_at(&raw, fixed_instant()).unwrap();
        assert_eq!(frame.timestamp, fixed_instant());
        assert_eq!(frame.acceleration, Vector3::default());
        assert_eq!(frame.gyroscope, Vector3::new(0.0, 1.5, 0.0));
        assert_eq!(frame.audio_level, 0.0);
    }

    #[test]
    fn test_missing_timestamp_uses_now() {
        let before = Utc::now();
        let frame = preprocess(&json!({"audio_level": 60.0})).unwrap();
        assert!(frame.timestamp >= before);
        assert!(frame.timestamp <= Utc::now());
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let raw = json!({"gps": {"speed": " 42.5 "}, "audio_level": "81"});
        let frame = preprocess_at(&raw, fixed_instant()).unwrap();
        assert_eq!(frame.gps.speed, 42.5);
        assert_eq!(frame.audio_level, 81.0);
    }

    #[test]
    fn test_non_numeric_string_rejected() {
        let raw = json!({"accelerometer": {"x": "fast"}});
        let err = preprocess_at(&raw, fixed_instant()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NotNumeric { field: "accelerometer.x", .. }
        ));
        assert_eq!(err.field(), Some("accelerometer.x"));
    }

    #[test]
    fn test_wrong_leaf_types_rejected() {
        for bad in [json!(true), json!([1.0]), json!({"v": 1.0})] {
            let raw = json!({"audio_level": bad});
            assert!(matches!(
                preprocess_at(&raw, fixed_instant()),
                Err(ValidationError::NotNumeric { field: "audio_level", .. })
            ));
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        let raw = json!({"gps": {"speed": "NaN"}});
        assert!(matches!(
            preprocess_at(&raw, fixed_instant()),
            Err(ValidationError::NonFinite { field: "gps.speed", .. })
        ));

        let raw = json!({"gyroscope": {"z": "-inf"}});
        assert!(matches!(
            preprocess_at(&raw, fixed_instant()),
            Err(ValidationError::NonFinite { field: "gyroscope.z", .. })
        ));
    }

    #[test]
    fn test_group_must_be_object() {
        let raw = json!({"gps": 12.5});
        assert_eq!(
            preprocess_at(&raw, fixed_instant()).unwrap_err(),
            ValidationError::NotAnObject {
                field: "gps",
                found: "number".to_string(),
            }
        );

        assert!(matches!(
            preprocess_at(&json!([1, 2, 3]), fixed_instant()),
            Err(ValidationError::NotAnObject { field: "record", .. })
        ));
    }

    #[test]
    fn test_timestamp_formats() {
        let naive = json!({"timestamp": "2024-03-01T08:30:00.250000"});
        let frame = preprocess_at(&naive, Utc::now()).unwrap();
        assert_eq!(
            frame.timestamp,
            fixed_instant() + chrono::Duration::milliseconds(250)
        );

        let offset = json!({"timestamp": "2024-03-01T14:00:00+05:30"});
        let frame = preprocess_at(&offset, Utc::now()).unwrap();
        assert_eq!(frame.timestamp, fixed_instant());

        let whole_seconds = json!({"timestamp": "2024-03-01T08:30:00"});
        let frame = preprocess_at(&whole_seconds, Utc::now()).unwrap();
        assert_eq!(frame.timestamp, fixed_instant());
    }

    #[test]
    fn test_timestamp_space_separator() {
        let raw = json!({
            "timestamp": "2024-03-01 08:30:00",
            "accelerometer": {"x": 60.0}
        });
        let frame = preprocess_at(&raw, Utc::now()).unwrap();
        assert_eq!(frame.timestamp, fixed_instant());
        assert_eq!(frame.acceleration.x, 60.0);

        let micros = json!({"timestamp": "2024-03-01 08:30:00.123456"});
        let frame = preprocess_at(&micros, Utc::now()).unwrap();
        assert_eq!(
            frame.timestamp,
            fixed_instant() + chrono::Duration::microseconds(123_456)
        );

        let aware = json!({"timestamp": "2024-03-01 08:30:00+00:00"});
        let frame = preprocess_at(&aware, Utc::now()).unwrap();
        assert_eq!(frame.timestamp, fixed_instant());
    }

    #[test]
    fn test_timestamp_minute_precision() {
        for raw in ["2024-03-01T08:30Z", "2024-03-01T08:30", "2024-03-01 08:30"] {
            let record = json!({"timestamp": raw, "accelerometer": {"x": 60.0}});
            let frame = preprocess_at(&record, Utc::now()).unwrap();
            assert_eq!(frame.timestamp, fixed_instant(), "{}", raw);
        }
    }

    #[test]
    fn test_timestamp_offset_without_colon() {
        for raw in [
            "2024-03-01T14:00:00+0530",
            "2024-03-01T14:00:00.000+0530",
            "2024-03-01T03:30:00-0500",
            "2024-03-01T14:00+0530",
        ] {
            let record = json!({"timestamp": raw, "accelerometer": {"x": 60.0}});
            let frame = preprocess_at(&record, Utc::now()).unwrap();
            assert_eq!(frame.timestamp, fixed_instant(), "{}", raw);
            assert_eq!(frame.acceleration.x, 60.0);
        }
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        for bad in [json!("yesterday"), json!("2024-13-01T08:30:00"), json!(1709281800)] {
            let raw = json!({"timestamp": bad});
            assert!(matches!(
                preprocess_at(&raw, fixed_instant()),
                Err(ValidationError::InvalidTimestamp(_))
            ));
        }
    }

    #[test]
    fn test_invalid_json_text() {
        assert!(matches!(
            preprocess_str("{not json"),
            Err(ValidationError::InvalidJson(_))
        ));
        assert!(preprocess_str(r#"{"audio_level": 70}"#).is_ok());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let raw = json!({"vehicle_id": "KA-01", "audio_level": 70.0, "extra": [1, 2]});
        let frame = preprocess_at(&raw, fixed_instant()).unwrap();
        assert_eq!(frame.audio_level, 70.0);
    }

    #[test]
    fn test_canonical_frame_passes_through() {
        let raw = json!({
            "timestamp": "2024-03-01T08:30:00.123456Z",
            "accelerometer": {"x": 1.0, "y": 0.5, "z": 9.8},
            "gyroscope": {"x": 0.1, "y": 0.2, "z": 0.1},
            "gps": {"latitude": 12.9716, "longitude": 77.5946, "speed": 45.0},
            "audio_level": 60.0
        });
        let first = preprocess(&raw).unwrap();
        let again = preprocess(&serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(first, again);
    }

    proptest! {
        #[test]
        fn prop_preprocess_is_idempotent(
            ax in -200.0f64..200.0, ay in -200.0f64..200.0, az in -200.0f64..200.0,
            gx in -50.0f64..50.0, gy in -50.0f64..50.0, gz in -50.0f64..50.0,
            lat in -90.0f64..90.0, lon in -180.0f64..180.0,
            speed in 0.0f64..300.0, audio in 0.0f64..140.0,
        ) {
            let raw = json!({
                "accelerometer": {"x": ax, "y": ay, "z": az},
                "gyroscope": {"x": gx, "y": gy, "z": gz},
                "gps": {"latitude": lat, "longitude": lon, "speed": speed},
                "audio_level": audio
            });
            let first = preprocess_at(&raw, fixed_instant()).unwrap();
            let again = preprocess(&serde_json::to_value(&first).unwrap()).unwrap();
            prop_assert_eq!(first, again);
        }
    }
}
