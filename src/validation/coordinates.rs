//! Latitude/longitude pair validation for projects.

use serde::Serialize;
use serde_json::Value;

use super::ValidationErrors;

pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A validated coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Why a coordinate pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateError {
    /// One or both values missing where the pair is needed.
    BothRequired,
    /// A value could not be read as a finite number.
    NotANumber,
    LatitudeOutOfRange,
    LongitudeOutOfRange,
}

impl CoordinateError {
    pub fn message(&self) -> &'static str {
        match self {
            CoordinateError::BothRequired => "Latitude and longitude are both required",
            CoordinateError::NotANumber => "Latitude and longitude must be valid numbers",
            CoordinateError::LatitudeOutOfRange => "Latitude must be between -90 and 90",
            CoordinateError::LongitudeOutOfRange => "Longitude must be between -180 and 180",
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            CoordinateError::LongitudeOutOfRange => "longitude",
            _ => "latitude",
        }
    }
}

impl std::fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for CoordinateError {}

/// Validates a raw latitude/longitude pair.
///
/// Values may be JSON numbers or numeric strings; `null` and blank strings
/// count as absent. With `required` unset, a pair where both values are absent
/// yields `Ok(None)` so an update leaves the stored coordinates untouched.
pub fn validate_coordinates(
    latitude: Option<&Value>,
    longitude: Option<&Value>,
    required: bool,
) -> Result<Option<Coordinates>, CoordinateError> {
    let latitude = latitude.filter(|v| is_present(v));
    let longitude = longitude.filter(|v| is_present(v));

    let (latitude, longitude) = match (latitude, longitude) {
        (Some(lat), Some(lng)) => (lat, lng),
        (None, None) if !required => return Ok(None),
        _ => return Err(CoordinateError::BothRequired),
    };

    let (Some(latitude), Some(longitude)) = (to_number(latitude), to_number(longitude)) else {
        return Err(CoordinateError::NotANumber);
    };

    if !(LATITUDE_RANGE.0..=LATITUDE_RANGE.1).contains(&latitude) {
        return Err(CoordinateError::LatitudeOutOfRange);
    }
    if !(LONGITUDE_RANGE.0..=LONGITUDE_RANGE.1).contains(&longitude) {
        return Err(CoordinateError::LongitudeOutOfRange);
    }

    Ok(Some(Coordinates {
        latitude,
        longitude,
    }))
}

/// [`validate_coordinates`] inside a field check: a rejection is recorded
/// under its field and yields `None`.
pub fn coordinates(
    errors: &mut ValidationErrors,
    latitude: Option<&Value>,
    longitude: Option<&Value>,
    required: bool,
) -> Option<Coordinates> {
    validate_coordinates(latitude, longitude, required).unwrap_or_else(|e| {
        errors.push(e.field(), e.message());
        None
    })
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
