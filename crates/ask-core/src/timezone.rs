//! Coordinate to timezone resolution

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tzf_rs::DefaultFinder;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimezoneError {
    #[error("No timezone found for coordinates ({latitude}, {longitude})")]
    Unresolved { latitude: f64, longitude: f64 },

    #[error("Unknown timezone {zone}: {reason}")]
    UnknownZone { zone: String, reason: String },
}

/// Maps coordinates to an IANA zone name
pub trait TimezoneResolver: Send + Sync {
    /// Zone name for a point, or `None` when the point maps to no zone
    fn zone_name(&self, latitude: f64, longitude: f64) -> Option<String>;
}

/// Resolver backed by the timezone boundary polygons bundled with `tzf-rs`
///
/// Building the finder decodes the embedded dataset, so build it once and
/// share it.
pub struct TzfResolver {
    finder: DefaultFinder,
}

impl TzfResolver {
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for TzfResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneResolver for TzfResolver {
    fn zone_name(&self, latitude: f64, longitude: f64) -> Option<String> {
        let name = self.finder.get_tz_name(longitude, latitude);
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// Wall-clock time in a named zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTime {
    pub zone: String,
    /// RFC 3339, seconds precision
    pub local_time: String,
    /// `±HH:MM`
    pub utc_offset: String,
}

/// Render `now` in the zone the coordinates fall into
pub fn local_time_at(
    resolver: &dyn TimezoneResolver,
    latitude: f64,
    longitude: f64,
    now: DateTime<Utc>,
) -> Result<LocalTime, TimezoneError> {
    let zone = resolver
        .zone_name(latitude, longitude)
        .ok_or(TimezoneError::Unresolved {
            latitude,
            longitude,
        })?;
    let tz: Tz = zone.parse().map_err(|e| TimezoneError::UnknownZone {
        zone: zone.clone(),
        reason: format!("{}", e),
    })?;

    let local = now.with_timezone(&tz);
    Ok(LocalTime {
        local_time: local.to_rfc3339_opts(SecondsFormat::Secs, true),
        utc_offset: local.format("%:z").to_string(),
        zone,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedResolver(Option<&'static str>);

    impl TimezoneResolver for FixedResolver {
        fn zone_name(&self, _latitude: f64, _longitude: f64) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[test]
    fn test_tzf_resolves_airport_coordinates() {
        let resolver = TzfResolver::new();
        assert_eq!(
            resolver.zone_name(46.23809814453125, 6.108950138092041).as_deref(),
            Some("Europe/Zurich")
        );
        assert_eq!(
            resolver.zone_name(40.639447, -73.779317).as_deref(),
            Some("America/New_York")
        );
    }

    #[test]
    fn test_local_time_formats_offset() {
        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let time = local_time_at(&FixedResolver(Some("Europe/Zurich")), 0.0, 0.0, winter).unwrap();
        assert_eq!(time.zone, "Europe/Zurich");
        assert_eq!(time.local_time, "2024-01-15T13:00:00+01:00");
        assert_eq!(time.utc_offset, "+01:00");

        let summer = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let time =
            local_time_at(&FixedResolver(Some("America/New_York")), 0.0, 0.0, summer).unwrap();
        assert_eq!(time.local_time, "2024-07-01T08:00:00-04:00");
        assert_eq!(time.utc_offset, "-04:00");
    }

    #[test]
    fn test_zero_offset_uses_z() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let time = local_time_at(&FixedResolver(Some("UTC")), 0.0, 0.0, now).unwrap();
        assert_eq!(time.local_time, "2024-01-15T12:00:00Z");
        assert_eq!(time.utc_offset, "+00:00");
    }

    #[test]
    fn test_unresolved_zone_is_an_error() {
        let now = Utc::now();
        let err = local_time_at(&FixedResolver(None), 1.0, 2.0, now).unwrap_err();
        assert!(matches!(err, TimezoneError::Unresolved { .. }));
    }

    #[test]
    fn test_unknown_zone_is_an_error() {
        let now = Utc::now();
        let err = local_time_at(&FixedResolver(Some("Mars/Olympus_Mons")), 0.0, 0.0, now)
            .unwrap_err();
        assert!(matches!(err, TimezoneError::UnknownZone { ref zone, .. } if zone == "Mars/Olympus_Mons"));
    }
}
