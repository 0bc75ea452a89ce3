//! Decoding of the POWER JSON envelope into a flat [`Payload`].

use crate::power::error::PowerApiError;
use crate::types::record_kind::{RecordKind, Spatial};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Fill value POWER uses when the header does not declare one.
pub const DEFAULT_API_FILL_VALUE: f64 = -999.0;

/// A single time series keyed by POWER time key (`YYYYMMDD` or `YYYYMMDDHH`).
///
/// Keys of one cadence sort chronologically, so iteration is in time order.
pub type TimeSeries = BTreeMap<String, f64>;

/// The parts of a POWER response the dataset needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub units: Option<String>,
    pub long_name: Option<String>,
    /// Value the API uses to mark missing or erroneous measurements.
    pub fill_value: f64,
    /// One series for point requests, one per grid cell for regional requests.
    pub series: Vec<TimeSeries>,
}

impl Payload {
    /// Payload with a single series and the default fill value.
    pub fn point(series: TimeSeries) -> Self {
        Self {
            units: None,
            long_name: None,
            fill_value: DEFAULT_API_FILL_VALUE,
            series: vec![series],
        }
    }

    /// Payload with one series per grid cell and the default fill value.
    pub fn region(series: Vec<TimeSeries>) -> Self {
        Self {
            units: None,
            long_name: None,
            fill_value: DEFAULT_API_FILL_VALUE,
            series,
        }
    }

    /// Decodes a raw response body for a request of `kind`.
    pub fn from_json(
        bytes: &[u8],
        kind: RecordKind,
        url: &str,
        parameter: &str,
    ) -> Result<Self, PowerApiError> {
        let envelope: Envelope =
            serde_json::from_slice(bytes).map_err(|e| PowerApiError::JsonParse {
                kind,
                url: url.to_string(),
                source: e,
            })?;
        envelope.into_payload(kind, parameter)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    header: Option<Header>,
    #[serde(default)]
    parameters: HashMap<String, ParameterInfo>,
    #[serde(default)]
    properties: Option<Properties>,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Header {
    #[serde(default)]
    fill_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ParameterInfo {
    #[serde(default)]
    units: Option<String>,
    #[serde(default)]
    longname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    parameter: HashMap<String, BTreeMap<String, Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
}

impl Envelope {
    fn into_payload(self, kind: RecordKind, parameter: &str) -> Result<Payload, PowerApiError> {
        let fill_value = self
            .header
            .and_then(|h| h.fill_value)
            .unwrap_or(DEFAULT_API_FILL_VALUE);
        let missing = || PowerApiError::MissingParameter {
            kind,
            parameter: parameter.to_string(),
        };

        let raw_series = match kind.spatial() {
            Spatial::Point => {
                let mut properties = self.properties.ok_or_else(missing)?;
                vec![properties.parameter.remove(parameter).ok_or_else(missing)?]
            }
            Spatial::Regional => self
                .features
                .into_iter()
                .map(|mut feature| feature.properties.parameter.remove(parameter).ok_or_else(missing))
                .collect::<Result<Vec<_>, _>>()?,
        };

        // Null entries are treated like the declared fill value.
        let series = raw_series
            .into_iter()
            .map(|raw| {
                raw.into_iter()
                    .map(|(key, value)| (key, value.unwrap_or(fill_value)))
                    .collect()
            })
            .collect();

        let info = self.parameters.get(parameter);
        Ok(Payload {
            units: info.and_then(|p| p.units.clone()),
            long_name: info.and_then(|p| p.longname.clone()),
            fill_value,
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT_BODY: &str = r#"{
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [77.41261, 23.25991, 500.0]},
        "properties": {"parameter": {"ALLSKY_SFC_SW_DWN": {
            "20210101": 4.8, "20210102": -999.0, "20210103": 5.1
        }}},
        "header": {"title": "NASA/POWER", "fill_value": -999.0, "start": "20210101", "end": "20210103"},
        "messages": [],
        "parameters": {"ALLSKY_SFC_SW_DWN": {
            "units": "kW-hr/m^2/day",
            "longname": "All Sky Surface Shortwave Downward Irradiance"
        }}
    }"#;

    const REGION_BODY: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"parameter": {"ALLSKY_SFC_SW_DWN": {"20210101": 1.0, "20210102": 2.0}}}},
            {"type": "Feature", "properties": {"parameter": {"ALLSKY_SFC_SW_DWN": {"20210101": 3.0, "20210102": null}}}}
        ],
        "header": {"fill_value": -99.0},
        "parameters": {"ALLSKY_SFC_SW_DWN": {"units": "kW-hr/m^2/day", "longname": "All Sky"}}
    }"#;

    #[test]
    fn test_decode_point_payload() {
        let payload = Payload::from_json(
            POINT_BODY.as_bytes(),
            RecordKind::PointDaily,
            "http://test",
            "ALLSKY_SFC_SW_DWN",
        )
        .unwrap();
        assert_eq!(payload.fill_value, -999.0);
        assert_eq!(payload.units.as_deref(), Some("kW-hr/m^2/day"));
        assert_eq!(
            payload.long_name.as_deref(),
            Some("All Sky Surface Shortwave Downward Irradiance")
        );
        assert_eq!(payload.series.len(), 1);
        let values: Vec<f64> = payload.series[0].values().copied().collect();
        assert_eq!(values, vec![4.8, -999.0, 5.1]);
    }

    #[test]
    fn test_decode_region_payload_with_null() {
        let payload = Payload::from_json(
            REGION_BODY.as_bytes(),
            RecordKind::RegionDaily,
            "http://test",
            "ALLSKY_SFC_SW_DWN",
        )
        .unwrap();
        assert_eq!(payload.series.len(), 2);
        assert_eq!(payload.series[0]["20210102"], 2.0);
        assert_eq!(payload.series[1]["20210102"], -99.0);
    }

    #[test]
    fn test_missing_parameter_is_reported() {
        let err = Payload::from_json(
            POINT_BODY.as_bytes(),
            RecordKind::PointDaily,
            "http://test",
            "T2M",
        )
        .unwrap_err();
        assert!(matches!(err, PowerApiError::MissingParameter { ref parameter, .. } if parameter == "T2M"));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = Payload::from_json(b"<html>", RecordKind::PointHourly, "http://test", "X")
            .unwrap_err();
        assert!(matches!(err, PowerApiError::JsonParse { kind: RecordKind::PointHourly, .. }));
    }

    #[test]
    fn test_missing_header_uses_default_fill_value() {
        let body = r#"{"properties": {"parameter": {"P": {"2021010100": 10.0}}}}"#;
        let payload =
            Payload::from_json(body.as_bytes(), RecordKind::PointHourly, "u", "P").unwrap();
        assert_eq!(payload.fill_value, DEFAULT_API_FILL_VALUE);
        assert!(payload.units.is_none());
    }
}
