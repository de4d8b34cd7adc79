//! Request body parsing and validation for `POST /predict`
//!
//! The body is accepted in two shapes: a bare array of samples, or an object
//! `{params?, data}`. Validation runs on the raw JSON so each failure can be
//! reported with the offending path.

use freshpoint_forecast::{ParamValue, Parameter, Sample};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::{PredSrvError, Result};

pub const INVALID_ENTRY_MESSAGE: &str = "Invalid entry. Send array or an object {params, data}.";
pub const INVALID_ITEM_MESSAGE: &str = "Each item must have string 'timestamp' and number 'value'.";
pub const INVALID_PARAM_MESSAGE: &str =
    "Each parameter must have string 'name' and number or string 'value'.";

/// Object form of the predict body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PredictPayload {
    /// Optional overrides, e.g. `ema_alpha`, `future_weeks`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Parameter>>,
    pub data: Vec<Sample>,
}

/// Validated predict request
#[derive(Debug, Clone, PartialEq)]
pub struct PredictRequest {
    pub payload: PredictPayload,
    /// Params exactly as sent, `[]` when absent
    pub raw_params: Value,
}

impl PredictRequest {
    pub fn params(&self) -> Option<&[Parameter]> {
        self.payload.params.as_deref()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.payload.data
    }
}

/// Parse and validate a raw request body
pub fn parse_predict_body(body: &[u8]) -> Result<PredictRequest> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| PredSrvError::validation(format!("Malformed JSON body: {}", e)))?;
    parse_predict_value(value)
}

pub fn parse_predict_value(value: Value) -> Result<PredictRequest> {
    let (raw_params, items) = match value {
        Value::Array(items) => (None, items),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => (map.remove("params"), items),
            _ => return Err(PredSrvError::validation(INVALID_ENTRY_MESSAGE)),
        },
        _ => return Err(PredSrvError::validation(INVALID_ENTRY_MESSAGE)),
    };

    let data = items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_sample(i, item))
        .collect::<Result<Vec<_>>>()?;

    let (params, raw_params) = match raw_params {
        None | Some(Value::Null) => (None, Value::Array(Vec::new())),
        Some(Value::Array(list)) => {
            let params = list
                .iter()
                .enumerate()
                .map(|(i, item)| parse_parameter(i, item))
                .collect::<Result<Vec<_>>>()?;
            (Some(params), Value::Array(list))
        },
        Some(_) => {
            return Err(PredSrvError::invalid_field(INVALID_PARAM_MESSAGE, "params"));
        },
    };

    Ok(PredictRequest {
        payload: PredictPayload { params, data },
        raw_params,
    })
}

fn parse_sample(index: usize, item: &Value) -> Result<Sample> {
    let timestamp = item.get("timestamp").and_then(Value::as_str);
    let value = item.get("value").and_then(Value::as_f64);

    match (timestamp, value) {
        (Some(timestamp), Some(value)) => Ok(Sample::new(timestamp, value)),
        (None, _) => Err(PredSrvError::invalid_field(
            INVALID_ITEM_MESSAGE,
            format!("data[{}].timestamp", index),
        )),
        (_, None) => Err(PredSrvError::invalid_field(
            INVALID_ITEM_MESSAGE,
            format!("data[{}].value", index),
        )),
    }
}

fn parse_parameter(index: usize, item: &Value) -> Result<Parameter> {
    let name = item.get("name").and_then(Value::as_str);
    let value = match item.get("value") {
        Some(Value::Number(n)) => n.as_f64().map(ParamValue::Number),
        Some(Value::String(s)) => Some(ParamValue::Text(s.clone())),
        _ => None,
    };

    match (name, value) {
        (Some(name), Some(value)) => Ok(Parameter::new(name, value)),
        _ => Err(PredSrvError::invalid_field(
            INVALID_PARAM_MESSAGE,
            format!("params[{}]", index),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(err: PredSrvError) -> String {
        match err {
            PredSrvError::Validation { message, .. } => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_array_body() {
        let req = parse_predict_value(json!([
            {"timestamp": "2024-01-01", "value": 10},
            {"timestamp": "2024-01-08", "value": 20.5}
        ]))
        .unwrap();

        assert!(req.params().is_none());
        assert_eq!(req.raw_params, json!([]));
        assert_eq!(req.samples().len(), 2);
        assert_eq!(req.samples()[1], Sample::new("2024-01-08", 20.5));
    }

    #[test]
    fn test_object_body_with_params() {
        let req = parse_predict_value(json!({
            "params": [
                {"name": "ema_alpha", "value": 0.5},
                {"name": "future_weeks", "value": "4"}
            ],
            "data": [{"timestamp": "2024-01-01T00:00:00Z", "value": 3}]
        }))
        .unwrap();

        let params = req.params().unwrap();
        assert_eq!(params[0], Parameter::new("ema_alpha", 0.5));
        assert_eq!(params[1], Parameter::new("future_weeks", "4"));
        assert_eq!(req.raw_params[1]["value"], "4");
    }

    #[test]
    fn test_null_params_treated_as_absent() {
        let req = parse_predict_value(json!({"params": null, "data": []})).unwrap();
        assert!(req.params().is_none());
        assert!(req.samples().is_empty());
    }

    #[test]
    fn test_invalid_shapes() {
        for body in [json!(42), json!("text"), json!(null), json!({}), json!({"data": {}})] {
            let err = parse_predict_value(body).unwrap_err();
            assert_eq!(message(err), INVALID_ENTRY_MESSAGE);
        }
    }

    #[test]
    fn test_invalid_items() {
        let cases = [
            json!([{"timestamp": 1, "value": 2}]),
            json!([{"timestamp": "2024-01-01", "value": "2"}]),
            json!([{"timestamp": "2024-01-01"}]),
            json!([null]),
        ];
        for body in cases {
            let err = parse_predict_value(body).unwrap_err();
            assert_eq!(message(err), INVALID_ITEM_MESSAGE);
        }
    }

    #[test]
    fn test_invalid_item_reports_path() {
        let err = parse_predict_value(json!([
            {"timestamp": "2024-01-01", "value": 1},
            {"timestamp": "2024-01-08", "value": true}
        ]))
        .unwrap_err();
        match err {
            PredSrvError::Validation { field, .. } => {
                assert_eq!(field.as_deref(), Some("data[1].value"));
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invalid_params() {
        for params in [json!("ema_alpha=0.5"), json!([{"name": 1, "value": 2}]), json!([{"name": "x"}])] {
            let err = parse_predict_value(json!({"params": params, "data": []})).unwrap_err();
            assert_eq!(message(err), INVALID_PARAM_MESSAGE);
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_predict_body(b"{not json").unwrap_err();
        assert!(message(err).starts_with("Malformed JSON body"));
    }
}
