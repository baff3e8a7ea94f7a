//! Shape validation for commodity payloads.
//!
//! The provider reports rate limiting and bad keys with HTTP 200 and a body like
//! `{"Information": "..."}`, so a successful status says nothing about the payload.
//! Validation is all-or-nothing: any missing field or malformed element rejects the
//! whole body.

use serde::Deserialize;
use serde_json::Value;
use snafu::ensure;

use crate::{
    models::{
        commodity::CommodityKey, data_point::DataPoint, interval::SeriesInterval,
        raw_series::RawSeries,
    },
    providers::{ProviderError, UpstreamShapeSnafu},
};

/// Fields the provider uses for advisory messages instead of data.
const ADVISORY_FIELDS: [&str; 3] = ["Information", "Note", "Error Message"];

#[derive(Deserialize, Debug)]
struct AlphaVantagePoint {
    date: String,
    value: String,
}

/// Parses and validates a response body for `key`.
pub fn parse_series(
    key: CommodityKey,
    interval: SeriesInterval,
    body: &str,
) -> Result<RawSeries, ProviderError> {
    let doc: Value = serde_json::from_str(body).map_err(|e| {
        UpstreamShapeSnafu {
            message: format!("body is not valid JSON: {e}"),
        }
        .build()
    })?;

    let Some(obj) = doc.as_object() else {
        return UpstreamShapeSnafu {
            message: "body is not a JSON object",
        }
        .fail();
    };

    let name = obj.get("name").and_then(Value::as_str);
    let data = obj.get("data").and_then(Value::as_array);

    let (Some(name), Some(data)) = (name, data) else {
        let mut message = if name.is_none() {
            "missing `name` field".to_string()
        } else {
            "`data` field is missing or not an array".to_string()
        };
        if let Some(advisory) = advisory_message(&doc) {
            message.push_str(&format!(" (provider said: {advisory})"));
        }
        return UpstreamShapeSnafu { message }.fail();
    };

    let mut points = Vec::with_capacity(data.len());
    for (idx, item) in data.iter().enumerate() {
        let point = AlphaVantagePoint::deserialize(item).map_err(|e| {
            UpstreamShapeSnafu {
                message: format!("data[{idx}] is malformed: {e}"),
            }
            .build()
        })?;
        ensure!(
            !point.date.trim().is_empty(),
            UpstreamShapeSnafu {
                message: format!("data[{idx}] has an empty date"),
            }
        );
        points.push(DataPoint {
            date: point.date,
            value: point.value,
        });
    }

    let unit = obj
        .get("unit")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(RawSeries {
        key,
        name: name.to_string(),
        unit,
        interval,
        points,
    })
}

fn advisory_message(doc: &Value) -> Option<&str> {
    ADVISORY_FIELDS
        .iter()
        .find_map(|field| doc.get(*field).and_then(Value::as_str))
}
