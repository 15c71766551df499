//! Celsius/Fahrenheit conversion returning JSON.

use serde::Serialize;

use crate::cgi::{CgiRequest, CgiResponse};
use crate::Result;

/// Conversion direction, from the `direction` form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ToFahrenheit,
    ToCelsius,
}

impl Direction {
    /// `to_fahrenheit` converts C to F; every other value converts F to C.
    pub fn from_param(value: &str) -> Self {
        if value == "to_fahrenheit" {
            Direction::ToFahrenheit
        } else {
            Direction::ToCelsius
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Direction::ToFahrenheit => "°F",
            Direction::ToCelsius => "°C",
        }
    }

    /// Convert `input`, rounded to two decimals. `None` if it is not a
    /// finite number.
    pub fn convert(self, input: &str) -> Option<f64> {
        let value: f64 = input.trim().parse().ok().filter(|v: &f64| v.is_finite())?;
        let converted = match self {
            Direction::ToFahrenheit => value * 9.0 / 5.0 + 32.0,
            Direction::ToCelsius => (value - 32.0) * 5.0 / 9.0,
        };
        Some(round2(converted))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// JSON body of the converter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub status: &'static str,
    pub original: String,
    pub direction: String,
    pub result: Option<f64>,
    pub unit: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl Conversion {
    pub fn compute(temperature: &str, direction: &str) -> Self {
        let dir = Direction::from_param(direction);
        let result = dir.convert(temperature);

        Self {
            status: if result.is_some() { "success" } else { "error" },
            original: temperature.to_string(),
            direction: direction.to_string(),
            result,
            unit: dir.unit(),
            message: result.is_none().then_some("Invalid temperature input"),
        }
    }
}

pub fn respond(request: &CgiRequest, body: &[u8]) -> Result<CgiResponse> {
    let form = request.form(body);
    let conversion = Conversion::compute(
        form.get_or("temperature", ""),
        form.get_or("direction", "to_fahrenheit"),
    );
    if conversion.result.is_none() {
        tracing::info!("Rejected temperature input {:?}", conversion.original);
    }
    Ok(CgiResponse::json(serde_json::to_string(&conversion)?))
}
