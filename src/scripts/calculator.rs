//! Two-operand calculator returning JSON.
//!
//! Form fields `num1` and `num2` default to 0, `operation` defaults to
//! `add`. A field that is present must be numeric, even when empty.

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::cgi::{CgiRequest, CgiResponse};
use crate::datetime;
use crate::Result;

/// Largest exponent accepted by [`Operation::Power`].
pub const MAX_EXPONENT: f64 = 100.0;

/// Reasons a calculation is refused. The messages are shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Valeur non numérique: {0}")]
    NotNumeric(String),

    #[error("Opération non valide: {0}")]
    InvalidOperation(String),

    #[error("Division par zéro impossible")]
    DivisionByZero,

    #[error("Exposant trop grand (max 100)")]
    ExponentTooLarge,

    #[error("Le résultat est infini ou non valide")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operation {
    pub fn from_param(value: &str) -> std::result::Result<Self, CalcError> {
        match value {
            "add" => Ok(Operation::Add),
            "subtract" => Ok(Operation::Subtract),
            "multiply" => Ok(Operation::Multiply),
            "divide" => Ok(Operation::Divide),
            "power" => Ok(Operation::Power),
            other => Err(CalcError::InvalidOperation(other.to_string())),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
            Operation::Power => "^",
        }
    }

    /// Apply the operation. Division by zero, exponents above
    /// [`MAX_EXPONENT`] and non-finite results are errors.
    pub fn apply(self, a: f64, b: f64) -> std::result::Result<f64, CalcError> {
        let result = match self {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => {
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                a / b
            }
            Operation::Power => {
                if b > MAX_EXPONENT {
                    return Err(CalcError::ExponentTooLarge);
                }
                a.powf(b)
            }
        };

        if result.is_finite() {
            Ok(result)
        } else {
            Err(CalcError::NonFinite)
        }
    }
}

/// Parse a decimal number: optional sign, digits with an optional fraction,
/// optional exponent, surrounding whitespace allowed.
///
/// Words such as `inf` or `nan` and hexadecimal input are rejected. A value
/// too large for `f64` parses to infinity and is caught by
/// [`Operation::apply`].
pub fn parse_number(value: &str) -> std::result::Result<f64, CalcError> {
    let trimmed = value.trim();
    let well_formed = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));

    well_formed
        .then(|| trimmed.parse::<f64>().ok())
        .flatten()
        .ok_or_else(|| CalcError::NotNumeric(value.to_string()))
}

/// Validated operands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Input {
    pub num1: f64,
    pub num2: f64,
    pub operation: Operation,
}

impl Input {
    pub fn parse(
        num1: Option<&str>,
        num2: Option<&str>,
        operation: Option<&str>,
    ) -> std::result::Result<Self, CalcError> {
        Ok(Self {
            num1: num1.map_or(Ok(0.0), parse_number)?,
            num2: num2.map_or(Ok(0.0), parse_number)?,
            operation: operation.map_or(Ok(Operation::Add), Operation::from_param)?,
        })
    }
}

/// Part of the response present once the input validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub timestamp: String,
    pub input: Input,
    pub result: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Performance {
    pub execution_time: String,
}

/// JSON body of the calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub status: &'static str,
    #[serde(flatten)]
    pub evaluation: Option<Evaluation>,
    pub message: String,
    pub performance: Performance,
}

impl Calculation {
    /// Validate the fields and compute the result.
    ///
    /// # Arguments
    ///
    /// * `num1`, `num2` - Raw operand fields, `None` when absent
    /// * `operation` - Raw operation field, `None` when absent
    /// * `timestamp` - Time of the request, echoed once the input is valid
    ///
    /// # Returns
    ///
    /// A `success` calculation with `"<num1> <op> <num2> = <result>"` as its
    /// message, or an `error` calculation carrying the refusal reason. Input
    /// errors omit `timestamp`, `input` and `result`; arithmetic errors keep
    /// them with a null `result`.
    pub fn compute(
        num1: Option<&str>,
        num2: Option<&str>,
        operation: Option<&str>,
        timestamp: String,
    ) -> Self {
        let input = match Input::parse(num1, num2, operation) {
            Ok(input) => input,
            Err(e) => return Self::error(None, e),
        };

        match input.operation.apply(input.num1, input.num2) {
            Ok(result) => Self {
                status: "success",
                evaluation: Some(Evaluation {
                    timestamp,
                    input,
                    result: Some(result),
                }),
                message: format!(
                    "{} {} {} = {}",
                    input.num1,
                    input.operation.symbol(),
                    input.num2,
                    result
                ),
                performance: Performance::default(),
            },
            Err(e) => Self::error(
                Some(Evaluation {
                    timestamp,
                    input,
                    result: None,
                }),
                e,
            ),
        }
    }

    fn error(evaluation: Option<Evaluation>, error: CalcError) -> Self {
        Self {
            status: "error",
            evaluation,
            message: error.to_string(),
            performance: Performance::default(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Record how long the request took, as `"<ms> ms"`.
    pub fn finish(mut self, elapsed: Duration) -> Self {
        self.performance.execution_time = format!("{:.2} ms", elapsed.as_secs_f64() * 1000.0);
        self
    }
}

/// Answer one calculator request. `started` is when the program began.
pub fn respond(request: &CgiRequest, body: &[u8], started: Instant) -> Result<CgiResponse> {
    let form = request.form(body);
    let calculation = Calculation::compute(
        form.get("num1"),
        form.get("num2"),
        form.get("operation"),
        datetime::format_display_timestamp(&datetime::now()),
    );
    if !calculation.is_success() {
        tracing::info!("Calculation refused: {}", calculation.message);
    }

    let calculation = calculation.finish(started.elapsed());
    Ok(CgiResponse::json(serde_json::to_string_pretty(&calculation)?).no_cache())
}
