use thiserror::Error;

const MAX_SWEEP_CASES: usize = 10_000;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Invalid angle '{0}'. Expected a number of degrees.")]
    InvalidAngle(String),

    #[error("Invalid range '{0}'. Expected 'start:stop:step' (e.g., '-4:8:2').")]
    InvalidRangeFormat(String),

    #[error("Range step must be non-zero and point from start toward stop, got {0}.")]
    InvalidStep(f64),

    #[error("Range produces {count} cases, more than the limit of {limit}.")]
    TooManyCases { count: usize, limit: usize },

    #[error("No angles of attack given.")]
    Empty,
}

/// Parses an angle-of-attack list.
///
/// Accepts an inclusive `start:stop:step` range or a comma-separated list of values, all in
/// degrees.
pub fn parse_alphas(input: &str) -> Result<Vec<f64>, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }
    if input.contains(':') {
        parse_range(input)
    } else {
        input.split(',').map(parse_angle).collect()
    }
}

fn parse_angle(token: &str) -> Result<f64, ParseError> {
    let token = token.trim();
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidAngle(token.to_string()))
}

fn parse_range(input: &str) -> Result<Vec<f64>, ParseError> {
    let parts: Vec<&str> = input.split(':').collect();
    let [start, stop, step] = parts.as_slice() else {
        return Err(ParseError::InvalidRangeFormat(input.to_string()));
    };
    let (start, stop, step) = (parse_angle(start)?, parse_angle(stop)?, parse_angle(step)?);

    if start == stop {
        return Ok(vec![start]);
    }
    if step == 0.0 || (stop - start).signum() != step.signum() {
        return Err(ParseError::InvalidStep(step));
    }

    // Small slack so that e.g. 0:1:0.1 still ends at 1.0.
    let intervals = ((stop - start) / step + 1e-9).floor();
    let count = intervals as usize + 1;
    if count > MAX_SWEEP_CASES {
        return Err(ParseError::TooManyCases {
            count,
            limit: MAX_SWEEP_CASES,
        });
    }
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}
