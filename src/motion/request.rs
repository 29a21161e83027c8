//! Motion requests and parameter parsing.
//!
//! The HTTP layer hands over the submitted form as key/value pairs (or the
//! raw `a=b&c=d` string). Everything numeric is validated here so the rest
//! of the engine only ever sees a well-formed [`MotionRequest`].

use core::fmt;
use core::str::FromStr;

use crate::config::units::{Degrees, RpmPerSec};
use crate::error::RequestError;

/// Direction of turntable rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive step count.
    #[default]
    Forward,
    /// Negative step count.
    Reverse,
}

impl Direction {
    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }

    /// Form value for this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("forward") {
            Ok(Direction::Forward)
        } else if s.eq_ignore_ascii_case("reverse") {
            Ok(Direction::Reverse)
        } else {
            Err(())
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validated motion request.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionRequest {
    /// Angle per repetition (≥ 0).
    pub angle: Degrees,
    /// Time allotted to each repetition in milliseconds (> 0).
    pub duration_ms: u32,
    /// Rotation direction.
    pub direction: Direction,
    /// Number of repetitions (≥ 1).
    pub repetitions: u32,
    /// Pause between repetitions in milliseconds.
    pub rep_delay_ms: u32,
    /// Requested acceleration; `None` or ≤ 0 means the configured default.
    pub acceleration: Option<RpmPerSec>,
    /// Requested deceleration; `None` or ≤ 0 means the configured default.
    pub deceleration: Option<RpmPerSec>,
}

impl MotionRequest {
    /// Single-repetition request with default ramps.
    pub fn new(angle: Degrees, duration_ms: u32, direction: Direction) -> Self {
        Self {
            angle,
            duration_ms,
            direction,
            repetitions: 1,
            rep_delay_ms: 0,
            acceleration: None,
            deceleration: None,
        }
    }

    /// Set the repetition count and the pause between repetitions.
    pub fn repeated(mut self, repetitions: u32, rep_delay_ms: u32) -> Self {
        self.repetitions = repetitions;
        self.rep_delay_ms = rep_delay_ms;
        self
    }

    /// Set explicit acceleration and deceleration.
    pub fn with_ramps(mut self, acceleration: RpmPerSec, deceleration: RpmPerSec) -> Self {
        self.acceleration = Some(acceleration);
        self.deceleration = Some(deceleration);
        self
    }

    /// Angle covered by all repetitions together.
    pub fn expected_total_angle(&self) -> Degrees {
        self.angle * self.repetitions as f32
    }

    /// Build a request from form parameters.
    ///
    /// Recognised keys: `angle`, `time`, `direction` (required) and
    /// `repetitions`, `repDelay`, `acceleration`, `deceleration` (optional).
    /// Empty values count as absent, unknown keys are ignored and a repeated
    /// key keeps its last value.
    ///
    /// # Errors
    ///
    /// - [`RequestError::MissingParameter`] if `angle`, `time` or `direction` is absent
    /// - [`RequestError::InvalidParameter`] if a value is malformed or out of range
    pub fn from_params<'a, I>(params: I) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut raw = RawParams::default();
        for (key, value) in params {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key {
                "angle" => raw.angle = Some(value),
                "time" => raw.time = Some(value),
                "direction" => raw.direction = Some(value),
                "repetitions" => raw.repetitions = Some(value),
                "repDelay" => raw.rep_delay = Some(value),
                "acceleration" => raw.acceleration = Some(value),
                "deceleration" => raw.deceleration = Some(value),
                _ => {}
            }
        }

        let angle_text = raw.angle.ok_or(RequestError::MissingParameter("angle"))?;
        let time = raw.time.ok_or(RequestError::MissingParameter("time"))?;
        let direction = raw.direction.ok_or(RequestError::MissingParameter("direction"))?;

        let angle: f32 = parse("angle", angle_text)?;
        if angle < 0.0 || !angle.is_finite() {
            return Err(invalid("angle", angle_text));
        }

        let duration_ms: u32 = parse("time", time)?;
        if duration_ms == 0 {
            return Err(invalid("time", time));
        }

        let direction: Direction = direction.parse().map_err(|_| invalid("direction", direction))?;

        let repetitions = match raw.repetitions {
            Some(value) => {
                let reps: u32 = parse("repetitions", value)?;
                if reps == 0 {
                    return Err(invalid("repetitions", value));
                }
                reps
            }
            None => 1,
        };

        let rep_delay_ms = match raw.rep_delay {
            Some(value) => parse("repDelay", value)?,
            None => 0,
        };

        let acceleration = raw
            .acceleration
            .map(|v| parse::<f32>("acceleration", v).map(RpmPerSec))
            .transpose()?;
        let deceleration = raw
            .deceleration
            .map(|v| parse::<f32>("deceleration", v).map(RpmPerSec))
            .transpose()?;

        Ok(Self {
            angle: Degrees(angle),
            duration_ms,
            direction,
            repetitions,
            rep_delay_ms,
            acceleration,
            deceleration,
        })
    }

    /// Build a request from a raw `key=value&key=value` form string.
    ///
    /// A leading `?` is ignored. See [`MotionRequest::from_params`].
    pub fn from_query(query: &str) -> Result<Self, RequestError> {
        Self::from_params(parse_query(query))
    }
}

/// Split a `key=value&key=value` string into pairs.
///
/// Pairs without `=` yield an empty value.
pub fn parse_query(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query
        .strip_prefix('?')
        .unwrap_or(query)
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}

#[derive(Default)]
struct RawParams<'a> {
    angle: Option<&'a str>,
    time: Option<&'a str>,
    direction: Option<&'a str>,
    repetitions: Option<&'a str>,
    rep_delay: Option<&'a str>,
    acceleration: Option<&'a str>,
    deceleration: Option<&'a str>,
}

fn parse<T: FromStr>(name: &'static str, value: &str) -> Result<T, RequestError> {
    value.parse().map_err(|_| invalid(name, value))
}

fn invalid(name: &'static str, value: &str) -> RequestError {
    let mut truncated = heapless::String::new();
    for c in value.chars() {
        if truncated.push(c).is_err() {
            break;
        }
    }
    RequestError::InvalidParameter {
        name,
        value: truncated,
    }
}
