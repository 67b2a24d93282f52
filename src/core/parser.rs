use std::fmt;

use crate::core::error::{CoordinateError, ParseError};
use crate::core::validation::validate;
use crate::models::Coordinate;

/// Which component of a pair a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'N' => Some(Hemisphere::North),
            'S' => Some(Hemisphere::South),
            'E' => Some(Hemisphere::East),
            'W' => Some(Hemisphere::West),
            _ => None,
        }
    }

    /// South and West are negative
    pub fn sign(self) -> f64 {
        match self {
            Hemisphere::North | Hemisphere::East => 1.0,
            Hemisphere::South | Hemisphere::West => -1.0,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Hemisphere::North | Hemisphere::South => Axis::Latitude,
            Hemisphere::East | Hemisphere::West => Axis::Longitude,
        }
    }
}

/// A single parsed angle in signed decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle {
    pub value: f64,
    pub hemisphere: Option<Hemisphere>,
}

impl Angle {
    /// Value of the angle, refusing a hemisphere letter of the other axis
    pub fn for_axis(self, axis: Axis, raw: &str) -> Result<f64, ParseError> {
        match self.hemisphere {
            Some(h) if h.axis() != axis => Err(ParseError::new(
                raw,
                format!("hemisphere {h:?} does not apply to {axis}"),
            )),
            _ => Ok(self.value),
        }
    }
}

/// Parse a `"latitude,longitude"` pair into a validated coordinate
///
/// Each side may be decimal degrees (`40.748817`) or DMS, either
/// symbol-delimited (`40°44'55.7"N`) or space-delimited (`40 44 55.7 N`).
/// Format problems are [`ParseError`]s; out-of-range values are
/// [`ValidationError`](crate::core::error::ValidationError)s.
pub fn parse(raw: &str) -> Result<Coordinate, CoordinateError> {
    let mut parts = raw.trim().split(',');
    let (lat, lon) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lon), None) => (lat, lon),
        _ => {
            return Err(ParseError::new(
                raw,
                "expected 'latitude,longitude' separated by exactly one comma",
            )
            .into())
        }
    };

    let latitude = pair_component(raw, lat, Axis::Latitude)?;
    let longitude = pair_component(raw, lon, Axis::Longitude)?;

    Ok(validate(latitude, longitude)?)
}

fn pair_component(raw: &str, token: &str, axis: Axis) -> Result<f64, ParseError> {
    parse_angle(token)
        .and_then(|angle| angle.for_axis(axis, token))
        .map_err(|e| ParseError::new(raw, format!("{axis}: {}", e.reason)))
}

/// Convert one DMS (or plain decimal) angle to signed decimal degrees
///
/// `parse_dms("27 29 44.09 S")` is about `-27.49558`.
pub fn parse_dms(raw: &str) -> Result<f64, ParseError> {
    parse_angle(raw).map(|angle| angle.value)
}

/// Parse one angle, keeping track of the hemisphere letter it carried
pub fn parse_angle(raw: &str) -> Result<Angle, ParseError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ParseError::new(raw, "empty value"));
    }

    if let Ok(value) = text.parse::<f64>() {
        return if value.is_finite() {
            Ok(Angle {
                value,
                hemisphere: None,
            })
        } else {
            Err(ParseError::new(raw, "value must be finite"))
        };
    }

    let (body, hemisphere) = split_hemisphere(raw, text)?;
    let [degrees, minutes, seconds] = if body.chars().any(is_unit_mark) {
        symbol_fields(raw, body)?
    } else {
        spaced_fields(raw, body)?
    };

    let value = to_decimal(raw, degrees, minutes, seconds, hemisphere)?;
    Ok(Angle { value, hemisphere })
}

fn is_unit_mark(c: char) -> bool {
    unit_of(c).is_some()
}

fn unit_of(c: char) -> Option<usize> {
    match c {
        '°' | 'º' => Some(0),
        '\'' | '′' => Some(1),
        '"' | '″' => Some(2),
        _ => None,
    }
}

/// Strip a trailing hemisphere letter, standalone or glued to the number
fn split_hemisphere<'a>(
    raw: &str,
    text: &'a str,
) -> Result<(&'a str, Option<Hemisphere>), ParseError> {
    let last = match text.chars().last() {
        Some(c) if c.is_alphabetic() => c,
        _ => return Ok((text, None)),
    };

    let body = &text[..text.len() - last.len_utf8()];
    let attached_to_word = body.chars().last().is_some_and(char::is_alphabetic);
    if attached_to_word {
        // a word, not a hemisphere; let number parsing report it
        return Ok((text, None));
    }

    match Hemisphere::from_letter(last) {
        Some(h) if body.trim().is_empty() => Err(ParseError::new(
            raw,
            format!("hemisphere {h:?} without degrees"),
        )),
        Some(h) => Ok((body.trim_end(), Some(h))),
        None => Err(ParseError::new(
            raw,
            format!("unrecognized hemisphere letter '{last}'"),
        )),
    }
}

/// `D°M'S"`, with any trailing part allowed to omit its mark
fn symbol_fields(raw: &str, body: &str) -> Result<[f64; 3], ParseError> {
    let mut fields: [Option<f64>; 3] = [None; 3];
    let mut next_unit = 0;
    let mut pending = String::new();

    for c in body.chars() {
        match unit_of(c) {
            Some(unit) => {
                if unit < next_unit {
                    return Err(ParseError::new(raw, format!("unexpected '{c}'")));
                }
                fields[unit] = Some(number(raw, &pending)?);
                pending.clear();
                next_unit = unit + 1;
            }
            None => pending.push(c),
        }
    }

    let tail = pending.trim();
    if !tail.is_empty() {
        if next_unit > 2 {
            return Err(ParseError::new(raw, format!("unexpected trailing '{tail}'")));
        }
        fields[next_unit] = Some(number(raw, tail)?);
    }

    let degrees = fields[0].ok_or_else(|| ParseError::new(raw, "missing degree marker"))?;
    Ok([degrees, fields[1].unwrap_or(0.0), fields[2].unwrap_or(0.0)])
}

/// `D M S`, one to three whitespace-separated numbers
fn spaced_fields(raw: &str, body: &str) -> Result<[f64; 3], ParseError> {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() > 3 {
        return Err(ParseError::new(
            raw,
            format!("expected degrees, minutes and seconds, found {} fields", tokens.len()),
        ));
    }

    let mut fields = [0.0; 3];
    for (slot, token) in fields.iter_mut().zip(&tokens) {
        *slot = number(raw, token)?;
    }
    Ok(fields)
}

fn number(raw: &str, token: &str) -> Result<f64, ParseError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ParseError::new(raw, "missing number before unit mark"));
    }
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::new(raw, format!("'{token}' is not a number"))),
    }
}

fn to_decimal(
    raw: &str,
    degrees: f64,
    minutes: f64,
    seconds: f64,
    hemisphere: Option<Hemisphere>,
) -> Result<f64, ParseError> {
    if !(0.0..60.0).contains(&minutes) {
        return Err(ParseError::new(raw, format!("minutes {minutes} outside [0, 60)")));
    }
    if !(0.0..60.0).contains(&seconds) {
        return Err(ParseError::new(raw, format!("seconds {seconds} outside [0, 60)")));
    }

    let negative_degrees = degrees.is_sign_negative();
    let sign = match hemisphere {
        Some(_) if negative_degrees => {
            return Err(ParseError::new(
                raw,
                "negative degrees conflict with hemisphere letter",
            ))
        }
        Some(h) => h.sign(),
        None if negative_degrees => -1.0,
        None => 1.0,
    };

    Ok(sign * (degrees.abs() + minutes / 60.0 + seconds / 3600.0))
}
