//! Duration string parsing
//!
//! Accepts the `[-+]<number><unit>...` syntax, e.g. `300ms`, `1.5h`, `2h45m`.
//! Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. A bare `0`
//! needs no unit.

use std::time::Duration;

use contracts::ContractError;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Largest representable duration, in nanoseconds (signed 64-bit range)
const MAX_NANOS: u128 = i64::MAX as u128;

/// A duration with its sign kept separately, since `Duration` is unsigned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDuration {
    pub negative: bool,
    pub magnitude: Duration,
}

impl ParsedDuration {
    /// True when the value is strictly below zero (`-0s` is zero)
    pub fn is_negative(&self) -> bool {
        self.negative && !self.magnitude.is_zero()
    }
}

/// Parse a duration string, keeping its sign
pub fn parse_duration(input: &str) -> Result<ParsedDuration, ContractError> {
    let invalid = || ContractError::config_parse(format!("invalid duration {input:?}"));
    let out_of_range = || ContractError::config_parse(format!("duration {input:?} out of range"));

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(ParsedDuration {
            negative,
            magnitude: Duration::ZERO,
        });
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, after) = rest.split_at(int_len);

        let (frac_digits, after) = match after.strip_prefix('.') {
            Some(tail) => tail.split_at(tail.bytes().take_while(u8::is_ascii_digit).count()),
            None => ("", after),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        let unit_len = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_len);
        if unit.is_empty() {
            return Err(ContractError::config_parse(format!(
                "missing unit in duration {input:?}"
            )));
        }
        let scale = unit_nanos(unit).ok_or_else(|| {
            ContractError::config_parse(format!("unknown unit {unit:?} in duration {input:?}"))
        })?;

        let whole: u128 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| out_of_range())?
        };
        let mut value = whole.checked_mul(scale).ok_or_else(out_of_range)?;

        if !frac_digits.is_empty() {
            // Digits past nanosecond precision of an hour cannot change the result
            let digits = &frac_digits[..frac_digits.len().min(18)];
            let frac: u128 = digits.parse().map_err(|_| invalid())?;
            value += frac * scale / 10u128.pow(digits.len() as u32);
        }

        total = total.checked_add(value).ok_or_else(out_of_range)?;
        if total > MAX_NANOS {
            return Err(out_of_range());
        }
        rest = after;
    }

    Ok(ParsedDuration {
        negative,
        magnitude: Duration::from_nanos(total as u64),
    })
}

/// Parse a hold time; negative values are a configuration error
pub fn parse_delay(input: &str) -> Result<Duration, ContractError> {
    let parsed = parse_duration(input.trim())?;
    if parsed.is_negative() {
        return Err(ContractError::config_validation(
            "delay",
            format!("cannot wait negative time: {}", input.trim()),
        ));
    }
    Ok(parsed.magnitude)
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}
