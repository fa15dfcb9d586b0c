//! Memory and CPU unit conversions.
//!
//! The IR holds memory in bytes and CPU as relative shares (1024 = one core).

use crate::error::CodecError;

const MIB: u64 = 1 << 20;

/// Smallest memory limit ECS accepts, in MiB.
pub const MIN_MEMORY_MIB: u64 = 4;

/// Convert a native MiB value to bytes. Zero or absent becomes
/// [`MIN_MEMORY_MIB`].
#[must_use]
pub fn mib_to_bytes(mib: Option<u64>) -> u64 {
    match mib {
        Some(mib) if mib > 0 => mib.saturating_mul(MIB),
        _ => MIN_MEMORY_MIB * MIB,
    }
}

/// Convert bytes to whole MiB, rounding down and flooring at
/// [`MIN_MEMORY_MIB`].
#[must_use]
pub fn bytes_to_mib(bytes: Option<u64>) -> u64 {
    (bytes.unwrap_or(0) >> 20).max(MIN_MEMORY_MIB)
}

/// Parse a Docker byte size such as `1073741824`, `512m`, `1g` or `100kb`.
///
/// Units are `b`, `k`, `m` and `g` (powers of 1024), case-insensitive, with an
/// optional trailing `b`.
///
/// # Errors
/// Returns [`CodecError::InvalidQuantity`] for anything else.
pub fn parse_byte_size(text: &str) -> Result<u64, CodecError> {
    let invalid = || CodecError::InvalidQuantity {
        value: text.to_string(),
    };

    let lower = text.trim().to_ascii_lowercase();
    let digits_end = lower
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(lower.len());
    let (number, unit) = lower.split_at(digits_end);

    let multiplier: u64 = match unit {
        "" | "b" => 1,
        "k" | "kb" => 1 << 10,
        "m" | "mb" => 1 << 20,
        "g" | "gb" => 1 << 30,
        _ => return Err(invalid()),
    };

    let decimal = Decimal::parse(number).ok_or_else(invalid)?;
    decimal.scale(u128::from(multiplier), 1).ok_or_else(invalid)
}

/// Parse a Kubernetes memory quantity (`128Mi`, `1G`, `1.5Gi`, `256000000`)
/// into bytes.
///
/// # Errors
/// Returns [`CodecError::InvalidQuantity`] for an unknown suffix or a
/// malformed number.
pub fn parse_memory_quantity(text: &str) -> Result<u64, CodecError> {
    let invalid = || CodecError::InvalidQuantity {
        value: text.to_string(),
    };

    let trimmed = text.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(digits_end);

    let (multiplier, divisor): (u128, u128) = match suffix {
        "" => (1, 1),
        "m" => (1, 1000),
        "k" | "K" => (1_000, 1),
        "M" => (1_000_000, 1),
        "G" => (1_000_000_000, 1),
        "T" => (1_000_000_000_000, 1),
        "Ki" => (1 << 10, 1),
        "Mi" => (1 << 20, 1),
        "Gi" => (1 << 30, 1),
        "Ti" => (1 << 40, 1),
        _ => return Err(invalid()),
    };

    let decimal = Decimal::parse(number).ok_or_else(invalid)?;
    decimal.scale(multiplier, divisor).ok_or_else(invalid)
}

/// Parse a Kubernetes CPU quantity (`500m`, `2`, `0.25`) into CPU shares.
///
/// # Errors
/// Returns [`CodecError::InvalidQuantity`] for a malformed quantity.
pub fn parse_cpu_quantity(text: &str) -> Result<u64, CodecError> {
    let invalid = || CodecError::InvalidQuantity {
        value: text.to_string(),
    };

    let trimmed = text.trim();
    let (number, divisor) = trimmed
        .strip_suffix('m')
        .map_or((trimmed, 1), |millis| (millis, 1000));

    let decimal = Decimal::parse(number).ok_or_else(invalid)?;
    decimal.scale(1024, divisor).ok_or_else(invalid)
}

/// Non-negative decimal number kept as integer parts.
struct Decimal {
    whole: u128,
    fraction: u128,
    fraction_scale: u128,
}

impl Decimal {
    fn parse(text: &str) -> Option<Self> {
        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        let parse = |s: &str| if s.is_empty() { Some(0) } else { s.parse::<u128>().ok() };
        let fraction_digits = u32::try_from(fraction.len()).ok().filter(|d| *d <= 18)?;

        Some(Self {
            whole: parse(whole)?,
            fraction: parse(fraction)?,
            fraction_scale: 10u128.pow(fraction_digits),
        })
    }

    /// `self * multiplier / divisor`, rounded down, if it fits in a `u64`.
    fn scale(&self, multiplier: u128, divisor: u128) -> Option<u64> {
        let whole = self.whole.checked_mul(multiplier)?;
        let fraction = self.fraction.checked_mul(multiplier)? / self.fraction_scale;
        u64::try_from(whole.checked_add(fraction)? / divisor).ok()
    }
}
