//! Text conversion for [`Fxp`].
//!
//! `Display` writes the shortest exact form (no trailing fractional zeros) and
//! `FromStr` reads it back, so `parse(format(v)) == v` for every value,
//! including the `Fxp::MIN` sentinel.

use core::fmt;
use core::str::FromStr;

use super::{DIGITS, Fxp, FxpError, SCALE};

impl fmt::Display for Fxp {
    /// Honors width and alignment flags.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.raw();
        let magnitude = raw.unsigned_abs();
        let whole = magnitude / SCALE as u64;
        let frac = magnitude % SCALE as u64;
        let sign = if raw < 0 { "-" } else { "" };
        if frac == 0 {
            return f.pad(&format!("{sign}{whole}"));
        }
        let digits = format!("{:0width$}", frac, width = DIGITS as usize);
        f.pad(&format!("{sign}{whole}.{}", digits.trim_end_matches('0')))
    }
}

impl FromStr for Fxp {
    type Err = FxpError;

    /// Parses decimal text.
    ///
    /// Surrounding whitespace and `,` group separators are ignored, a leading
    /// `+` or `-` is accepted, and fraction digits beyond the fixed scale are
    /// truncated.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || FxpError::MalformedNumber {
            text: text.to_owned(),
        };

        let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
        let (negative, unsigned) = match cleaned.as_bytes().first() {
            Some(b'-') => (true, &cleaned[1..]),
            Some(b'+') => (false, &cleaned[1..]),
            _ => (false, cleaned.as_str()),
        };

        let (whole, frac) = match unsigned.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (unsigned, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(malformed());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let whole = whole.trim_start_matches('0');
        // i64::MAX has 15 whole digits at this scale
        if whole.len() > 16 {
            return Err(malformed());
        }
        let whole_value: i128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| malformed())?
        };

        let mut frac_value: i128 = 0;
        for (i, b) in frac.bytes().take(DIGITS as usize).enumerate() {
            frac_value += (b - b'0') as i128 * 10_i128.pow(DIGITS - 1 - i as u32);
        }

        let magnitude = whole_value * SCALE as i128 + frac_value;
        let value = if negative { -magnitude } else { magnitude };
        if value < i64::MIN as i128 || value > i64::MAX as i128 {
            return Err(malformed());
        }
        Ok(Fxp::from_raw(value as i64))
    }
}
