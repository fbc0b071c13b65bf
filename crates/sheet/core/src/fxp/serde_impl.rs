//! Serde support for [`Fxp`].
//!
//! Values are written as plain numbers when an `f64` carries them exactly and
//! as strings otherwise. Both forms are accepted on input.

use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Fxp, FxpError, SCALE};

/// Raw magnitudes below this survive an `f64` round trip through text.
const EXACT_F64_RAW: u64 = 1_000_000_000_000_000;

impl Serialize for Fxp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let raw = self.raw();
        if raw % SCALE == 0 {
            serializer.serialize_i64(self.as_int())
        } else if raw.unsigned_abs() < EXACT_F64_RAW {
            let text = self.to_string();
            match text.parse::<f64>() {
                Ok(value) => serializer.serialize_f64(value),
                Err(_) => serializer.serialize_str(&text),
            }
        } else {
            serializer.serialize_str(&self.to_string())
        }
    }
}

fn out_of_range(v: impl fmt::Display) -> FxpError {
    FxpError::MalformedNumber {
        text: v.to_string(),
    }
}

struct FxpVisitor;

impl<'de> Visitor<'de> for FxpVisitor {
    type Value = Fxp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Fxp, E> {
        v.checked_mul(SCALE)
            .map(Fxp::from_raw)
            .ok_or_else(|| E::custom(out_of_range(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Fxp, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(out_of_range(v)))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Fxp, E> {
        // Display for f64 is the shortest text that reads back to the same value.
        format!("{v}").parse().map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Fxp, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Fxp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FxpVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_numbers_when_exact() {
        assert_eq!(serde_json::to_string(&Fxp::from_int(12)).unwrap(), "12");
        assert_eq!(serde_json::to_string(&Fxp::from_raw(52_500)).unwrap(), "5.25");
        assert_eq!(
            serde_json::to_string(&Fxp::MIN).unwrap(),
            "\"-922337203685477.5808\""
        );
    }

    #[test]
    fn json_accepts_numbers_and_strings() {
        let values: Vec<Fxp> = serde_json::from_str(r#"[3, 0.1, "-2.75", -4]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Fxp::from_int(3),
                Fxp::from_raw(1_000),
                Fxp::from_raw(-27_500),
                Fxp::from_int(-4)
            ]
        );
        assert!(serde_json::from_str::<Fxp>(r#""abc""#).is_err());
    }

    #[test]
    fn out_of_range_integers_fail_like_strings() {
        let too_big = "10000000000000000";
        assert!(serde_json::from_str::<Fxp>(too_big).is_err());
        assert!(serde_json::from_str::<Fxp>(&format!("\"{too_big}\"")).is_err());
        assert!(serde_json::from_str::<Fxp>("-10000000000000000").is_err());
        assert!(serde_json::from_str::<Fxp>("18446744073709551615").is_err());

        let largest = serde_json::from_str::<Fxp>("922337203685477").unwrap();
        assert_eq!(largest, Fxp::from_int(922_337_203_685_477));
    }
}
