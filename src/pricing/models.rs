use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// Currency every amount is reported in
pub const CURRENCY: &str = "USD";

const MICROS_PER_DOLLAR: u64 = 1_000_000;

/// Rate card entry for a single model (prices per 1000 tokens)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingEntry {
    pub model_id: String,
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl PricingEntry {
    pub fn new(model_id: impl Into<String>, input_per_1k: f64, output_per_1k: f64) -> Self {
        Self {
            model_id: model_id.into(),
            input_per_1k,
            output_per_1k,
        }
    }
}

/// A non-negative dollar amount held at micro-dollar precision
///
/// Displays and serializes as a fixed 6-place decimal string, e.g. `"0.000360"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UsdAmount {
    micros: u64,
}

impl UsdAmount {
    pub const ZERO: UsdAmount = UsdAmount { micros: 0 };

    pub const fn from_micros(micros: u64) -> Self {
        Self { micros }
    }

    /// Round a dollar value to 6 places (half away from zero)
    ///
    /// Rounding works on the exact binary value of `dollars`, so a value just
    /// below a half micro-dollar rounds down. Negative and non-finite inputs
    /// clamp to zero; values beyond `u64` micros saturate.
    pub fn from_dollars(dollars: f64) -> Self {
        if !dollars.is_finite() || dollars <= 0.0 {
            return Self::ZERO;
        }
        if dollars >= (u64::MAX / MICROS_PER_DOLLAR) as f64 {
            return Self::from_micros(u64::MAX);
        }

        Decimal::from_f64_retain(dollars)
            .map(|d| d.round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|d| d.checked_mul(Decimal::from(MICROS_PER_DOLLAR)))
            .and_then(|d| d.to_u64())
            .map_or(Self::ZERO, Self::from_micros)
    }

    pub fn micros(&self) -> u64 {
        self.micros
    }
}

impl fmt::Display for UsdAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:06}",
            self.micros / MICROS_PER_DOLLAR,
            self.micros % MICROS_PER_DOLLAR
        )
    }
}

/// Error parsing a decimal dollar string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid USD amount: {0:?}")]
pub struct ParseAmountError(String);

impl FromStr for UsdAmount {
    type Err = ParseAmountError;

    /// Accepts plain decimals with at most 6 fractional digits ("12", "0.5", "0.000360")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseAmountError(s.to_string());
        let trimmed = s.trim();
        let (whole, frac) = match trimmed.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (trimmed, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(err());
        }
        if frac.len() > 6
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(err());
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| err())?
        };
        let frac: u64 = if frac.is_empty() {
            0
        } else {
            format!("{:0<6}", frac).parse().map_err(|_| err())?
        };

        whole
            .checked_mul(MICROS_PER_DOLLAR)
            .and_then(|w| w.checked_add(frac))
            .map(UsdAmount::from_micros)
            .ok_or_else(err)
    }
}

impl Add for UsdAmount {
    type Output = UsdAmount;

    fn add(self, rhs: UsdAmount) -> UsdAmount {
        UsdAmount::from_micros(self.micros.saturating_add(rhs.micros))
    }
}

impl Serialize for UsdAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UsdAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Cost breakdown for one prompt/response exchange
///
/// `total_cost` is always the sum of the rounded components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub input_cost: UsdAmount,
    pub output_cost: UsdAmount,
    pub total_cost: UsdAmount,
    pub currency: String,
}

impl CostBreakdown {
    pub fn new(input_cost: UsdAmount, output_cost: UsdAmount) -> Self {
        Self {
            input_cost,
            output_cost,
            total_cost: input_cost + output_cost,
            currency: CURRENCY.to_string(),
        }
    }

    /// Create a zero-cost breakdown
    pub fn zero() -> Self {
        Self::new(UsdAmount::ZERO, UsdAmount::ZERO)
    }
}

impl Default for CostBreakdown {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_display_is_fixed_six_places() {
        assert_eq!(UsdAmount::ZERO.to_string(), "0.000000");
        assert_eq!(UsdAmount::from_micros(360).to_string(), "0.000360");
        assert_eq!(UsdAmount::from_micros(12_500_001).to_string(), "12.500001");
    }

    #[test]
    fn test_from_dollars_rounds_to_micros() {
        assert_eq!(UsdAmount::from_dollars(0.000000036).micros(), 0);
        assert_eq!(UsdAmount::from_dollars(0.00018).micros(), 180);
        assert_eq!(UsdAmount::from_dollars(0.0000016).micros(), 2);
        assert_eq!(UsdAmount::from_dollars(-1.0), UsdAmount::ZERO);
        assert_eq!(UsdAmount::from_dollars(f64::NAN), UsdAmount::ZERO);
    }

    #[test]
    fn test_from_dollars_rounds_exact_binary_value() {
        // Largest f64 below 0.0000005 must not be pulled up to a tie by scaling
        let just_below_half = f64::from_bits(0.0000005_f64.to_bits() - 1);
        assert_eq!(UsdAmount::from_dollars(just_below_half), UsdAmount::ZERO);

        // 0.0078125 is exactly representable, so it is a true tie
        assert_eq!(UsdAmount::from_dollars(0.0078125).micros(), 7_813);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!("0.000360".parse::<UsdAmount>().unwrap().micros(), 360);
        assert_eq!("1.5".parse::<UsdAmount>().unwrap().micros(), 1_500_000);
        assert_eq!("3".parse::<UsdAmount>().unwrap().micros(), 3_000_000);
        assert!("".parse::<UsdAmount>().is_err());
        assert!("-0.1".parse::<UsdAmount>().is_err());
        assert!("0.0000001".parse::<UsdAmount>().is_err());
        assert!("abc".parse::<UsdAmount>().is_err());
    }

    #[test]
    fn test_breakdown_total_is_sum_of_rounded_parts() {
        // Each part rounds down to zero on its own, so the total must too
        let input = UsdAmount::from_dollars(0.0000004);
        let output = UsdAmount::from_dollars(0.0000004);
        let breakdown = CostBreakdown::new(input, output);
        assert_eq!(breakdown.total_cost, UsdAmount::ZERO);
        assert_eq!(breakdown.currency, "USD");
    }

    #[test]
    fn test_breakdown_serializes_as_strings() {
        let breakdown = CostBreakdown::new(UsdAmount::from_micros(180), UsdAmount::from_micros(180));
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "inputCost": "0.000180",
                "outputCost": "0.000180",
                "totalCost": "0.000360",
                "currency": "USD",
            })
        );
    }
}
