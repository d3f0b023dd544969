//! Carbon footprint calculator.
//!
//! Activity quantities arrive as free-form text. [`normalize_quantity`] is the
//! single place where text becomes a number; anything it cannot read becomes
//! zero, so the scope totals are always finite and non-negative.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Scope1,
    Scope2,
    Scope3,
}

impl Scope {
    pub const fn ordered() -> [Self; 3] {
        [Self::Scope1, Self::Scope2, Self::Scope3]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Scope1 => "Scope 1 (direct)",
            Self::Scope2 => "Scope 2 (indirect energy)",
            Self::Scope3 => "Scope 3 (value chain)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionSource {
    Gasoline,
    Diesel,
    NaturalGas,
    Electricity,
    ShortHaulFlights,
    LongHaulFlights,
    Waste,
}

impl EmissionSource {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Gasoline,
            Self::Diesel,
            Self::NaturalGas,
            Self::Electricity,
            Self::ShortHaulFlights,
            Self::LongHaulFlights,
            Self::Waste,
        ]
    }

    /// Fixed emission factor in tCO2e per input unit.
    pub const fn factor(self) -> f64 {
        match self {
            Self::Gasoline => 2.31,
            Self::Diesel => 2.68,
            Self::NaturalGas => 2.02,
            Self::Electricity => 0.45,
            Self::ShortHaulFlights => 0.255,
            Self::LongHaulFlights => 0.195,
            Self::Waste => 0.52,
        }
    }

    pub const fn scope(self) -> Scope {
        match self {
            Self::Gasoline | Self::Diesel | Self::NaturalGas => Scope::Scope1,
            Self::Electricity => Scope::Scope2,
            Self::ShortHaulFlights | Self::LongHaulFlights | Self::Waste => Scope::Scope3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Gasoline => "Gasoline",
            Self::Diesel => "Diesel",
            Self::NaturalGas => "Natural gas",
            Self::Electricity => "Electricity",
            Self::ShortHaulFlights => "Short-haul flights",
            Self::LongHaulFlights => "Long-haul flights",
            Self::Waste => "Waste",
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Self::Gasoline | Self::Diesel => "L",
            Self::NaturalGas => "m3",
            Self::Electricity => "kWh",
            Self::ShortHaulFlights | Self::LongHaulFlights => "km",
            Self::Waste => "t",
        }
    }
}

/// Raw activity inputs exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub gasoline: String,
    #[serde(deserialize_with = "lenient_text")]
    pub diesel: String,
    #[serde(deserialize_with = "lenient_text")]
    pub natural_gas: String,
    #[serde(deserialize_with = "lenient_text")]
    pub electricity: String,
    #[serde(deserialize_with = "lenient_text")]
    pub short_haul_flights: String,
    #[serde(deserialize_with = "lenient_text")]
    pub long_haul_flights: String,
    #[serde(deserialize_with = "lenient_text")]
    pub waste: String,
}

impl CarbonRecord {
    pub fn raw(&self, source: EmissionSource) -> &str {
        match source {
            EmissionSource::Gasoline => &self.gasoline,
            EmissionSource::Diesel => &self.diesel,
            EmissionSource::NaturalGas => &self.natural_gas,
            EmissionSource::Electricity => &self.electricity,
            EmissionSource::ShortHaulFlights => &self.short_haul_flights,
            EmissionSource::LongHaulFlights => &self.long_haul_flights,
            EmissionSource::Waste => &self.waste,
        }
    }

    pub fn set(&mut self, source: EmissionSource, value: impl Into<String>) {
        let slot = match source {
            EmissionSource::Gasoline => &mut self.gasoline,
            EmissionSource::Diesel => &mut self.diesel,
            EmissionSource::NaturalGas => &mut self.natural_gas,
            EmissionSource::Electricity => &mut self.electricity,
            EmissionSource::ShortHaulFlights => &mut self.short_haul_flights,
            EmissionSource::LongHaulFlights => &mut self.long_haul_flights,
            EmissionSource::Waste => &mut self.waste,
        };
        *slot = value.into();
    }

    pub fn quantity(&self, source: EmissionSource) -> f64 {
        normalize_quantity(self.raw(source))
    }
}

/// Persisted carbon state. `calculated` only decides whether views show the
/// results; the footprint can always be computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonState {
    pub record: CarbonRecord,
    pub calculated: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Footprint {
    pub scope1: f64,
    pub scope2: f64,
    pub scope3: f64,
    pub total: f64,
}

impl Footprint {
    pub fn scope(&self, scope: Scope) -> f64 {
        match scope {
            Scope::Scope1 => self.scope1,
            Scope::Scope2 => self.scope2,
            Scope::Scope3 => self.scope3,
        }
    }

    /// Display copy rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Footprint {
        Footprint {
            scope1: round_to(self.scope1, decimals),
            scope2: round_to(self.scope2, decimals),
            scope3: round_to(self.scope3, decimals),
            total: round_to(self.total, decimals),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionLine {
    pub source: EmissionSource,
    pub label: &'static str,
    pub unit: &'static str,
    pub scope: Scope,
    pub quantity: f64,
    pub factor: f64,
    pub emissions: f64,
}

pub fn compute_footprint(record: &CarbonRecord) -> Footprint {
    let emissions = |source: EmissionSource| record.quantity(source) * source.factor();

    let scope1 = emissions(EmissionSource::Gasoline)
        + emissions(EmissionSource::Diesel)
        + emissions(EmissionSource::NaturalGas);
    let scope2 = emissions(EmissionSource::Electricity);
    let scope3 = emissions(EmissionSource::ShortHaulFlights)
        + emissions(EmissionSource::LongHaulFlights)
        + emissions(EmissionSource::Waste);

    Footprint {
        scope1,
        scope2,
        scope3,
        total: scope1 + scope2 + scope3,
    }
}

pub fn compute_breakdown(record: &CarbonRecord) -> Vec<EmissionLine> {
    EmissionSource::ordered()
        .into_iter()
        .map(|source| {
            let quantity = record.quantity(source);
            EmissionLine {
                source,
                label: source.label(),
                unit: source.unit(),
                scope: source.scope(),
                quantity,
                factor: source.factor(),
                emissions: quantity * source.factor(),
            }
        })
        .collect()
}

/// Largest activity quantity accepted for a single source. Anything above it
/// normalizes to zero, which keeps every product and scope sum finite.
pub const MAX_QUANTITY: f64 = 1e15;

/// Reads the leading decimal number of `raw` (so `"120 L"` is 120). Empty,
/// non-numeric, non-finite, negative and out-of-range input all normalize to
/// zero.
pub fn normalize_quantity(raw: &str) -> f64 {
    let text = raw.trim();
    let end = numeric_prefix_len(text);
    if end == 0 {
        return 0.0;
    }

    match text[..end].parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 && value <= MAX_QUANTITY => value,
        _ => 0.0,
    }
}

fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut digits = pos - int_start;

    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            pos = frac_end;
        }
    }

    if digits == 0 {
        return 0;
    }

    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_digits_start = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits_start {
            pos = exp;
        }
    }

    pos
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

// Older saves may hold numbers or nulls where text is expected.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn gasoline_only_lands_in_scope_one() {
        let record = CarbonRecord {
            gasoline: "100".to_string(),
            ..CarbonRecord::default()
        };

        let footprint = compute_footprint(&record);
        assert!(close(footprint.scope1, 231.0));
        assert_eq!(footprint.scope2, 0.0);
        assert_eq!(footprint.scope3, 0.0);
        assert!(close(footprint.total, 231.0));
    }

    #[test]
    fn empty_record_is_all_zero() {
        let footprint = compute_footprint(&CarbonRecord::default());
        assert_eq!(footprint, Footprint::default());
    }

    #[test]
    fn total_is_exact_sum_of_scopes() {
        let record = CarbonRecord {
            gasoline: "12.5".to_string(),
            diesel: "3".to_string(),
            natural_gas: "7.25".to_string(),
            electricity: "1800".to_string(),
            short_haul_flights: "950".to_string(),
            long_haul_flights: "12000".to_string(),
            waste: "0.8".to_string(),
        };

        let footprint = compute_footprint(&record);
        assert_eq!(
            footprint.total,
            footprint.scope1 + footprint.scope2 + footprint.scope3
        );
        assert!(close(footprint.scope2, 810.0));
        assert!(close(
            footprint.scope3,
            950.0 * 0.255 + 12000.0 * 0.195 + 0.8 * 0.52
        ));
    }

    #[test]
    fn normalization_reads_leading_numbers_and_zeroes_the_rest() {
        assert_eq!(normalize_quantity(""), 0.0);
        assert_eq!(normalize_quantity("   "), 0.0);
        assert_eq!(normalize_quantity("abc"), 0.0);
        assert_eq!(normalize_quantity("NaN"), 0.0);
        assert_eq!(normalize_quantity("inf"), 0.0);
        assert_eq!(normalize_quantity("-40"), 0.0);
        assert_eq!(normalize_quantity("1e999"), 0.0);
        assert_eq!(normalize_quantity("."), 0.0);
        assert_eq!(normalize_quantity(" 42 "), 42.0);
        assert_eq!(normalize_quantity("120 L"), 120.0);
        assert_eq!(normalize_quantity("3.5kWh"), 3.5);
        assert_eq!(normalize_quantity(".5"), 0.5);
        assert_eq!(normalize_quantity("2e3"), 2000.0);
        assert_eq!(normalize_quantity("7e"), 7.0);
        assert_eq!(normalize_quantity("1e15"), MAX_QUANTITY);
        assert_eq!(normalize_quantity("1.5e15"), 0.0);
    }

    #[test]
    fn garbage_inputs_never_produce_nan() {
        let record = CarbonRecord {
            gasoline: "lots".to_string(),
            diesel: "-1".to_string(),
            natural_gas: "1e400".to_string(),
            electricity: "NaN".to_string(),
            ..CarbonRecord::default()
        };

        let footprint = compute_footprint(&record);
        assert!(footprint.total.is_finite());
        assert_eq!(footprint.total, 0.0);
    }

    #[test]
    fn oversized_quantities_keep_totals_finite() {
        let single = CarbonRecord {
            diesel: "1e308".to_string(),
            ..CarbonRecord::default()
        };
        let footprint = compute_footprint(&single);
        assert!(footprint.scope1.is_finite());
        assert!(footprint.total.is_finite());
        assert_eq!(footprint.total, 0.0);

        let paired = CarbonRecord {
            gasoline: "7e307".to_string(),
            diesel: "7e307".to_string(),
            ..CarbonRecord::default()
        };
        let footprint = compute_footprint(&paired);
        assert_eq!(footprint, Footprint::default());
        assert!(compute_breakdown(&paired)
            .iter()
            .all(|line| line.emissions.is_finite()));

        let mut saturated = CarbonRecord::default();
        for source in EmissionSource::ordered() {
            saturated.set(source, "1e15");
        }
        let footprint = compute_footprint(&saturated);
        for value in [footprint.scope1, footprint.scope2, footprint.scope3, footprint.total] {
            assert!(value.is_finite() && value > 0.0);
        }
        let encoded = serde_json::to_value(footprint).expect("footprint encodes");
        assert!(encoded["total"].is_f64());
    }

    #[test]
    fn breakdown_matches_footprint_by_scope() {
        let mut record = CarbonRecord::default();
        record.set(EmissionSource::Diesel, "10");
        record.set(EmissionSource::Waste, "2");
        record.set(EmissionSource::Electricity, "100");

        let breakdown = compute_breakdown(&record);
        let footprint = compute_footprint(&record);
        assert_eq!(breakdown.len(), 7);

        for scope in Scope::ordered() {
            let from_lines: f64 = breakdown
                .iter()
                .filter(|line| line.scope == scope)
                .map(|line| line.emissions)
                .sum();
            assert!(close(from_lines, footprint.scope(scope)));
        }
    }

    #[test]
    fn rounding_is_display_only() {
        let record = CarbonRecord {
            gasoline: "1".to_string(),
            ..CarbonRecord::default()
        };
        let footprint = compute_footprint(&record);
        assert_eq!(footprint.scope1, 2.31);
        assert_eq!(footprint.rounded(1).scope1, 2.3);
        assert_eq!(footprint.rounded(0).total, 2.0);
    }

    #[test]
    fn numeric_json_values_are_accepted_as_text() {
        let state: CarbonState =
            serde_json::from_str(r#"{"record":{"gasoline":50,"diesel":null},"calculated":true}"#)
                .expect("state parses");
        assert_eq!(state.record.gasoline, "50");
        assert_eq!(state.record.diesel, "");
        assert!(state.calculated);
    }
}
