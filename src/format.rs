//! 표시 경계에서만 쓰는 반올림/자릿수 구분 포맷.
//! 계산 코어의 값은 반올림하지 않고, 화면에 보일 때만 여기서 자른다.

use crate::leak::ImpactResult;

/// 에너지/비용 표시 소수 자릿수
pub const MONEY_DECIMALS: usize = 2;
/// TPE 표시 소수 자릿수
pub const INTENSITY_DECIMALS: usize = 4;

/// `1234567.891` → `"1,234,567.89"` (decimals = 2)
pub fn with_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    // -0.00 같은 표시는 피한다
    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// 화면 표시용 문자열 묶음.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedImpact {
    pub total_mass_kg: String,
    pub energy_mj: String,
    pub cost: String,
    pub intensity_day: String,
    pub intensity_month: String,
    pub intensity_year: String,
}

impl DisplayedImpact {
    pub fn new(result: &ImpactResult, currency_symbol: &str) -> Self {
        Self {
            total_mass_kg: with_thousands(result.total_mass_kg, MONEY_DECIMALS),
            energy_mj: with_thousands(result.energy_mj, MONEY_DECIMALS),
            cost: format!(
                "{currency_symbol}{}",
                with_thousands(result.cost, MONEY_DECIMALS)
            ),
            intensity_day: with_thousands(result.intensity_day_mj_per_hl, INTENSITY_DECIMALS),
            intensity_month: with_thousands(result.intensity_month_mj_per_hl, INTENSITY_DECIMALS),
            intensity_year: with_thousands(result.intensity_year_mj_per_hl, INTENSITY_DECIMALS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(with_thousands(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(with_thousands(999.999, 2), "1,000.00");
        assert_eq!(with_thousands(12.0, 0), "12");
        assert_eq!(with_thousands(0.005162, 4), "0.0052");
    }

    #[test]
    fn negative_values_keep_sign_but_not_negative_zero() {
        assert_eq!(with_thousands(-2500.5, 1), "-2,500.5");
        assert_eq!(with_thousands(-0.0001, 2), "0.00");
    }

    #[test]
    fn cost_uses_currency_symbol() {
        let result = ImpactResult {
            cost: 26.800125,
            ..ImpactResult::default()
        };
        assert_eq!(DisplayedImpact::new(&result, "$").cost, "$26.80");
    }
}
