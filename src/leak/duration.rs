//! 누설 기간을 시간(h) 단위로 정규화한다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, InputError};

/// 한 달을 30일로 근사한 시간 수. 달력 평균(730.5 h)으로 바꾸지 않는다.
pub const HOURS_PER_MONTH: f64 = 24.0 * 30.0;
pub const HOURS_PER_DAY: f64 = 24.0;
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// 기간 입력 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Minutes,
    Hours,
    Days,
    /// 30일 고정 근사
    Months,
}

impl DurationUnit {
    pub const ALL: [DurationUnit; 4] = [
        DurationUnit::Minutes,
        DurationUnit::Hours,
        DurationUnit::Days,
        DurationUnit::Months,
    ];

    /// 이 단위 1개에 해당하는 시간 수.
    pub fn hours_per_unit(self) -> f64 {
        match self {
            DurationUnit::Minutes => 1.0 / MINUTES_PER_HOUR,
            DurationUnit::Hours => 1.0,
            DurationUnit::Days => HOURS_PER_DAY,
            DurationUnit::Months => HOURS_PER_MONTH,
        }
    }

    /// 값을 시간으로 환산한다. 분은 곱셈 대신 60으로 나눠 120분이 정확히 2.0이 되게 한다.
    pub fn to_hours(self, value: f64) -> f64 {
        match self {
            DurationUnit::Minutes => value / MINUTES_PER_HOUR,
            DurationUnit::Hours => value,
            DurationUnit::Days => value * HOURS_PER_DAY,
            DurationUnit::Months => value * HOURS_PER_MONTH,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            DurationUnit::Minutes => "minutes",
            DurationUnit::Hours => "hours",
            DurationUnit::Days => "days",
            DurationUnit::Months => "months",
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for DurationUnit {
    type Err = ConfigError;

    /// 영어/스페인어/한국어 단위 표기를 받아들인다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        let unit = match tag.as_str() {
            "m" | "min" | "mins" | "minute" | "minutes" | "minuto" | "minutos" | "분" => {
                DurationUnit::Minutes
            }
            "h" | "hr" | "hrs" | "hour" | "hours" | "hora" | "horas" | "시간" => {
                DurationUnit::Hours
            }
            "d" | "day" | "days" | "día" | "dia" | "días" | "dias" | "일" => DurationUnit::Days,
            "mo" | "month" | "months" | "mes" | "meses" | "개월" | "월" => DurationUnit::Months,
            _ => return Err(ConfigError::UnknownDurationUnit(s.trim().to_string())),
        };
        Ok(unit)
    }
}

/// 단위 태그 문자열과 값을 받아 시간으로 환산한다.
pub fn normalize_duration(value: f64, unit_tag: &str) -> Result<f64, ConfigError> {
    let unit: DurationUnit = unit_tag.parse()?;
    Ok(unit.to_hours(value))
}

/// 음수/비유한 기간을 거절한 뒤 시간으로 환산한다.
pub fn checked_hours(value: f64, unit: DurationUnit) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite("duration"));
    }
    if value < 0.0 {
        return Err(InputError::NegativeDuration(value));
    }
    Ok(unit.to_hours(value))
}
