//! 누설 유량 → 질량 → 에너지 → 비용 → 생산량 기준 원단위(TPE) 환산.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, InputError, LeakError};

/// 물리/경제 상수. 시작 시 한 번 정해지고 이후 변경되지 않는다.
/// 설정 파일에서 빠진 항목은 기본값을 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeakConstants {
    /// 증기 엔탈피 [MJ/kg]
    pub enthalpy_mj_per_kg: f64,
    /// 에너지 단가 [통화/MJ]
    pub cost_per_mj: f64,
    /// 일 기준 생산량 [hL]
    pub reference_volume_day_hl: f64,
    /// 월 기준 생산량 [hL]
    pub reference_volume_month_hl: f64,
    /// 연 기준 생산량 [hL]
    pub reference_volume_year_hl: f64,
}

impl Default for LeakConstants {
    fn default() -> Self {
        Self {
            enthalpy_mj_per_kg: 2409.0 / 1000.0,
            cost_per_mj: 0.089,
            reference_volume_day_hl: 58_333.33,
            reference_volume_month_hl: 1_750_000.0,
            reference_volume_year_hl: 21_000_000.0,
        }
    }
}

impl LeakConstants {
    /// 0 기준 생산량이나 음수 상수를 설정 오류로 거절한다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("enthalpy_mj_per_kg", self.enthalpy_mj_per_kg),
            ("cost_per_mj", self.cost_per_mj),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidConstant(name));
            }
        }
        for (name, value) in [
            ("reference_volume_day_hl", self.reference_volume_day_hl),
            ("reference_volume_month_hl", self.reference_volume_month_hl),
            ("reference_volume_year_hl", self.reference_volume_year_hl),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidConstant(name));
            }
            if value <= 0.0 {
                return Err(ConfigError::ZeroReferenceVolume(name));
            }
        }
        Ok(())
    }
}

/// 한 번의 계산 결과. 반올림하지 않은 값을 담는다.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ImpactResult {
    /// 손실 증기 질량 [kg]
    pub total_mass_kg: f64,
    /// 손실 에너지 [MJ]
    pub energy_mj: f64,
    /// 손실 비용 [통화]
    pub cost: f64,
    /// 일 기준 TPE [MJ/hL]
    pub intensity_day_mj_per_hl: f64,
    /// 월 기준 TPE [MJ/hL]
    pub intensity_month_mj_per_hl: f64,
    /// 연 기준 TPE [MJ/hL]
    pub intensity_year_mj_per_hl: f64,
}

/// 누설 유량과 기간으로 손실 질량/에너지/비용/TPE를 계산한다.
pub fn compute_impact(
    mass_flow_kg_h: f64,
    duration_hours: f64,
    constants: &LeakConstants,
) -> Result<ImpactResult, LeakError> {
    if !mass_flow_kg_h.is_finite() {
        return Err(InputError::NotFinite("mass_flow_kg_h").into());
    }
    if mass_flow_kg_h < 0.0 {
        return Err(InputError::NegativeFlow(mass_flow_kg_h).into());
    }
    if !duration_hours.is_finite() {
        return Err(InputError::NotFinite("duration_hours").into());
    }
    if duration_hours < 0.0 {
        return Err(InputError::NegativeDuration(duration_hours).into());
    }
    constants.validate()?;

    let total_mass_kg = mass_flow_kg_h * duration_hours;
    let energy_mj = total_mass_kg * constants.enthalpy_mj_per_kg;
    let cost = energy_mj * constants.cost_per_mj;
    let result = ImpactResult {
        total_mass_kg,
        energy_mj,
        cost,
        intensity_day_mj_per_hl: energy_mj / constants.reference_volume_day_hl,
        intensity_month_mj_per_hl: energy_mj / constants.reference_volume_month_hl,
        intensity_year_mj_per_hl: energy_mj / constants.reference_volume_year_hl,
    };
    debug!(mass_flow_kg_h, duration_hours, ?result, "누설 영향 계산");
    Ok(result)
}
