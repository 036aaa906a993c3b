//! 입력 방식(직경/알려진 유량) + 기간을 받아 전체 계산을 수행한다.

use serde::Serialize;
use tracing::debug;

use super::duration::{checked_hours, DurationUnit};
use super::flow_table::{BoundaryPolicy, FlowTable};
use super::impact::{compute_impact, ImpactResult, LeakConstants};
use crate::error::{ConfigError, InputError, LeakError};

/// 누설 유량을 얻는 방법. 한 번의 질의에는 하나만 활성화된다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FlowSource {
    /// 오리피스 직경 [mm] → 유량표 보간
    OrificeDiameter { diameter_mm: f64 },
    /// 직접 입력한 누설 유량 [kg/h]
    KnownFlow { mass_flow_kg_h: f64 },
}

/// 표시 계층이 넘겨주는 계산 요청.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeakQuery {
    pub source: FlowSource,
    pub duration_value: f64,
    pub duration_unit: DurationUnit,
}

impl LeakQuery {
    pub fn by_diameter(diameter_mm: f64, duration_value: f64, duration_unit: DurationUnit) -> Self {
        Self {
            source: FlowSource::OrificeDiameter { diameter_mm },
            duration_value,
            duration_unit,
        }
    }

    pub fn by_known_flow(
        mass_flow_kg_h: f64,
        duration_value: f64,
        duration_unit: DurationUnit,
    ) -> Self {
        Self {
            source: FlowSource::KnownFlow { mass_flow_kg_h },
            duration_value,
            duration_unit,
        }
    }
}

/// 질의 한 건의 결과. 중간값(유량, 환산 시간)과 영향 결과를 함께 담는다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeakAssessment {
    pub query: LeakQuery,
    pub mass_flow_kg_h: f64,
    pub duration_hours: f64,
    /// 직경 입력이 유량표 범위를 벗어나 외삽/고정값을 사용했는지 여부
    pub outside_table: bool,
    pub impact: ImpactResult,
}

/// 프로세스 수명 동안 공유되는 불변 유량표와 상수.
///
/// 계산 중 상태를 쓰지 않으므로 `Arc`로 감싸 여러 세션에서 잠금 없이 공유할 수 있다.
#[derive(Debug, Clone)]
pub struct LeakCalculator {
    table: FlowTable,
    constants: LeakConstants,
    boundary: BoundaryPolicy,
}

impl LeakCalculator {
    /// 상수를 검증한 뒤 계산기를 만든다. 잘못된 상수는 시작 단계에서 실패한다.
    pub fn new(
        table: FlowTable,
        constants: LeakConstants,
        boundary: BoundaryPolicy,
    ) -> Result<Self, ConfigError> {
        constants.validate()?;
        Ok(Self {
            table,
            constants,
            boundary,
        })
    }

    pub fn table(&self) -> &FlowTable {
        &self.table
    }

    pub fn constants(&self) -> &LeakConstants {
        &self.constants
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    /// 입력 방식에 따라 누설 유량 [kg/h]을 구한다.
    pub fn mass_flow(&self, source: FlowSource) -> Result<f64, InputError> {
        match source {
            FlowSource::OrificeDiameter { diameter_mm } => {
                self.table.estimate_flow_with(diameter_mm, self.boundary)
            }
            FlowSource::KnownFlow { mass_flow_kg_h } => {
                if !mass_flow_kg_h.is_finite() {
                    return Err(InputError::NotFinite("mass_flow_kg_h"));
                }
                if mass_flow_kg_h < 0.0 {
                    return Err(InputError::NegativeFlow(mass_flow_kg_h));
                }
                Ok(mass_flow_kg_h)
            }
        }
    }

    /// 질의를 끝까지 계산한다. 중간에 실패하면 부분 결과 없이 오류를 반환한다.
    pub fn assess(&self, query: &LeakQuery) -> Result<LeakAssessment, LeakError> {
        let mass_flow_kg_h = self.mass_flow(query.source)?;
        let duration_hours = checked_hours(query.duration_value, query.duration_unit)?;
        let outside_table = match query.source {
            FlowSource::OrificeDiameter { diameter_mm } => !self.table.covers(diameter_mm),
            FlowSource::KnownFlow { .. } => false,
        };
        // 외삽으로 나온 음수 유량은 compute_impact에서 거절된다.
        let impact = compute_impact(mass_flow_kg_h, duration_hours, &self.constants)?;
        debug!(?query, mass_flow_kg_h, duration_hours, "누설 질의 처리");
        Ok(LeakAssessment {
            query: *query,
            mass_flow_kg_h,
            duration_hours,
            outside_table,
            impact,
        })
    }
}
