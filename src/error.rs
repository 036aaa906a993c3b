//! 계산 코어에서 발생 가능한 오류 종류.
//!
//! 설정/표 오류(`ConfigError`)는 시작 시점에 치명적이며, 입력 오류(`InputError`)는
//! 표시 계층에서 입력을 거절하는 것으로 복구한다.

use std::path::PathBuf;

use thiserror::Error;

/// 설정, 유량표, 상수 검증 오류.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류 ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 유량표에 필요한 열이 없음
    #[error("유량표에 '{0}' 열이 없습니다")]
    MissingColumn(&'static str),
    /// 숫자로 해석할 수 없는 값
    #[error("{line}행 '{column}' 열의 값이 숫자가 아닙니다: {value:?}")]
    NonNumeric {
        line: usize,
        column: &'static str,
        value: String,
    },
    /// 보간에 필요한 최소 2행이 없음
    #[error("유량표는 최소 2행이 필요합니다 (현재 {0}행)")]
    TooFewRows(usize),
    /// 같은 직경이 두 번 이상 등장
    #[error("유량표에 중복된 직경이 있습니다: {0} mm")]
    DuplicateDiameter(f64),
    /// 물리적으로 허용되지 않는 행
    #[error("{line}행이 유효하지 않습니다: {reason}")]
    InvalidRow { line: usize, reason: &'static str },
    /// 지원하지 않는 유량표 파일 형식
    #[error("지원하지 않는 유량표 형식: {0}")]
    UnsupportedTableFormat(String),
    /// 기준 생산량이 0 또는 음수
    #[error("기준 생산량({0})은 0보다 커야 합니다")]
    ZeroReferenceVolume(&'static str),
    /// 엔탈피/단가 등 상수가 유효하지 않음
    #[error("상수 '{0}' 값이 유효하지 않습니다")]
    InvalidConstant(&'static str),
    /// 알 수 없는 기간 단위
    #[error("알 수 없는 기간 단위: {0}")]
    UnknownDurationUnit(String),
}

/// 음수/비유한 입력 등 계산 전 거절해야 하는 입력 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("오리피스 직경은 0보다 커야 합니다: {0} mm")]
    NonPositiveDiameter(f64),
    #[error("증기 유량은 음수일 수 없습니다: {0} kg/h")]
    NegativeFlow(f64),
    #[error("기간은 음수일 수 없습니다: {0}")]
    NegativeDuration(f64),
    #[error("'{0}' 값이 유한한 숫자가 아닙니다")]
    NotFinite(&'static str),
}

/// 계산 한 건을 수행할 때의 오류.
#[derive(Debug, Error)]
pub enum LeakError {
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("입력 오류: {0}")]
    InvalidInput(#[from] InputError),
}
