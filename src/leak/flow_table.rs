//! 오리피스 직경 → 누설 증기 유량 환산표와 선형 보간.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ConfigError, InputError};

/// 유량표의 한 행. 직경(mm)과 그 직경에서의 누설 유량(kg/h).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowTableRow {
    #[serde(alias = "diametro_mm")]
    pub diameter_mm: f64,
    #[serde(alias = "kg_h")]
    pub mass_flow_kg_h: f64,
}

/// 표 범위를 벗어난 직경을 처리하는 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// 가장 가까운 경계 구간의 기울기로 연장한다.
    #[default]
    Extrapolate,
    /// 경계 행의 유량을 그대로 사용한다.
    Clamp,
}

const DIAMETER_COLUMNS: [&str; 4] = ["diametro_mm", "diameter_mm", "diametro", "diameter"];
const FLOW_COLUMNS: [&str; 4] = ["kg_h", "mass_flow_kg_h", "flujo_kg_h", "flow_kg_h"];

/// 직경 오름차순으로 정렬된 불변 유량표. 최소 2행을 보장한다.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowTable {
    rows: Vec<FlowTableRow>,
}

#[derive(Debug, Deserialize)]
struct TomlFlowTable {
    #[serde(default)]
    rows: Vec<FlowTableRow>,
}

impl FlowTable {
    /// 행 목록을 검증하고 직경 순으로 정렬해 유량표를 만든다.
    pub fn from_rows(rows: Vec<FlowTableRow>) -> Result<Self, ConfigError> {
        build(rows.into_iter().enumerate().map(|(i, r)| (i + 1, r)).collect())
    }

    /// 확장자(.csv / .toml)에 따라 유량표 파일을 읽는다.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        let table = match ext.as_str() {
            "csv" | "txt" => Self::from_csv_str(&content)?,
            "toml" => Self::from_toml_str(&content)?,
            other => return Err(ConfigError::UnsupportedTableFormat(other.to_string())),
        };
        let (min, max) = table.diameter_range();
        info!(
            path = %path.display(),
            rows = table.len(),
            min_diameter_mm = min,
            max_diameter_mm = max,
            "유량표 로드 완료"
        );
        Ok(table)
    }

    /// `[[rows]]` 배열 형식의 TOML 유량표를 파싱한다.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let parsed: TomlFlowTable = toml::from_str(src)?;
        Self::from_rows(parsed.rows)
    }

    /// 헤더 행이 있는 CSV를 파싱한다.
    ///
    /// `;` 구분자를 쓰는 파일은 소수점 쉼표(`1,5`)도 허용한다. `#`로 시작하는 줄과
    /// 빈 줄은 건너뛴다.
    pub fn from_csv_str(src: &str) -> Result<Self, ConfigError> {
        let mut lines = src
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

        let (_, header) = lines.next().ok_or(ConfigError::TooFewRows(0))?;
        let delimiter = if header.contains(';') { ';' } else { ',' };
        let columns: Vec<String> = header
            .split(delimiter)
            .map(|c| unquote(c).to_lowercase())
            .collect();
        let find = |names: &[&str]| columns.iter().position(|c| names.contains(&c.as_str()));
        let d_idx = find(&DIAMETER_COLUMNS).ok_or(ConfigError::MissingColumn("diametro_mm"))?;
        let f_idx = find(&FLOW_COLUMNS).ok_or(ConfigError::MissingColumn("kg_h"))?;

        let mut rows = Vec::new();
        for (line, text) in lines {
            let cells: Vec<&str> = text.split(delimiter).collect();
            let diameter_mm = parse_cell(&cells, d_idx, line, "diametro_mm", delimiter)?;
            let mass_flow_kg_h = parse_cell(&cells, f_idx, line, "kg_h", delimiter)?;
            rows.push((
                line,
                FlowTableRow {
                    diameter_mm,
                    mass_flow_kg_h,
                },
            ));
        }
        build(rows)
    }

    pub fn rows(&self) -> &[FlowTableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 검증을 통과한 표는 항상 2행 이상이므로 false만 반환한다.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 표에 수록된 (최소, 최대) 직경.
    pub fn diameter_range(&self) -> (f64, f64) {
        let first = self.rows[0].diameter_mm;
        let last = self.rows[self.rows.len() - 1].diameter_mm;
        (first, last)
    }

    pub fn covers(&self, diameter_mm: f64) -> bool {
        let (min, max) = self.diameter_range();
        diameter_mm >= min && diameter_mm <= max
    }

    /// 직경에 대한 누설 유량(kg/h)을 구한다. 범위 밖은 경계 구간의 기울기로 외삽한다.
    pub fn estimate_flow(&self, diameter_mm: f64) -> Result<f64, InputError> {
        self.estimate_flow_with(diameter_mm, BoundaryPolicy::Extrapolate)
    }

    /// 경계 처리 방식을 지정해 누설 유량(kg/h)을 구한다.
    ///
    /// 외삽 결과는 극단적인 입력에서 음수가 될 수 있으며 오류로 취급하지 않는다.
    pub fn estimate_flow_with(
        &self,
        diameter_mm: f64,
        policy: BoundaryPolicy,
    ) -> Result<f64, InputError> {
        if !diameter_mm.is_finite() {
            return Err(InputError::NotFinite("diameter_mm"));
        }
        if diameter_mm <= 0.0 {
            return Err(InputError::NonPositiveDiameter(diameter_mm));
        }
        if !self.covers(diameter_mm) {
            let (min, max) = self.diameter_range();
            warn!(
                diameter_mm,
                min_diameter_mm = min,
                max_diameter_mm = max,
                ?policy,
                "직경이 유량표 범위를 벗어났습니다"
            );
        }
        Ok(self.interpolate(diameter_mm, policy))
    }

    fn interpolate(&self, x: f64, policy: BoundaryPolicy) -> f64 {
        let rows = &self.rows;
        let n = rows.len();
        let idx = rows.partition_point(|r| r.diameter_mm < x);
        if idx < n && rows[idx].diameter_mm == x {
            return rows[idx].mass_flow_kg_h;
        }
        if policy == BoundaryPolicy::Clamp {
            if idx == 0 {
                return rows[0].mass_flow_kg_h;
            }
            if idx == n {
                return rows[n - 1].mass_flow_kg_h;
            }
        }
        // 범위 밖이면 양 끝 구간을 그대로 사용
        let hi = idx.clamp(1, n - 1);
        let (a, b) = (rows[hi - 1], rows[hi]);
        let slope = (b.mass_flow_kg_h - a.mass_flow_kg_h) / (b.diameter_mm - a.diameter_mm);
        a.mass_flow_kg_h + slope * (x - a.diameter_mm)
    }
}

/// 자유 함수 형태의 유량 추정. `FlowTable::estimate_flow`와 같다.
pub fn estimate_flow(table: &FlowTable, diameter_mm: f64) -> Result<f64, InputError> {
    table.estimate_flow(diameter_mm)
}

fn build(mut rows: Vec<(usize, FlowTableRow)>) -> Result<FlowTable, ConfigError> {
    for (line, row) in &rows {
        if !row.diameter_mm.is_finite() || row.diameter_mm <= 0.0 {
            return Err(ConfigError::InvalidRow {
                line: *line,
                reason: "직경은 0보다 큰 유한한 값이어야 합니다",
            });
        }
        if !row.mass_flow_kg_h.is_finite() || row.mass_flow_kg_h < 0.0 {
            return Err(ConfigError::InvalidRow {
                line: *line,
                reason: "유량은 0 이상의 유한한 값이어야 합니다",
            });
        }
    }
    if rows.len() < 2 {
        return Err(ConfigError::TooFewRows(rows.len()));
    }
    rows.sort_by(|a, b| a.1.diameter_mm.total_cmp(&b.1.diameter_mm));
    if let Some(w) = rows
        .windows(2)
        .find(|w| w[0].1.diameter_mm == w[1].1.diameter_mm)
    {
        return Err(ConfigError::DuplicateDiameter(w[0].1.diameter_mm));
    }
    Ok(FlowTable {
        rows: rows.into_iter().map(|(_, r)| r).collect(),
    })
}

fn unquote(cell: &str) -> &str {
    cell.trim().trim_matches('"').trim()
}

fn parse_cell(
    cells: &[&str],
    idx: usize,
    line: usize,
    column: &'static str,
    delimiter: char,
) -> Result<f64, ConfigError> {
    let raw = cells.get(idx).map(|c| unquote(c)).unwrap_or_default();
    let normalized = if delimiter == ';' {
        raw.replace(',', ".")
    } else {
        raw.to_string()
    };
    normalized
        .parse::<f64>()
        .map_err(|_| ConfigError::NonNumeric {
            line,
            column,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_with_spanish_column_names_is_sorted() {
        let src = "diametro_mm,kg_h\n20,20\n10,5\n15,11\n";
        let table = FlowTable::from_csv_str(src).unwrap();
        let diameters: Vec<f64> = table.rows().iter().map(|r| r.diameter_mm).collect();
        assert_eq!(diameters, vec![10.0, 15.0, 20.0]);
    }

    #[test]
    fn csv_semicolon_with_decimal_comma() {
        let src = "# 7 barg\n\"Diametro_mm\";\"kg_h\"\n1,5;2,25\n3;9\n";
        let table = FlowTable::from_csv_str(src).unwrap();
        assert_eq!(table.rows()[0].diameter_mm, 1.5);
        assert_eq!(table.rows()[0].mass_flow_kg_h, 2.25);
    }

    #[test]
    fn csv_extra_columns_are_ignored() {
        let src = "note,diameter_mm,mass_flow_kg_h\na,1,2\nb,2,8\n";
        let table = FlowTable::from_csv_str(src).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].mass_flow_kg_h, 8.0);
    }

    #[test]
    fn csv_missing_flow_column() {
        let err = FlowTable::from_csv_str("diametro_mm,caudal\n1,2\n2,3\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingColumn("kg_h")));
    }

    #[test]
    fn csv_non_numeric_reports_line() {
        let err = FlowTable::from_csv_str("diametro_mm,kg_h\n1,2\n2,abc\n").unwrap_err();
        match err {
            ConfigError::NonNumeric { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "kg_h");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn single_row_is_rejected() {
        let err = FlowTable::from_csv_str("diametro_mm,kg_h\n1,2\n").unwrap_err();
        assert!(matches!(err, ConfigError::TooFewRows(1)));
    }

    #[test]
    fn duplicate_diameter_is_rejected() {
        let err = FlowTable::from_csv_str("diametro_mm,kg_h\n1,2\n1,3\n").unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateDiameter(d) if d == 1.0));
    }

    #[test]
    fn negative_flow_row_is_rejected() {
        let err = FlowTable::from_rows(vec![
            FlowTableRow {
                diameter_mm: 1.0,
                mass_flow_kg_h: -1.0,
            },
            FlowTableRow {
                diameter_mm: 2.0,
                mass_flow_kg_h: 1.0,
            },
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRow { line: 1, .. }));
    }

    #[test]
    fn toml_rows_accept_aliases() {
        let src = r#"
            [[rows]]
            diametro_mm = 10.0
            kg_h = 5.0

            [[rows]]
            diameter_mm = 20.0
            mass_flow_kg_h = 20.0
        "#;
        let table = FlowTable::from_toml_str(src).unwrap();
        assert_eq!(table.diameter_range(), (10.0, 20.0));
    }

    #[test]
    fn clamp_policy_holds_boundary_values() {
        let table = FlowTable::from_csv_str("diametro_mm,kg_h\n10,5\n20,20\n").unwrap();
        assert_eq!(table.estimate_flow_with(2.0, BoundaryPolicy::Clamp).unwrap(), 5.0);
        assert_eq!(table.estimate_flow_with(50.0, BoundaryPolicy::Clamp).unwrap(), 20.0);
    }

    #[test]
    fn non_positive_diameter_is_invalid_input() {
        let table = FlowTable::from_csv_str("diametro_mm,kg_h\n10,5\n20,20\n").unwrap();
        assert_eq!(
            table.estimate_flow(0.0),
            Err(InputError::NonPositiveDiameter(0.0))
        );
        assert_eq!(
            table.estimate_flow(f64::NAN),
            Err(InputError::NotFinite("diameter_mm"))
        );
    }
}
