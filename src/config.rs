use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::leak::{BoundaryPolicy, FlowTable, LeakCalculator, LeakConstants};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// 기본 유량표 경로. 상대 경로는 설정 파일이 있는 디렉터리 기준이다.
pub const DEFAULT_TABLE_PATH: &str = "data/fugas_vapor.csv";

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// UI 언어 코드(auto/ko/en/es)
    pub language: String,
    /// 외부 언어팩 디렉터리
    pub language_pack_dir: Option<String>,
    pub table_path: PathBuf,
    pub boundary: BoundaryPolicy,
    /// 비용 표시용 통화 기호
    pub currency_symbol: String,
    pub constants: LeakConstants,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            language_pack_dir: None,
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
            boundary: BoundaryPolicy::default(),
            currency_symbol: "$".to_string(),
            constants: LeakConstants::default(),
        }
    }
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Config::from_toml_str(&content)?;
        info!(path = %path.display(), "설정 로드 완료");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        warn!(path = %path.display(), "설정 파일이 없어 기본값으로 생성했습니다");
        Ok(cfg)
    }
}

impl Config {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 검증을 통과한 상수.
    pub fn effective_constants(&self) -> Result<LeakConstants, ConfigError> {
        self.constants.validate()?;
        Ok(self.constants)
    }

    /// 상대 경로인 유량표 경로를 `base_dir` 기준으로 해석한다.
    pub fn resolve_table_path(&self, base_dir: &Path) -> PathBuf {
        if self.table_path.is_absolute() {
            self.table_path.clone()
        } else {
            base_dir.join(&self.table_path)
        }
    }

    /// 유량표를 읽고 상수를 검증해 계산기를 만든다.
    /// `table_override`가 있으면 설정의 `table_path` 대신 그 파일을 읽는다.
    pub fn build_calculator(
        &self,
        base_dir: &Path,
        table_override: Option<&Path>,
    ) -> Result<LeakCalculator, ConfigError> {
        let table_path = match table_override {
            Some(p) => p.to_path_buf(),
            None => self.resolve_table_path(base_dir),
        };
        let table = FlowTable::load(&table_path)?;
        LeakCalculator::new(table, self.effective_constants()?, self.boundary)
    }
}

/// 설정 파일 경로의 상위 디렉터리. 파일명만 주어지면 현재 디렉터리.
pub fn config_base_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
