use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;
use tracing::debug;

use crate::leak::{BoundaryPolicy, DurationUnit};

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const APP_TITLE: &str = "general.app_title";
    pub const APP_SUBTITLE: &str = "general.app_subtitle";
    pub const APP_FOOTER: &str = "general.app_footer";

    pub const MENU_METHOD: &str = "menu.method";
    pub const MENU_DIAMETER: &str = "menu.diameter";
    pub const MENU_KNOWN_FLOW: &str = "menu.known_flow";
    pub const MENU_EXIT: &str = "menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const PROMPT_DIAMETER: &str = "prompt.diameter";
    pub const PROMPT_FLOW: &str = "prompt.flow";
    pub const PROMPT_DURATION: &str = "prompt.duration";
    pub const PROMPT_DURATION_UNIT: &str = "prompt.duration_unit";

    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";
    pub const ERROR_INVALID_SELECTION: &str = "error.invalid_selection";
    pub const ERROR_INPUT_REJECTED: &str = "error.input_rejected";

    pub const UNIT_MINUTES: &str = "unit.minutes";
    pub const UNIT_HOURS: &str = "unit.hours";
    pub const UNIT_DAYS: &str = "unit.days";
    pub const UNIT_MONTHS: &str = "unit.months";

    pub const INPUTS_HEADING: &str = "inputs.heading";
    pub const INPUTS_TABLE: &str = "inputs.table";
    pub const INPUTS_LOAD_TABLE: &str = "inputs.load_table";
    pub const INPUTS_CALCULATE: &str = "inputs.calculate";
    pub const RESULT_HINT: &str = "result.hint";

    pub const RESULT_HEADING: &str = "result.heading";
    pub const RESULT_MASS_FLOW: &str = "result.mass_flow";
    pub const RESULT_DURATION_HOURS: &str = "result.duration_hours";
    pub const RESULT_TOTAL_MASS: &str = "result.total_mass";
    pub const RESULT_ENERGY: &str = "result.energy";
    pub const RESULT_COST: &str = "result.cost";
    pub const RESULT_TPE_HEADING: &str = "result.tpe_heading";
    pub const RESULT_TPE_DAY: &str = "result.tpe_day";
    pub const RESULT_TPE_MONTH: &str = "result.tpe_month";
    pub const RESULT_TPE_YEAR: &str = "result.tpe_year";
    pub const RESULT_OUTSIDE_TABLE: &str = "result.outside_table";
    pub const RESULT_OUTSIDE_TABLE_CLAMPED: &str = "result.outside_table_clamped";

    /// 표 범위 밖 직경에 대해 경계 처리 방식에 맞는 안내 문구 키.
    pub fn outside_table(policy: super::BoundaryPolicy) -> &'static str {
        match policy {
            super::BoundaryPolicy::Extrapolate => RESULT_OUTSIDE_TABLE,
            super::BoundaryPolicy::Clamp => RESULT_OUTSIDE_TABLE_CLAMPED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
    Es,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else if c.starts_with("es") {
            Language::Es
        } else {
            Language::Ko
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en/es)에 따라 번역기를 생성한다. 알 수 없는 코드는 ko로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 번역을 가져온다. 언어팩 → 내장 문자열 → 한국어 순으로 찾는다.
    pub fn t<'a>(&'a self, key: &str) -> &'a str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v;
        }
        let builtin = match self.lang {
            Language::En => en(key),
            Language::Es => es(key),
            Language::Ko => None,
        };
        builtin.unwrap_or_else(|| ko(key))
    }

    /// 기간 단위의 표시 이름.
    pub fn duration_unit(&self, unit: DurationUnit) -> &str {
        self.t(match unit {
            DurationUnit::Minutes => keys::UNIT_MINUTES,
            DurationUnit::Hours => keys::UNIT_HOURS,
            DurationUnit::Days => keys::UNIT_DAYS,
            DurationUnit::Months => keys::UNIT_MONTHS,
        })
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "es".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        other if other.starts_with("es") => Some("es".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_lang) {
        return Some(lang);
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_lang(v.split(['.', '_']).next().unwrap_or_default()))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 중첩 테이블.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{}.toml", Language::from_code(lang).as_code()));
    let content = fs::read_to_string(&path).ok()?;
    let map = parse_toml_to_map(&content)?;
    debug!(path = %path.display(), entries = map.len(), "언어팩 로드");
    Some(map)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let mut out = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.clone());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    walk("", &value, &mut out);
    Some(out)
}

fn ko(key: &str) -> &'static str {
    match key {
        keys::ERROR_PREFIX => "오류",
        keys::APP_EXIT => "프로그램을 종료합니다.",
        keys::APP_TITLE => "증기 누설 에너지 영향",
        keys::APP_SUBTITLE => "에너지 환산 및 TPE 영향",
        keys::APP_FOOTER => "증기 누설 에너지 손실 평가 도구",
        keys::MENU_METHOD => "계산 방법",
        keys::MENU_DIAMETER => "1) 오리피스 직경",
        keys::MENU_KNOWN_FLOW => "2) 알려진 증기량 (kg/h)",
        keys::MENU_EXIT => "0) 종료",
        keys::PROMPT_MENU_SELECT => "선택: ",
        keys::PROMPT_DIAMETER => "직경 [mm]: ",
        keys::PROMPT_FLOW => "손실 증기량 [kg/h]: ",
        keys::PROMPT_DURATION => "기간: ",
        keys::PROMPT_DURATION_UNIT => "단위 (1=분 2=시간 3=일 4=개월): ",
        keys::ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        keys::ERROR_INVALID_SELECTION => "잘못된 입력입니다. 다시 선택하세요.",
        keys::ERROR_INPUT_REJECTED => "입력값을 계산에 사용할 수 없습니다",
        keys::UNIT_MINUTES => "분",
        keys::UNIT_HOURS => "시간",
        keys::UNIT_DAYS => "일",
        keys::UNIT_MONTHS => "개월",
        keys::INPUTS_HEADING => "입력 데이터",
        keys::INPUTS_TABLE => "유량표",
        keys::INPUTS_LOAD_TABLE => "유량표 열기…",
        keys::INPUTS_CALCULATE => "⚡ 영향 계산",
        keys::RESULT_HINT => "데이터를 입력하고 [영향 계산]을 누르세요",
        keys::RESULT_HEADING => "결과",
        keys::RESULT_MASS_FLOW => "누설 유량 (kg/h)",
        keys::RESULT_DURATION_HOURS => "기간 (h)",
        keys::RESULT_TOTAL_MASS => "손실 증기 (kg)",
        keys::RESULT_ENERGY => "손실 에너지 (MJ)",
        keys::RESULT_COST => "예상 비용",
        keys::RESULT_TPE_HEADING => "TPE 영향",
        keys::RESULT_TPE_DAY => "일 (MJ/hL)",
        keys::RESULT_TPE_MONTH => "월 (MJ/hL)",
        keys::RESULT_TPE_YEAR => "연 (MJ/hL)",
        keys::RESULT_OUTSIDE_TABLE => "직경이 유량표 범위를 벗어나 외삽값을 사용했습니다.",
        keys::RESULT_OUTSIDE_TABLE_CLAMPED => "직경이 유량표 범위를 벗어나 경계값을 사용했습니다.",
        _ => "???",
    }
}

fn en(key: &str) -> Option<&'static str> {
    let s = match key {
        keys::ERROR_PREFIX => "Error",
        keys::APP_EXIT => "Exiting.",
        keys::APP_TITLE => "Energy Impact of Steam Leaks",
        keys::APP_SUBTITLE => "Energy conversion and TPE impact",
        keys::APP_FOOTER => "Steam leak energy loss assessment tool",
        keys::MENU_METHOD => "Calculation method",
        keys::MENU_DIAMETER => "1) Orifice diameter",
        keys::MENU_KNOWN_FLOW => "2) Known steam flow (kg/h)",
        keys::MENU_EXIT => "0) Exit",
        keys::PROMPT_MENU_SELECT => "Select: ",
        keys::PROMPT_DIAMETER => "Diameter [mm]: ",
        keys::PROMPT_FLOW => "Steam lost [kg/h]: ",
        keys::PROMPT_DURATION => "Duration: ",
        keys::PROMPT_DURATION_UNIT => "Unit (1=minutes 2=hours 3=days 4=months): ",
        keys::ERROR_INVALID_NUMBER => "Please enter a number.",
        keys::ERROR_INVALID_SELECTION => "Invalid selection. Try again.",
        keys::ERROR_INPUT_REJECTED => "Input cannot be used for the calculation",
        keys::UNIT_MINUTES => "Minutes",
        keys::UNIT_HOURS => "Hours",
        keys::UNIT_DAYS => "Days",
        keys::UNIT_MONTHS => "Months",
        keys::INPUTS_HEADING => "Input data",
        keys::INPUTS_TABLE => "Flow table",
        keys::INPUTS_LOAD_TABLE => "Open flow table…",
        keys::INPUTS_CALCULATE => "⚡ Calculate impact",
        keys::RESULT_HINT => "Enter the data and press Calculate impact",
        keys::RESULT_HEADING => "Results",
        keys::RESULT_MASS_FLOW => "Leak flow (kg/h)",
        keys::RESULT_DURATION_HOURS => "Duration (h)",
        keys::RESULT_TOTAL_MASS => "Steam lost (kg)",
        keys::RESULT_ENERGY => "Energy lost (MJ)",
        keys::RESULT_COST => "Estimated cost",
        keys::RESULT_TPE_HEADING => "TPE impact",
        keys::RESULT_TPE_DAY => "Day (MJ/hL)",
        keys::RESULT_TPE_MONTH => "Month (MJ/hL)",
        keys::RESULT_TPE_YEAR => "Year (MJ/hL)",
        keys::RESULT_OUTSIDE_TABLE => "Diameter is outside the flow table; value was extrapolated.",
        keys::RESULT_OUTSIDE_TABLE_CLAMPED => "Diameter is outside the flow table; the nearest table value was used.",
        _ => return None,
    };
    Some(s)
}

fn es(key: &str) -> Option<&'static str> {
    let s = match key {
        keys::ERROR_PREFIX => "Error",
        keys::APP_EXIT => "Saliendo.",
        keys::APP_TITLE => "Impacto Energético por Fugas de Vapor",
        keys::APP_SUBTITLE => "Conversión a energía y afectación del TPE",
        keys::APP_FOOTER => "Herramienta para evaluación de pérdidas energéticas",
        keys::MENU_METHOD => "Método de cálculo",
        keys::MENU_DIAMETER => "1) Diámetro de orificio",
        keys::MENU_KNOWN_FLOW => "2) Vapor conocido (kg/h)",
        keys::MENU_EXIT => "0) Salir",
        keys::PROMPT_MENU_SELECT => "Seleccione: ",
        keys::PROMPT_DIAMETER => "Diámetro [mm]: ",
        keys::PROMPT_FLOW => "Vapor perdido [kg/h]: ",
        keys::PROMPT_DURATION => "Tiempo: ",
        keys::PROMPT_DURATION_UNIT => "Unidad (1=Minutos 2=Horas 3=Días 4=Meses): ",
        keys::ERROR_INVALID_NUMBER => "Ingrese un número.",
        keys::ERROR_INVALID_SELECTION => "Selección no válida. Intente de nuevo.",
        keys::ERROR_INPUT_REJECTED => "El dato no puede usarse en el cálculo",
        keys::UNIT_MINUTES => "Minutos",
        keys::UNIT_HOURS => "Horas",
        keys::UNIT_DAYS => "Días",
        keys::UNIT_MONTHS => "Meses",
        keys::INPUTS_HEADING => "Datos de entrada",
        keys::INPUTS_TABLE => "Tabla de fugas",
        keys::INPUTS_LOAD_TABLE => "Abrir tabla…",
        keys::INPUTS_CALCULATE => "⚡ Calcular impacto",
        keys::RESULT_HINT => "Ingrese los datos y presione Calcular impacto",
        keys::RESULT_HEADING => "Resultados",
        keys::RESULT_MASS_FLOW => "Flujo de fuga (kg/h)",
        keys::RESULT_DURATION_HOURS => "Tiempo (h)",
        keys::RESULT_TOTAL_MASS => "Vapor perdido (kg)",
        keys::RESULT_ENERGY => "Energía perdida (MJ)",
        keys::RESULT_COST => "Costo estimado",
        keys::RESULT_TPE_HEADING => "Impacto en TPE",
        keys::RESULT_TPE_DAY => "Día (MJ/hL)",
        keys::RESULT_TPE_MONTH => "Mes (MJ/hL)",
        keys::RESULT_TPE_YEAR => "Año (MJ/hL)",
        keys::RESULT_OUTSIDE_TABLE => "El diámetro está fuera de la tabla; se extrapoló el valor.",
        keys::RESULT_OUTSIDE_TABLE_CLAMPED => "El diámetro está fuera de la tabla; se usó el valor del extremo.",
        _ => return None,
    };
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_korean() {
        let tr = Translator::new("fr");
        assert_eq!(tr.language(), Language::Ko);
        assert_eq!(tr.t(keys::RESULT_COST), "예상 비용");
    }

    #[test]
    fn spanish_strings_are_builtin() {
        let tr = Translator::new("es-MX");
        assert_eq!(tr.t(keys::RESULT_TPE_HEADING), "Impacto en TPE");
        assert_eq!(tr.duration_unit(DurationUnit::Days), "Días");
    }

    #[test]
    fn outside_table_notice_follows_boundary_policy() {
        let tr = Translator::new("en");
        assert!(tr
            .t(keys::outside_table(BoundaryPolicy::Extrapolate))
            .contains("extrapolated"));
        let clamped = tr.t(keys::outside_table(BoundaryPolicy::Clamp));
        assert!(clamped.contains("nearest table value"));
        assert!(!clamped.contains("extrapolat"));
    }

    #[test]
    fn explicit_flag_wins_over_config() {
        assert_eq!(resolve_language("en-US", Some("es")), "en");
        assert_eq!(resolve_language("auto", Some("ko-KR")), "ko");
    }

    #[test]
    fn nested_pack_keys_are_flattened() {
        let map = parse_toml_to_map("[result]\ncost = \"Coste\"\n").unwrap();
        assert_eq!(map.get("result.cost").map(String::as_str), Some("Coste"));
    }
}
