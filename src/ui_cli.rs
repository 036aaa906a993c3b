use std::io::{self, Write};

use crate::format::DisplayedImpact;
use crate::i18n::{keys, Translator};
use crate::leak::{BoundaryPolicy, DurationUnit, LeakAssessment, LeakQuery};

/// 계산 방법 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Diameter,
    KnownFlow,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> io::Result<MenuChoice> {
    println!("\n=== {} ===", tr.t(keys::APP_TITLE));
    println!("{}", tr.t(keys::MENU_METHOD));
    println!("{}", tr.t(keys::MENU_DIAMETER));
    println!("{}", tr.t(keys::MENU_KNOWN_FLOW));
    println!("{}", tr.t(keys::MENU_EXIT));
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match parse_menu(&sel) {
            Some(choice) => return Ok(choice),
            None => println!("{}", tr.t(keys::ERROR_INVALID_SELECTION)),
        }
    }
}

fn parse_menu(sel: &str) -> Option<MenuChoice> {
    match sel.trim() {
        "1" => Some(MenuChoice::Diameter),
        "2" => Some(MenuChoice::KnownFlow),
        "0" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// 선택한 방법에 맞게 직경 또는 유량, 기간을 입력받는다.
pub fn read_query(tr: &Translator, choice: MenuChoice) -> io::Result<LeakQuery> {
    let first = match choice {
        MenuChoice::Diameter => read_f64(tr, tr.t(keys::PROMPT_DIAMETER))?,
        _ => read_f64(tr, tr.t(keys::PROMPT_FLOW))?,
    };
    let duration = read_f64(tr, tr.t(keys::PROMPT_DURATION))?;
    let unit = read_duration_unit(tr)?;
    let query = match choice {
        MenuChoice::Diameter => LeakQuery::by_diameter(first, duration, unit),
        _ => LeakQuery::by_known_flow(first, duration, unit),
    };
    Ok(query)
}

fn read_duration_unit(tr: &Translator) -> io::Result<DurationUnit> {
    loop {
        let sel = read_line(tr.t(keys::PROMPT_DURATION_UNIT))?;
        let unit = match sel.trim() {
            "1" => Some(DurationUnit::Minutes),
            "2" => Some(DurationUnit::Hours),
            "3" => Some(DurationUnit::Days),
            "4" => Some(DurationUnit::Months),
            // 번호 대신 단위 이름을 입력해도 된다
            other => other.parse().ok(),
        };
        match unit {
            Some(u) => return Ok(u),
            None => println!("{}", tr.t(keys::ERROR_INVALID_SELECTION)),
        }
    }
}

/// 계산 결과를 표시 규칙(2자리/4자리 반올림)에 맞춰 출력한다.
pub fn print_assessment(
    tr: &Translator,
    assessment: &LeakAssessment,
    boundary: BoundaryPolicy,
    currency_symbol: &str,
) {
    let shown = DisplayedImpact::new(&assessment.impact, currency_symbol);
    println!("\n-- {} --", tr.t(keys::RESULT_HEADING));
    if assessment.outside_table {
        println!("! {}", tr.t(keys::outside_table(boundary)));
    }
    println!(
        "{}: {:.2}",
        tr.t(keys::RESULT_MASS_FLOW),
        assessment.mass_flow_kg_h
    );
    println!(
        "{}: {:.2}",
        tr.t(keys::RESULT_DURATION_HOURS),
        assessment.duration_hours
    );
    println!("{}: {}", tr.t(keys::RESULT_TOTAL_MASS), shown.total_mass_kg);
    println!("{}: {}", tr.t(keys::RESULT_ENERGY), shown.energy_mj);
    println!("{}: {}", tr.t(keys::RESULT_COST), shown.cost);
    println!("\n-- {} --", tr.t(keys::RESULT_TPE_HEADING));
    println!("{}: {}", tr.t(keys::RESULT_TPE_DAY), shown.intensity_day);
    println!("{}: {}", tr.t(keys::RESULT_TPE_MONTH), shown.intensity_month);
    println!("{}: {}", tr.t(keys::RESULT_TPE_YEAR), shown.intensity_year);
}

fn read_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(buf)
}

/// 숫자 입력을 해석한다. 쉼표는 소수점 하나로만 허용한다.
/// `1,500`처럼 천 단위 구분으로 읽힐 수 있는 입력과 `.`/`,` 혼용은 거절한다.
fn parse_number(input: &str) -> Option<f64> {
    let s = input.trim();
    let normalized = match s.matches(',').count() {
        0 => s.to_string(),
        1 if !s.contains('.') => {
            let (int_part, frac) = s.split_once(',')?;
            let digits = int_part.trim_start_matches(['-', '+']);
            if frac.len() == 3 && !digits.trim_start_matches('0').is_empty() {
                return None;
            }
            format!("{int_part}.{frac}")
        }
        _ => return None,
    };
    normalized.parse::<f64>().ok()
}

fn read_f64(tr: &Translator, prompt: &str) -> io::Result<f64> {
    loop {
        let s = read_line(prompt)?;
        match parse_number(&s) {
            Some(v) => return Ok(v),
            None => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_accepts_padded_numbers() {
        assert_eq!(parse_menu(" 1\n"), Some(MenuChoice::Diameter));
        assert_eq!(parse_menu("2"), Some(MenuChoice::KnownFlow));
        assert_eq!(parse_menu("0"), Some(MenuChoice::Exit));
        assert_eq!(parse_menu("9"), None);
    }

    #[test]
    fn decimal_comma_is_accepted() {
        assert_eq!(parse_number("1,5"), Some(1.5));
        assert_eq!(parse_number(" 12,25\n"), Some(12.25));
        assert_eq!(parse_number("0,125"), Some(0.125));
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number("1500"), Some(1500.0));
    }

    #[test]
    fn grouped_or_mixed_separators_are_rejected() {
        assert_eq!(parse_number("1,500"), None);
        assert_eq!(parse_number("1,500.0"), None);
        assert_eq!(parse_number("1.500,0"), None);
        assert_eq!(parse_number("1,2,3"), None);
        assert_eq!(parse_number("abc"), None);
    }
}
