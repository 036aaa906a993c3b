use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tracing::info;

use crate::config::{self, Config, DEFAULT_CONFIG_PATH};
use crate::error::{ConfigError, LeakError};
use crate::i18n::{self, Translator};
use crate::leak::{DurationUnit, LeakCalculator, LeakQuery};
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 콘솔 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정/유량표 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 계산 오류
    #[error("{0}")]
    Leak(#[from] LeakError),
}

/// 명령행 인자. 유량 입력(--diameter / --flow)이 없으면 대화형 모드로 실행한다.
#[derive(Debug, Parser)]
#[command(name = "steam_leak_impact_cli", version, about = "증기 누설 에너지/비용/TPE 영향 계산기")]
pub struct CliArgs {
    /// 설정 파일 경로
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// 유량표 경로 (설정의 table_path 대신 사용)
    #[arg(long)]
    pub table: Option<PathBuf>,
    /// 언어 (auto/ko/en/es)
    #[arg(long, short = 'L', default_value = "auto")]
    pub lang: String,
    /// 오리피스 직경 [mm]
    #[arg(long, conflicts_with = "flow", allow_negative_numbers = true)]
    pub diameter: Option<f64>,
    /// 알려진 누설 유량 [kg/h]
    #[arg(long, allow_negative_numbers = true)]
    pub flow: Option<f64>,
    /// 누설 기간 값
    #[arg(long, default_value_t = 1.0)]
    pub duration: f64,
    /// 기간 단위 (minutes/hours/days/months, minutos/horas/días/meses)
    #[arg(long, default_value = "hours")]
    pub unit: String,
}

impl CliArgs {
    /// 명령행에서 지정한 질의. 유량 입력이 없으면 None.
    pub fn query(&self) -> Result<Option<LeakQuery>, ConfigError> {
        let unit: DurationUnit = self.unit.parse()?;
        let query = match (self.diameter, self.flow) {
            (Some(d), _) => Some(LeakQuery::by_diameter(d, self.duration, unit)),
            (None, Some(f)) => Some(LeakQuery::by_known_flow(f, self.duration, unit)),
            (None, None) => None,
        };
        Ok(query)
    }
}

/// 설정과 유량표를 읽어 계산기를 만든다. 실패하면 계산 없이 종료해야 한다.
pub fn init(args: &CliArgs) -> Result<(Config, LeakCalculator), ConfigError> {
    let cfg = config::load_or_default(&args.config)?;
    let calculator =
        cfg.build_calculator(&config::config_base_dir(&args.config), args.table.as_deref())?;
    Ok((cfg, calculator))
}

/// CLI 애플리케이션을 실행한다.
pub fn run(args: CliArgs) -> Result<(), AppError> {
    // 단위 태그 오류는 설정 로드 전에 거절한다
    let one_shot = args.query()?;
    let (cfg, calculator) = init(&args)?;
    let lang = i18n::resolve_language(&args.lang, Some(cfg.language.as_str()));
    let tr = Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());
    info!(language = %lang, rows = calculator.table().len(), "계산기 준비 완료");
    let boundary = calculator.boundary();

    if let Some(query) = one_shot {
        let assessment = calculator.assess(&query)?;
        ui_cli::print_assessment(&tr, &assessment, boundary, &cfg.currency_symbol);
        return Ok(());
    }

    loop {
        let choice = ui_cli::main_menu(&tr)?;
        if choice == MenuChoice::Exit {
            println!("{}", tr.t(i18n::keys::APP_EXIT));
            break;
        }
        let query = ui_cli::read_query(&tr, choice)?;
        match calculator.assess(&query) {
            Ok(assessment) => {
                ui_cli::print_assessment(&tr, &assessment, boundary, &cfg.currency_symbol)
            }
            // 입력 오류는 거절 후 다시 묻는다
            Err(LeakError::InvalidInput(e)) => {
                println!("{}: {e}", tr.t(i18n::keys::ERROR_INPUT_REJECTED))
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
