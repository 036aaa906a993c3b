#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use steam_leak_impact::{
    config,
    format::{with_thousands, DisplayedImpact},
    i18n::{self, keys},
    leak::{DurationUnit, LeakAssessment, LeakCalculator, LeakQuery},
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const GOLD: egui::Color32 = egui::Color32::from_rgb(0xC8, 0xA9, 0x51);
const NAVY: egui::Color32 = egui::Color32::from_rgb(0x0B, 0x1F, 0x3B);

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steam_leak_impact=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // CLI 옵션 처리: --lang xx / --lang=xx, --config path / --config=path
    let mut cli_lang = "auto".to_string();
    let mut config_path = PathBuf::from(config::DEFAULT_CONFIG_PATH);
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = val.to_string();
        } else if let Some(val) = a.strip_prefix("--config=") {
            config_path = PathBuf::from(val);
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = args[i + 1].clone();
            i += 1;
        } else if a == "--config" && i + 1 < args.len() {
            config_path = PathBuf::from(&args[i + 1]);
            i += 1;
        }
        i += 1;
    }

    let (app_cfg, calculator) = startup(&config_path);
    let lang = i18n::resolve_language(&cli_lang, Some(app_cfg.language.as_str()));

    let mut viewport = egui::ViewportBuilder::default().with_inner_size([960.0, 640.0]);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "Steam Leak Impact",
        options,
        Box::new(move |cc| {
            if lang == "ko" {
                if let Err(e) = setup_korean_font(&cc.egui_ctx) {
                    error!("Font error: {e}");
                }
            }
            Box::new(GuiApp::new(app_cfg, config_path, calculator, &lang))
        }),
    )
}

/// 설정과 계산기를 준비한다.
/// 설정 오류는 계산기 오류로 넘겨 계산을 막는다. 반환된 설정은 화면 상태에만 쓴다.
fn startup(config_path: &Path) -> (config::Config, Result<LeakCalculator, StartupError>) {
    match config::load_or_default(config_path) {
        Ok(cfg) => {
            let calculator = cfg
                .build_calculator(&config::config_base_dir(config_path), None)
                .map_err(|e| StartupError::Table(e.to_string()));
            (cfg, calculator)
        }
        Err(e) => {
            error!(path = %config_path.display(), "설정 로드 실패: {e}");
            (config::Config::default(), Err(StartupError::Config(e.to_string())))
        }
    }
}

/// 시작 시 계산기를 만들지 못한 이유.
#[derive(Debug, Clone, PartialEq)]
enum StartupError {
    /// 설정 파일 오류. 고칠 때까지 계산과 유량표 교체를 막는다.
    Config(String),
    /// 유량표 오류. 다른 유량표를 고르면 풀린다.
    Table(String),
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["logo3.png", "icon.png", "assets/icon.png", "../logo3.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

/// 바이너리 폰트 바이트를 egui에 등록.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(name.to_string(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .insert(0, name.to_string());
    }
    ctx.set_fonts(fonts);
}

/// 한글 표시용 폰트를 찾는다. assets/fonts → Windows 시스템 폰트 → Linux Noto CJK 순.
fn setup_korean_font(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates = vec![PathBuf::from("assets/fonts/malgun.ttf")];
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        candidates.extend(["malgun.ttf", "gulim.ttc"].iter().map(|f| fonts.join(f)));
    }
    candidates.push(PathBuf::from(
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ));
    for p in candidates {
        if p.exists() {
            let bytes = fs::read(&p)
                .map_err(|e| format!("Failed to read font file ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "korean_font");
            return Ok(());
        }
    }
    Err("Korean font not found; falling back to default font.".into())
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Method {
    Diameter,
    KnownFlow,
}

struct GuiApp {
    config: config::Config,
    config_path: PathBuf,
    tr: i18n::Translator,
    calculator: Option<LeakCalculator>,
    status: Option<String>,
    /// 설정 파일을 읽지 못했으면 true
    config_broken: bool,
    method: Method,
    diameter_mm: f64,
    known_flow_kg_h: f64,
    duration_value: f64,
    duration_unit: DurationUnit,
    /// 계산 버튼을 누르기 전에는 None
    last: Option<Result<LeakAssessment, String>>,
}

impl GuiApp {
    fn new(
        config: config::Config,
        config_path: PathBuf,
        calculator: Result<LeakCalculator, StartupError>,
        lang: &str,
    ) -> Self {
        let tr = i18n::Translator::new_with_pack(lang, config.language_pack_dir.as_deref());
        let (calculator, status, config_broken) = match calculator {
            Ok(c) => (Some(c), None, false),
            Err(StartupError::Table(e)) => (None, Some(e), false),
            Err(StartupError::Config(e)) => (None, Some(e), true),
        };
        Self {
            config,
            config_path,
            tr,
            calculator,
            status,
            config_broken,
            method: Method::Diameter,
            diameter_mm: 1.0,
            known_flow_kg_h: 0.0,
            duration_value: 1.0,
            duration_unit: DurationUnit::Hours,
            last: None,
        }
    }

    fn query(&self) -> LeakQuery {
        match self.method {
            Method::Diameter => {
                LeakQuery::by_diameter(self.diameter_mm, self.duration_value, self.duration_unit)
            }
            Method::KnownFlow => LeakQuery::by_known_flow(
                self.known_flow_kg_h,
                self.duration_value,
                self.duration_unit,
            ),
        }
    }

    fn calculate(&mut self) {
        let Some(calc) = &self.calculator else {
            return;
        };
        self.last = Some(calc.assess(&self.query()).map_err(|e| e.to_string()));
    }

    /// 새 유량표를 읽어 계산기를 교체하고 설정에 경로를 저장한다.
    /// 설정 파일이 깨진 상태에서는 기본값으로 덮어쓰지 않도록 아무것도 하지 않는다.
    fn load_table(&mut self, path: PathBuf) {
        if self.config_broken {
            return;
        }
        match self.config.build_calculator(Path::new("."), Some(&path)) {
            Ok(calc) => {
                info!(path = %path.display(), "유량표 교체");
                self.calculator = Some(calc);
                self.status = None;
                self.last = None;
                self.config.table_path = path;
                if let Err(e) = self.config.save(&self.config_path) {
                    error!("설정 저장 실패: {e}");
                }
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn ui_inputs(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(tr.t(keys::INPUTS_HEADING));
        ui.add_space(8.0);

        ui.label(tr.t(keys::MENU_METHOD));
        ui.radio_value(
            &mut self.method,
            Method::Diameter,
            menu_label(tr.t(keys::MENU_DIAMETER)),
        );
        ui.radio_value(
            &mut self.method,
            Method::KnownFlow,
            menu_label(tr.t(keys::MENU_KNOWN_FLOW)),
        );
        ui.add_space(8.0);

        egui::Grid::new("leak_inputs")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                match self.method {
                    Method::Diameter => {
                        ui.label(prompt_label(tr.t(keys::PROMPT_DIAMETER)));
                        ui.add(
                            egui::DragValue::new(&mut self.diameter_mm)
                                .speed(1.0)
                                .clamp_range(0.1..=1000.0)
                                .suffix(" mm"),
                        );
                    }
                    Method::KnownFlow => {
                        ui.label(prompt_label(tr.t(keys::PROMPT_FLOW)));
                        ui.add(
                            egui::DragValue::new(&mut self.known_flow_kg_h)
                                .speed(1.0)
                                .clamp_range(0.0..=f64::MAX)
                                .suffix(" kg/h"),
                        );
                    }
                }
                ui.end_row();

                ui.label(prompt_label(tr.t(keys::PROMPT_DURATION)));
                ui.add(
                    egui::DragValue::new(&mut self.duration_value)
                        .speed(1.0)
                        .clamp_range(0.0..=f64::MAX),
                );
                ui.end_row();

                ui.label("");
                egui::ComboBox::from_id_source("duration_unit")
                    .selected_text(tr.duration_unit(self.duration_unit))
                    .show_ui(ui, |ui| {
                        for unit in DurationUnit::ALL {
                            ui.selectable_value(
                                &mut self.duration_unit,
                                unit,
                                tr.duration_unit(unit),
                            );
                        }
                    });
                ui.end_row();
            });

        ui.add_space(12.0);
        let button = egui::Button::new(tr.t(keys::INPUTS_CALCULATE))
            .min_size(egui::vec2(ui.available_width(), 36.0));
        if ui.add_enabled(self.calculator.is_some(), button).clicked() {
            self.calculate();
        }

        ui.add_space(12.0);
        ui.separator();
        ui.horizontal(|ui| {
            ui.label(tr.t(keys::INPUTS_TABLE));
            if let Some(calc) = &self.calculator {
                let (min, max) = calc.table().diameter_range();
                ui.small(format!("{} rows, {min}–{max} mm", calc.table().len()));
            }
        });
        let load_button = egui::Button::new(tr.t(keys::INPUTS_LOAD_TABLE));
        if ui.add_enabled(!self.config_broken, load_button).clicked() {
            if let Some(path) = FileDialog::new()
                .add_filter("CSV / TOML", &["csv", "toml"])
                .pick_file()
            {
                self.load_table(path);
            }
        }
        if let Some(status) = &self.status {
            ui.colored_label(egui::Color32::RED, status);
        }
    }

    fn ui_results(&self, ui: &mut egui::Ui) {
        let tr = &self.tr;
        ui.heading(tr.t(keys::RESULT_HEADING));
        ui.add_space(8.0);
        match &self.last {
            None => {
                ui.label(tr.t(keys::RESULT_HINT));
            }
            Some(Err(e)) => {
                ui.colored_label(egui::Color32::RED, e);
            }
            Some(Ok(assessment)) => {
                let shown = DisplayedImpact::new(&assessment.impact, &self.config.currency_symbol);
                if assessment.outside_table {
                    let boundary = self
                        .calculator
                        .as_ref()
                        .map_or(self.config.boundary, LeakCalculator::boundary);
                    ui.colored_label(GOLD, tr.t(keys::outside_table(boundary)));
                }
                ui.small(format!(
                    "{}: {}   {}: {}",
                    tr.t(keys::RESULT_MASS_FLOW),
                    with_thousands(assessment.mass_flow_kg_h, 2),
                    tr.t(keys::RESULT_DURATION_HOURS),
                    with_thousands(assessment.duration_hours, 2)
                ));
                metric(ui, tr.t(keys::RESULT_ENERGY), &shown.energy_mj);
                metric(ui, tr.t(keys::RESULT_COST), &shown.cost);
                ui.separator();
                ui.heading(tr.t(keys::RESULT_TPE_HEADING));
                metric(ui, tr.t(keys::RESULT_TPE_DAY), &shown.intensity_day);
                metric(ui, tr.t(keys::RESULT_TPE_MONTH), &shown.intensity_month);
                metric(ui, tr.t(keys::RESULT_TPE_YEAR), &shown.intensity_year);
            }
        }
    }
}

/// "1) 오리피스 직경" → "오리피스 직경"
fn menu_label(text: &str) -> &str {
    text.split_once(") ").map(|(_, rest)| rest).unwrap_or(text)
}

/// "직경 [mm]: " → "직경 [mm]"
fn prompt_label(text: &str) -> &str {
    text.trim_end().trim_end_matches(':')
}

/// 금색 테두리 카드 형태의 결과 표시.
fn metric(ui: &mut egui::Ui, label: &str, value: &str) {
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(2.0, GOLD))
        .rounding(10.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(label);
            ui.label(egui::RichText::new(value).size(22.0).strong().color(NAVY));
        });
    ui.add_space(4.0);
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let tr = self.tr.clone();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.heading(tr.t(keys::APP_TITLE));
            ui.label(tr.t(keys::APP_SUBTITLE));
        });
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.small(tr.t(keys::APP_FOOTER));
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |cols| {
                self.ui_inputs(&mut cols[0]);
                self.ui_results(&mut cols[1]);
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steam_leak_impact::leak::{BoundaryPolicy, FlowTable, FlowTableRow, LeakConstants};

    fn test_app() -> GuiApp {
        let table = FlowTable::from_rows(vec![
            FlowTableRow {
                diameter_mm: 10.0,
                mass_flow_kg_h: 5.0,
            },
            FlowTableRow {
                diameter_mm: 20.0,
                mass_flow_kg_h: 20.0,
            },
        ])
        .unwrap();
        let calc =
            LeakCalculator::new(table, LeakConstants::default(), BoundaryPolicy::Extrapolate)
                .unwrap();
        GuiApp::new(
            config::Config::default(),
            PathBuf::from("unused.toml"),
            Ok(calc),
            "es",
        )
    }

    #[test]
    fn nothing_is_shown_before_calculate() {
        let app = test_app();
        assert!(app.last.is_none());
    }

    #[test]
    fn diameter_method_interpolates() {
        let mut app = test_app();
        app.diameter_mm = 15.0;
        app.duration_value = 10.0;
        app.calculate();
        let assessment = app.last.unwrap().unwrap();
        assert!((assessment.mass_flow_kg_h - 12.5).abs() < 1e-12);
        assert!((assessment.impact.energy_mj - 301.125).abs() < 1e-9);
    }

    #[test]
    fn known_flow_method_skips_table() {
        let mut app = test_app();
        app.method = Method::KnownFlow;
        app.known_flow_kg_h = 100.0;
        app.duration_value = 120.0;
        app.duration_unit = DurationUnit::Minutes;
        app.calculate();
        let assessment = app.last.unwrap().unwrap();
        assert_eq!(assessment.duration_hours, 2.0);
        assert_eq!(assessment.impact.total_mass_kg, 200.0);
    }

    #[test]
    fn missing_table_disables_calculation() {
        let mut app = GuiApp::new(
            config::Config::default(),
            PathBuf::from("unused.toml"),
            Err(StartupError::Table("no table".into())),
            "en",
        );
        app.calculate();
        assert!(app.last.is_none());
        assert_eq!(app.status.as_deref(), Some("no table"));
        assert!(!app.config_broken);
    }

    #[test]
    fn broken_config_blocks_calculation() {
        let path = env::temp_dir().join(format!(
            "steam_leak_impact_gui_broken_{}.toml",
            std::process::id()
        ));
        let broken = "[constants]\ncost_per_mj = \"cheap\"\n";
        fs::write(&path, broken).unwrap();

        let (cfg, calculator) = startup(&path);
        assert!(matches!(calculator, Err(StartupError::Config(_))));
        let mut app = GuiApp::new(cfg, path.clone(), calculator, "en");
        app.calculate();
        assert!(app.last.is_none());
        assert!(app.status.is_some());

        // 기본값 설정으로 사용자 파일을 덮어쓰지 않는다
        let table = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/fugas_vapor.csv");
        app.load_table(table);
        assert!(app.calculator.is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), broken);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn partial_constants_reach_calculator() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let path = env::temp_dir().join(format!(
            "steam_leak_impact_gui_partial_{}.toml",
            std::process::id()
        ));
        fs::write(
            &path,
            format!(
                "table_path = '{}'\n[constants]\ncost_per_mj = 0.12\n",
                dir.join("data/fugas_vapor.csv").display()
            ),
        )
        .unwrap();
        let (_, calculator) = startup(&path);
        fs::remove_file(&path).ok();
        let calculator = calculator.unwrap();
        assert_eq!(calculator.constants().cost_per_mj, 0.12);
        assert_eq!(
            calculator.constants().enthalpy_mj_per_kg,
            LeakConstants::default().enthalpy_mj_per_kg
        );
    }

    #[test]
    fn labels_strip_menu_numbers_and_colons() {
        assert_eq!(menu_label("1) Orifice diameter"), "Orifice diameter");
        assert_eq!(prompt_label("Diameter [mm]: "), "Diameter [mm]");
    }
}
