#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 PEM 수전해 장치 대시보드 진입점.

use clap::Parser;
use eframe::{egui, App, Frame};
use image::GenericImageView;
use pem_electrolyzer_twin::{
    app::Session,
    config::{self, EfficiencySetting},
    dashboard::{Dashboard, DashboardInputs, EfficiencyRating, Metric, Warning},
    i18n::{self, keys},
    operating_point::{
        self, DisplayInputs, OperatingPoint, DIRECT_EFFICIENCY_OPTIONS, ELECTRODE_AREA_RANGE_CM2,
        ELECTRODE_AREA_STEP_CM2, PRESSURE_RANGE_BAR, TEMPERATURE_RANGE_C, WATER_FLOW_RANGE_L_MIN,
        WATER_FLOW_STEP_L_MIN,
    },
    process::{ProcessState, StatusTone},
    production::EfficiencyMode,
};
use rfd::FileDialog;
use std::{fs, path::Path, path::PathBuf};

const GREEN: egui::Color32 = egui::Color32::from_rgb(0x22, 0xc5, 0x5e);
const BLUE: egui::Color32 = egui::Color32::from_rgb(0x3b, 0x82, 0xf6);
const RED: egui::Color32 = egui::Color32::from_rgb(0xef, 0x44, 0x44);
const AMBER: egui::Color32 = egui::Color32::from_rgb(0xf5, 0x9e, 0x0b);
const HEADER_BLUE: egui::Color32 = egui::Color32::from_rgb(0x1e, 0x3a, 0x8a);

/// 실행 옵션.
#[derive(Parser, Debug)]
#[command(name = "pem_electrolyzer_twin", version, about = "PEM electrolyzer digital twin")]
struct LaunchArgs {
    /// 언어 (auto/es/en/ko)
    #[arg(long, short = 'L', default_value = "auto")]
    lang: String,
    /// 실측 표 경로 (설정값보다 우선)
    #[arg(long)]
    data: Option<PathBuf>,
    /// 설정 파일 경로
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

fn main() -> Result<(), eframe::Error> {
    let args = LaunchArgs::parse();

    let mut app_cfg = match config::load_or_default_at(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Config error ({}), using defaults: {e}", args.config.display());
            config::Config::default()
        }
    };
    if args.lang != "auto" {
        app_cfg.language = i18n::resolve_language(&args.lang, Some(app_cfg.language.as_str()));
    }
    if let Some(data) = &args.data {
        app_cfg.data_path = data.display().to_string();
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PEM Electrolyzer")
            .with_inner_size([1280.0, 820.0])
            .with_transparent(true),
        ..Default::default()
    };
    let config_path = args.config.clone();
    eframe::run_native(
        "PEM Electrolyzer Digital Twin",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                eprintln!("Font error: {e}");
            }
            Box::new(GuiApp::new(Session::start(app_cfg), config_path))
        }),
    )
}

/// 공통: 바이너리 폰트 바이트를 egui에 등록.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    // 기본 폰트 뒤에 붙여 라틴 문자는 기본 폰트로, 한글만 대체 폰트로 그린다.
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .push(font_name);
    ctx.set_fonts(fonts);
}

/// 한글 표시용 폰트를 찾는다.
/// 1) assets/fonts/ 아래 폰트
/// 2) 시스템 폰트(Windows 맑은 고딕, Linux Noto CJK 등)
/// 3) 모두 실패 시 Err. 스페인어/영어 화면은 기본 폰트로 충분하다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates: Vec<PathBuf> = vec![
        PathBuf::from("assets/fonts/malgun.ttf"),
        PathBuf::from("assets/fonts/NotoSansKR-Regular.ttf"),
        PathBuf::from("/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc"),
        PathBuf::from("/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc"),
        PathBuf::from("/System/Library/Fonts/AppleSDGothicNeo.ttc"),
    ];
    if let Some(windir) = std::env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        candidates.push(fonts.join("malgun.ttf"));
        candidates.push(fonts.join("gulim.ttc"));
    }
    for p in candidates {
        if p.exists() {
            let bytes = fs::read(&p)
                .map_err(|e| format!("Failed to read font file ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "hangul_font");
            return Ok(());
        }
    }
    Err("Hangul font not found; Korean labels may not render.".into())
}

/// 개략도 이미지를 egui 텍스처로 읽는다.
fn load_schematic(ctx: &egui::Context, path: &str) -> Option<egui::TextureHandle> {
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let (w, h) = img.dimensions();
    let rgba = img.to_rgba8();
    let color = egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &rgba);
    Some(ctx.load_texture("schematic", color, egui::TextureOptions::LINEAR))
}

fn boxed_heading(ui: &mut egui::Ui, text: &str, fill: egui::Color32, stroke: egui::Color32) {
    egui::Frame::group(ui.style())
        .fill(fill)
        .stroke(egui::Stroke::new(2.0, stroke))
        .rounding(10.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.heading(egui::RichText::new(text).color(egui::Color32::DARK_GRAY));
            });
        });
    ui.add_space(6.0);
}

fn metric_ui(ui: &mut egui::Ui, label: &str, metric: &Metric) {
    egui::Frame::group(ui.style()).rounding(8.0).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new(label).size(13.0));
        ui.label(egui::RichText::new(&metric.value).size(16.0).strong());
        if let Some(delta) = &metric.delta {
            ui.label(egui::RichText::new(format!("↑ {delta}")).size(12.0).color(GREEN));
        }
    });
}

fn tone_color(tone: StatusTone) -> egui::Color32 {
    match tone {
        StatusTone::Success => GREEN,
        StatusTone::Info => BLUE,
        StatusTone::Warning => AMBER,
    }
}

fn rating_color(rating: EfficiencyRating) -> egui::Color32 {
    match rating {
        EfficiencyRating::Optimal => GREEN,
        EfficiencyRating::Moderate => AMBER,
        EfficiencyRating::Low => RED,
    }
}

fn status_banner(ui: &mut egui::Ui, text: &str, color: egui::Color32) {
    egui::Frame::none()
        .fill(color.linear_multiply(0.15))
        .rounding(6.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.colored_label(color, text);
        });
}

struct GuiApp {
    session: Session,
    config_path: PathBuf,
    tr: i18n::Translator,
    lang_input: String,
    settings_status: Option<String>,
    show_settings_modal: bool,
    show_formula_modal: bool,
    window_alpha: f32,
    // 입력
    voltage: f64,
    current: f64,
    water_flow_l_min: f64,
    electrode_area_cm2: f64,
    efficiency_setting: EfficiencySetting,
    direct_efficiency: f64,
    // 표시 상태
    process: ProcessState,
    schematic: Option<egui::TextureHandle>,
    schematic_tried: bool,
    reload_status: Option<String>,
    /// 마지막으로 기록한 (전압, 전류, 이론식 사용 여부)
    logged_source: Option<(f64, f64, bool)>,
}

impl GuiApp {
    fn new(session: Session, config_path: PathBuf) -> Self {
        let config = session.config().clone();
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        eprintln!("GUI language resolved: {lang_code}");
        let point = OperatingPoint::default();
        let display = DisplayInputs::default();
        let direct_efficiency = operating_point::validate_direct_efficiency(
            config.direct_efficiency_percent,
        )
        .unwrap_or(DIRECT_EFFICIENCY_OPTIONS[2]);
        Self {
            config_path,
            tr,
            lang_input: config.language.clone(),
            settings_status: None,
            show_settings_modal: false,
            show_formula_modal: false,
            window_alpha: config.window_alpha.clamp(0.3, 1.0),
            voltage: point.voltage,
            current: point.current,
            water_flow_l_min: display.water_flow_l_min,
            electrode_area_cm2: display.electrode_area_cm2,
            efficiency_setting: config.efficiency_mode,
            direct_efficiency,
            process: ProcessState::default(),
            schematic: None,
            schematic_tried: false,
            reload_status: None,
            logged_source: None,
            session,
        }
    }

    /// 전압을 바꾸고, 현재 전류가 새 전압의 선택지에 없으면 첫 선택지로 맞춘다.
    fn select_voltage(&mut self, voltage: f64) {
        self.voltage = voltage;
        if let Some(currents) = operating_point::current_options(voltage) {
            if !currents.contains(&self.current) {
                self.current = currents[0];
            }
        }
    }

    fn efficiency_mode(&self) -> EfficiencyMode {
        match self.efficiency_setting {
            EfficiencySetting::Derived => EfficiencyMode::Derived,
            EfficiencySetting::Direct => EfficiencyMode::Direct(self.direct_efficiency),
        }
    }

    fn inputs(&self) -> DashboardInputs {
        DashboardInputs {
            point: OperatingPoint::new(self.voltage, self.current),
            display: DisplayInputs {
                water_flow_l_min: self.water_flow_l_min,
                electrode_area_cm2: self.electrode_area_cm2,
            }
            .clamped(),
            efficiency: self.efficiency_mode(),
        }
    }

    fn ui_sidebar(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(tr.t(keys::SIDEBAR_HEADING));
        ui.add_space(6.0);

        ui.label(tr.t(keys::SIDEBAR_VOLTAGE))
            .on_hover_text(tr.t(keys::SIDEBAR_VOLTAGE_HELP));
        let mut voltage = self.voltage;
        egui::ComboBox::from_id_source("voltage")
            .selected_text(format!("{voltage:?} V"))
            .show_ui(ui, |ui| {
                for v in operating_point::voltage_options() {
                    ui.selectable_value(&mut voltage, *v, format!("{v:?} V"));
                }
            });
        if voltage != self.voltage {
            self.select_voltage(voltage);
        }

        ui.label(tr.t(keys::SIDEBAR_CURRENT))
            .on_hover_text(tr.t(keys::SIDEBAR_CURRENT_HELP));
        let currents = operating_point::current_options(self.voltage).unwrap_or_default();
        egui::ComboBox::from_id_source("current")
            .selected_text(format!("{:?} A", self.current))
            .show_ui(ui, |ui| {
                for c in currents {
                    ui.selectable_value(&mut self.current, *c, format!("{c:?} A"));
                }
            });

        // 온도/압력은 고정값이며 잠긴 슬라이더로만 보여준다.
        let point = OperatingPoint::new(self.voltage, self.current);
        let mut temperature = point.temperature_c;
        let mut pressure = point.pressure_bar;
        ui.label(tr.t(keys::SIDEBAR_TEMPERATURE))
            .on_hover_text(tr.t(keys::SIDEBAR_TEMPERATURE_HELP));
        ui.add_enabled(
            false,
            egui::Slider::new(&mut temperature, TEMPERATURE_RANGE_C.0..=TEMPERATURE_RANGE_C.1)
                .step_by(1.0),
        );
        ui.label(tr.t(keys::SIDEBAR_PRESSURE))
            .on_hover_text(tr.t(keys::SIDEBAR_PRESSURE_HELP));
        ui.add_enabled(
            false,
            egui::Slider::new(&mut pressure, PRESSURE_RANGE_BAR.0..=PRESSURE_RANGE_BAR.1)
                .step_by(0.001)
                .fixed_decimals(3),
        );

        ui.separator();
        ui.strong(tr.t(keys::SIDEBAR_WATER_HEADING));
        ui.label(tr.t(keys::SIDEBAR_WATER_FLOW));
        ui.add(
            egui::DragValue::new(&mut self.water_flow_l_min)
                .clamp_range(WATER_FLOW_RANGE_L_MIN.0..=WATER_FLOW_RANGE_L_MIN.1)
                .speed(WATER_FLOW_STEP_L_MIN)
                .fixed_decimals(1),
        );
        ui.label(tr.t(keys::SIDEBAR_ELECTRODE_AREA));
        ui.add(
            egui::DragValue::new(&mut self.electrode_area_cm2)
                .clamp_range(ELECTRODE_AREA_RANGE_CM2.0..=ELECTRODE_AREA_RANGE_CM2.1)
                .speed(ELECTRODE_AREA_STEP_CM2)
                .fixed_decimals(0),
        );

        ui.separator();
        ui.strong(tr.t(keys::SIDEBAR_EFFICIENCY_MODE));
        ui.radio_value(
            &mut self.efficiency_setting,
            EfficiencySetting::Derived,
            tr.t(keys::SIDEBAR_EFFICIENCY_DERIVED),
        );
        ui.radio_value(
            &mut self.efficiency_setting,
            EfficiencySetting::Direct,
            tr.t(keys::SIDEBAR_EFFICIENCY_DIRECT),
        );
        if self.efficiency_setting == EfficiencySetting::Direct {
            egui::ComboBox::from_id_source("direct_efficiency")
                .selected_text(format!("{:.0} %", self.direct_efficiency))
                .show_ui(ui, |ui| {
                    for e in DIRECT_EFFICIENCY_OPTIONS {
                        ui.selectable_value(&mut self.direct_efficiency, e, format!("{e:.0} %"));
                    }
                });
        }

        ui.separator();
        ui.strong(tr.t(keys::SIDEBAR_DATA_HEADING));
        if let Some(table) = self.session.table() {
            ui.small(tr.t_with(
                keys::SIDEBAR_TABLE_ROWS,
                &[
                    ("rows", table.len().to_string()),
                    ("path", self.session.data_path().display().to_string()),
                ],
            ));
        }
        if ui.button(tr.t(keys::SIDEBAR_PICK_FILE)).clicked() {
            if let Some(path) = FileDialog::new()
                .add_filter("Excel / CSV", &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"])
                .pick_file() {
                self.reload_status = self.session.reload_from(&path).err().map(|e| e.to_string());
            }
        }
        if let Some(msg) = &self.reload_status {
            ui.colored_label(RED, msg);
        }
    }

    fn ui_parameters(&self, ui: &mut egui::Ui, dash: &Dashboard) {
        boxed_heading(
            ui,
            &self.tr.t(keys::PARAMS_HEADING),
            egui::Color32::from_rgb(0xf8, 0xfa, 0xfc),
            egui::Color32::from_rgb(0xe2, 0xe8, 0xf0),
        );
        for m in &dash.parameters {
            metric_ui(ui, &self.tr.t(m.label_key), m);
        }
    }

    fn ui_center(&mut self, ui: &mut egui::Ui, dash: &Dashboard) {
        let tr = self.tr.clone();
        boxed_heading(
            ui,
            &tr.t(keys::CENTER_HEADING),
            egui::Color32::from_rgb(0xf8, 0xfa, 0xfc),
            egui::Color32::from_rgb(0xe2, 0xe8, 0xf0),
        );
        ui.columns(3, |cols| {
            for (col, (key, color, next)) in cols.iter_mut().zip([
                (keys::CENTER_START, GREEN, self.process.start()),
                (keys::CENTER_PAUSE, BLUE, self.process.pause()),
                (keys::CENTER_STOP, RED, self.process.stop()),
            ]) {
                let button = egui::Button::new(
                    egui::RichText::new(tr.t(key)).color(egui::Color32::WHITE),
                )
                .fill(color)
                .min_size(egui::vec2(col.available_width(), 30.0));
                if col.add(button).clicked() {
                    self.process = next;
                }
            }
        });
        ui.add_space(8.0);

        if !self.schematic_tried {
            self.schematic = load_schematic(ui.ctx(), &self.session.config().image_path);
            self.schematic_tried = true;
        }
        ui.vertical_centered(|ui| {
            if let Some(tex) = &self.schematic {
                ui.add(
                    egui::Image::new(egui::load::SizedTexture::from_handle(tex))
                        .max_width(ui.available_width() * 0.7),
                );
            }
            ui.small(tr.t(keys::CENTER_IMAGE_CAPTION));
        });
        ui.add_space(6.0);

        // 표시 상태는 렌더링 입력으로 받은 값만 사용한다.
        status_banner(ui, &tr.t(dash.process.status_key()), tone_color(dash.process.tone()));
        ui.add_space(8.0);

        egui::Frame::none()
            .fill(egui::Color32::from_rgb(0xf0, 0xf9, 0xff))
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.strong(tr.t(keys::CENTER_REACTION_TITLE));
                    ui.label(egui::RichText::new("2H₂O → 2H₂ + O₂").strong().size(16.0));
                    ui.label(egui::RichText::new(tr.t(keys::CENTER_REACTION_NOTE)).italics());
                });
            });
    }

    fn ui_outputs(&self, ui: &mut egui::Ui, dash: &Dashboard) {
        let tr = &self.tr;
        boxed_heading(
            ui,
            &tr.t(keys::OUTPUTS_HEADING),
            egui::Color32::from_rgb(0xec, 0xfd, 0xf5),
            egui::Color32::from_rgb(0x10, 0xb9, 0x81),
        );
        for m in &dash.outputs {
            metric_ui(ui, &tr.t(m.label_key), m);
        }
        let (source_key, samples) = dash.source_label();
        ui.small(tr.t_with(
            source_key,
            &[("samples", samples.unwrap_or_default().to_string())],
        ));
        ui.add_space(6.0);
        status_banner(ui, &tr.t(dash.rating.label_key()), rating_color(dash.rating));
        for w in &dash.warnings {
            let text = tr.t_with(
                w.label_key(),
                &[("error", w.detail().unwrap_or_default().to_string())],
            );
            let color = match w {
                Warning::Fallback => AMBER,
                Warning::DataSource(_) | Warning::Water(_) => RED,
            };
            ui.add_space(4.0);
            status_banner(ui, &text, color);
        }
    }

    fn ui_formula(&mut self, ctx: &egui::Context, dash: Option<&Dashboard>) {
        let tr = self.tr.clone();
        egui::Window::new(tr.t(keys::FORMULA_TITLE))
            .collapsible(true)
            .resizable(true)
            .open(&mut self.show_formula_modal)
            .show(ctx, |ui| {
                ui.label(tr.t(keys::FORMULA_EMPIRICAL));
                ui.label(tr.t(keys::FORMULA_FARADAY));
                ui.label(tr.t(keys::FORMULA_SPECIFIC));
                ui.label(tr.t(keys::FORMULA_EFFICIENCY));
                if let Some(b) = dash.and_then(|d| d.breakdown) {
                    ui.separator();
                    ui.label(tr.t_with(
                        keys::FORMULA_BREAKDOWN,
                        &[
                            ("voltage", format!("{:.2}", b.voltage_efficiency_percent)),
                            ("faradaic", format!("{:.2}", b.faradaic_efficiency_percent)),
                            ("theoretical", format!("{:.6}", b.theoretical_h2_l_min)),
                        ],
                    ));
                }
            });
    }

    fn ui_settings(&mut self, ctx: &egui::Context) {
        let tr = self.tr.clone();
        let mut open = self.show_settings_modal;
        egui::Window::new(tr.t(keys::SETTINGS_TITLE))
            .collapsible(false)
            .resizable(true)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(tr.t(keys::SETTINGS_LANGUAGE));
                egui::ComboBox::from_id_source("lang_choice")
                    .selected_text(self.lang_input.clone())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut self.lang_input,
                            "auto".into(),
                            tr.t(keys::SETTINGS_LANGUAGE_AUTO),
                        );
                        ui.selectable_value(&mut self.lang_input, "es".into(), "Español");
                        ui.selectable_value(&mut self.lang_input, "en".into(), "English");
                        ui.selectable_value(&mut self.lang_input, "ko".into(), "한국어");
                    });
                ui.separator();
                ui.label(tr.t(keys::SETTINGS_ALPHA));
                ui.add(egui::Slider::new(&mut self.window_alpha, 0.3..=1.0).text("alpha"));
                ui.separator();
                if ui.button(tr.t(keys::SETTINGS_SAVE)).clicked() {
                    self.save_settings();
                }
                if let Some(msg) = &self.settings_status {
                    ui.label(msg);
                }
            });
        self.show_settings_modal = open;
    }

    // 운전점이나 출처가 바뀔 때만 한 줄 남긴다.
    fn log_source_change(&mut self, dash: &Dashboard) {
        let key = (self.voltage, self.current, dash.used_fallback());
        if self.logged_source == Some(key) {
            return;
        }
        if key.2 {
            eprintln!(
                "Theoretical fallback in use at {:?} V / {:?} A",
                key.0, key.1
            );
        }
        self.logged_source = Some(key);
    }

    /// 설정 창의 값을 설정에 반영하고 파일로 저장한다.
    fn save_settings(&mut self) {
        let cfg = self.session.config_mut();
        cfg.language = self.lang_input.clone();
        cfg.window_alpha = self.window_alpha;
        cfg.efficiency_mode = self.efficiency_setting;
        cfg.direct_efficiency_percent = self.direct_efficiency;
        let resolved = i18n::resolve_language(&cfg.language, None);
        self.tr = i18n::Translator::new_with_pack(&resolved, cfg.language_pack_dir.as_deref());
        self.settings_status = Some(match cfg.save_to(&self.config_path) {
            Ok(()) => self.tr.t(keys::SETTINGS_SAVED),
            Err(e) => format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)),
        });
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 투명도는 기본 색에서 매 프레임 다시 계산한다.
        let base = egui::Visuals::default();
        let mut style = (*ctx.style()).clone();
        style.interaction.selectable_labels = false;
        style.visuals.window_fill = base.window_fill.linear_multiply(self.window_alpha);
        style.visuals.panel_fill = base.panel_fill.linear_multiply(self.window_alpha);
        ctx.set_style(style);

        let evaluated = self.session.evaluate(&self.inputs(), self.process);
        if let Ok(dash) = &evaluated {
            self.log_source_change(dash);
        }

        // 상단 바
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(
                    egui::RichText::new(self.tr.t(keys::APP_TITLE))
                        .color(HEADER_BLUE)
                        .strong(),
                );
                ui.separator();
                if ui.button(self.tr.t(keys::FORMULA_BUTTON)).clicked() {
                    self.show_formula_modal = true;
                }
                if ui.button(self.tr.t(keys::SETTINGS_TITLE)).clicked() {
                    self.show_settings_modal = true;
                }
            });
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(self.tr.t(keys::FOOTER_TITLE)).strong());
                ui.label(egui::RichText::new(self.tr.t(keys::FOOTER_MADE_BY)).italics());
            });
        });

        egui::SidePanel::left("sidebar")
            .resizable(true)
            .min_width(200.0)
            .default_width(240.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.ui_sidebar(ui));
            });

        if self.show_formula_modal {
            self.ui_formula(ctx, evaluated.as_ref().ok());
        }
        if self.show_settings_modal {
            self.ui_settings(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| match &evaluated {
            Ok(dash) => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui.columns(3, |cols| {
                            let [left, center, right] = cols else {
                                return;
                            };
                            self.ui_parameters(left, dash);
                            self.ui_center(center, dash);
                            self.ui_outputs(right, dash);
                        });
                    });
            }
            Err(e) => {
                ui.colored_label(RED, format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pem_electrolyzer_twin::lookup_table::{LookupTable, MeasurementRecord};

    fn app_with_table(records: Vec<MeasurementRecord>) -> GuiApp {
        let session = Session::with_table(config::Config::default(), LookupTable::new(records));
        GuiApp::new(session, PathBuf::from("config.toml"))
    }

    #[test]
    fn switching_voltage_resets_unpaired_current() {
        let mut app = app_with_table(Vec::new());
        assert_eq!(app.voltage, 5.3);
        assert_eq!(app.current, 1.5);
        app.select_voltage(6.2);
        assert_eq!(app.current, 5.4);
        assert!(app.inputs().point.validate().is_ok());
    }

    #[test]
    fn switching_voltage_keeps_current_when_still_paired() {
        let mut app = app_with_table(Vec::new());
        app.select_voltage(5.75);
        app.current = 4.5;
        app.select_voltage(5.75);
        assert_eq!(app.current, 4.5);
    }

    #[test]
    fn direct_mode_passes_selected_efficiency() {
        let mut app = app_with_table(Vec::new());
        app.select_voltage(6.2);
        app.current = 6.6;
        app.efficiency_setting = EfficiencySetting::Direct;
        app.direct_efficiency = 90.0;
        let dash = app.session.evaluate(&app.inputs(), app.process).unwrap();
        assert_eq!(dash.outcome.result.efficiency_percent, 90.0);
        assert!(dash.breakdown.is_none());
    }

    #[test]
    fn process_state_reaches_dashboard_without_affecting_results() {
        let mut app = app_with_table(vec![MeasurementRecord {
            voltage: 5.3,
            current: 1.5,
            gas_rate_ml_per_min: 50.0,
        }]);
        let stopped = app.session.evaluate(&app.inputs(), app.process).unwrap();
        app.process = app.process.start();
        let running = app.session.evaluate(&app.inputs(), app.process).unwrap();
        assert_eq!(stopped.process, ProcessState::Stopped);
        assert_eq!(running.process, ProcessState::Running);
        assert_eq!(stopped.outcome, running.outcome);
    }

    #[test]
    fn display_inputs_are_clamped_before_evaluation() {
        let mut app = app_with_table(Vec::new());
        app.water_flow_l_min = 9.0;
        app.electrode_area_cm2 = 1.0;
        let inputs = app.inputs();
        assert_eq!(inputs.display.water_flow_l_min, 5.0);
        assert_eq!(inputs.display.electrode_area_cm2, 10.0);
    }
}
