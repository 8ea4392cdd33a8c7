//! 화면 툴킷과 무관한 대시보드 표시 모델.
//!
//! 계산 결과를 라벨 키 + 서식화된 값으로 바꾸고, 효율 등급과 경고를 정리한다.
//! GUI는 이 구조체를 그대로 그리기만 한다.

use crate::i18n::keys;
use crate::operating_point::{DisplayInputs, OperatingPoint};
use crate::process::ProcessState;
use crate::production::{
    efficiency_breakdown, EfficiencyBreakdown, EfficiencyMode, ProductionOutcome, RateSource,
};
use crate::water::{self, WaterError};

pub const OPTIMAL_EFFICIENCY_PERCENT: f64 = 70.0;
pub const MODERATE_EFFICIENCY_PERCENT: f64 = 50.0;

/// 한 번의 화면 갱신에 쓰이는 입력 묶음.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashboardInputs {
    pub point: OperatingPoint,
    pub display: DisplayInputs,
    pub efficiency: EfficiencyMode,
}

/// 라벨 키와 표시 문자열.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label_key: &'static str,
    pub value: String,
    /// 보조 표시값 (예: 시간당 환산)
    pub delta: Option<String>,
}

impl Metric {
    fn new(label_key: &'static str, value: String) -> Self {
        Self {
            label_key,
            value,
            delta: None,
        }
    }

    fn with_delta(mut self, delta: String) -> Self {
        self.delta = Some(delta);
        self
    }
}

/// 효율 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfficiencyRating {
    Optimal,
    Moderate,
    Low,
}

impl EfficiencyRating {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= OPTIMAL_EFFICIENCY_PERCENT {
            EfficiencyRating::Optimal
        } else if percent >= MODERATE_EFFICIENCY_PERCENT {
            EfficiencyRating::Moderate
        } else {
            EfficiencyRating::Low
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            EfficiencyRating::Optimal => keys::RATING_OPTIMAL,
            EfficiencyRating::Moderate => keys::RATING_MODERATE,
            EfficiencyRating::Low => keys::RATING_LOW,
        }
    }
}

/// 화면 경고.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// 이론식으로 대체함
    Fallback,
    /// 실측 표 로드 실패 (오류 문구)
    DataSource(String),
    /// 물 물성 계산 실패 (오류 문구)
    Water(String),
}

impl Warning {
    pub fn label_key(&self) -> &'static str {
        match self {
            Warning::Fallback => keys::WARNING_FALLBACK,
            Warning::DataSource(_) => keys::WARNING_NO_TABLE,
            Warning::Water(_) => keys::WARNING_WATER,
        }
    }

    /// 템플릿 `{error}` 자리에 들어갈 문구.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Warning::Fallback => None,
            Warning::DataSource(msg) | Warning::Water(msg) => Some(msg),
        }
    }
}

/// 급수 관련 표시값.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterMetrics {
    pub density_kg_m3: f64,
    /// 화학양론적 물 소비량 [L/min]
    pub consumption_l_min: f64,
    /// 공급 대비 소비 비율 [%]
    pub utilisation_percent: f64,
}

/// 대시보드 한 장면.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub outcome: ProductionOutcome,
    pub parameters: Vec<Metric>,
    pub outputs: Vec<Metric>,
    pub rating: EfficiencyRating,
    pub process: ProcessState,
    /// 유도 효율 모드일 때만 채워진다.
    pub breakdown: Option<EfficiencyBreakdown>,
    pub water: Option<WaterMetrics>,
    pub warnings: Vec<Warning>,
}

impl Dashboard {
    /// 계산 결과와 부가 정보로 대시보드를 구성한다.
    pub fn build(
        inputs: &DashboardInputs,
        outcome: ProductionOutcome,
        process: ProcessState,
        water_density: Result<f64, WaterError>,
        table_error: Option<String>,
    ) -> Self {
        let point = inputs.point;
        let display = inputs.display;
        let result = outcome.result;

        let mut warnings = Vec::new();
        if let Some(msg) = table_error {
            warnings.push(Warning::DataSource(msg));
        }
        if outcome.used_fallback() {
            warnings.push(Warning::Fallback);
        }

        let water = match water_density {
            Ok(density) => {
                let consumption =
                    water::stoichiometric_water_l_min(result.h2_production_l_min, density);
                Some(WaterMetrics {
                    density_kg_m3: density,
                    consumption_l_min: consumption,
                    utilisation_percent: water::feed_utilisation_percent(
                        consumption,
                        display.water_flow_l_min,
                    ),
                })
            }
            Err(e) => {
                warnings.push(Warning::Water(e.to_string()));
                None
            }
        };

        let parameters = vec![
            Metric::new(keys::PARAMS_VOLTAGE, format!("{} V", plain(point.voltage))),
            Metric::new(keys::PARAMS_CURRENT, format!("{} A", plain(point.current))),
            Metric::new(
                keys::PARAMS_TEMPERATURE,
                format!("{:.0} °C", point.temperature_c),
            ),
            Metric::new(keys::PARAMS_PRESSURE, format!("{} bar", plain(point.pressure_bar))),
            Metric::new(
                keys::PARAMS_POWER,
                format!("{} kW", plain(round2(result.power_kw))),
            ),
            Metric::new(
                keys::PARAMS_WATER_FLOW,
                format!("{} L/min", plain(display.water_flow_l_min)),
            ),
            Metric::new(
                keys::PARAMS_CURRENT_DENSITY,
                format!(
                    "{:.3} A/cm²",
                    current_density_a_cm2(point.current, display.electrode_area_cm2)
                ),
            ),
        ];

        let mut outputs = vec![
            Metric::new(
                keys::OUTPUTS_H2,
                format!("{:.4} L/min", result.h2_production_l_min),
            )
            .with_delta(format!("{:.3} L/h", result.h2_production_l_min * 60.0)),
            Metric::new(
                keys::OUTPUTS_O2,
                format!("{:.2} L/min", result.o2_production_l_min),
            )
            .with_delta(format!("{:.1} L/h", result.o2_production_l_min * 60.0)),
            Metric::new(
                keys::OUTPUTS_EFFICIENCY,
                format!("{:.1} %", result.efficiency_percent),
            ),
            Metric::new(
                keys::OUTPUTS_SPECIFIC,
                format!("{:.2} kWh/Nm³", result.specific_consumption_kwh_per_nm3),
            ),
        ];
        if let Some(w) = water {
            outputs.push(Metric::new(
                keys::OUTPUTS_WATER_CONSUMPTION,
                format!("{:.4} mL/min", w.consumption_l_min * 1000.0),
            ));
            outputs.push(Metric::new(
                keys::OUTPUTS_WATER_UTILISATION,
                format!("{:.4} %", w.utilisation_percent),
            ));
        }

        let breakdown = match inputs.efficiency {
            EfficiencyMode::Derived => Some(efficiency_breakdown(
                point.voltage,
                point.current,
                result.h2_production_l_min,
            )),
            EfficiencyMode::Direct(_) => None,
        };

        Self {
            outcome,
            parameters,
            outputs,
            rating: EfficiencyRating::from_percent(result.efficiency_percent),
            process,
            breakdown,
            water,
            warnings,
        }
    }

    pub fn used_fallback(&self) -> bool {
        self.outcome.used_fallback()
    }

    /// 생산량 출처 문구 키와 실측 행 수.
    pub fn source_label(&self) -> (&'static str, Option<usize>) {
        match self.outcome.source {
            RateSource::Empirical { samples } => (keys::OUTPUTS_SOURCE_EMPIRICAL, Some(samples)),
            RateSource::Theoretical { .. } => (keys::OUTPUTS_SOURCE_THEORETICAL, None),
        }
    }
}

/// 전류 밀도 [A/cm²]. 면적이 0 이하이면 0.
pub fn current_density_a_cm2(current: f64, area_cm2: f64) -> f64 {
    if area_cm2 > 0.0 {
        current / area_cm2
    } else {
        0.0
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// 선택지 값은 입력한 자릿수 그대로 보여준다 (4.0 → "4.0", 2.05 → "2.05").
fn plain(v: f64) -> String {
    format!("{v:?}")
}
