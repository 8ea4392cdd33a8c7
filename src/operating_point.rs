//! 운전점(전압/전류/온도/압력)과 허용 입력 범위를 정의한다.
//! 전류 선택지는 전압에 종속되며, 이 정적 표를 경계에서 검증한다.

/// 전압별로 허용되는 전류 선택지 [V] → [A].
const VOLTAGE_CURRENT_OPTIONS: [(f64, [f64; 3]); 3] = [
    (5.3, [1.5, 2.05, 2.6]),
    (5.75, [3.5, 4.0, 4.5]),
    (6.2, [5.4, 6.0, 6.6]),
];

const VOLTAGES: [f64; 3] = [5.3, 5.75, 6.2];

/// 직접 입력 효율 모드에서 고를 수 있는 값 [%]
pub const DIRECT_EFFICIENCY_OPTIONS: [f64; 5] = [75.0, 80.0, 85.0, 90.0, 95.0];

/// 고정 운전 온도 [°C]. 화면에는 잠긴 슬라이더로 표시한다.
pub const FIXED_TEMPERATURE_C: f64 = 22.0;
pub const TEMPERATURE_RANGE_C: (f64, f64) = (22.0, 80.0);

/// 고정 운전 압력 [bar(a)]. 화면에는 잠긴 슬라이더로 표시한다.
pub const FIXED_PRESSURE_BAR: f64 = 1.015;
pub const PRESSURE_RANGE_BAR: (f64, f64) = (1.015, 30.0);

pub const WATER_FLOW_RANGE_L_MIN: (f64, f64) = (0.1, 5.0);
pub const WATER_FLOW_STEP_L_MIN: f64 = 0.1;
pub const DEFAULT_WATER_FLOW_L_MIN: f64 = 1.5;

pub const ELECTRODE_AREA_RANGE_CM2: (f64, f64) = (10.0, 500.0);
pub const ELECTRODE_AREA_STEP_CM2: f64 = 10.0;
pub const DEFAULT_ELECTRODE_AREA_CM2: f64 = 100.0;

/// 선택 가능한 전압 목록을 반환한다.
pub fn voltage_options() -> &'static [f64] {
    &VOLTAGES
}

/// 전압에 묶인 전류 선택지를 반환한다. 표에 없는 전압이면 None.
pub fn current_options(voltage: f64) -> Option<&'static [f64]> {
    VOLTAGE_CURRENT_OPTIONS
        .iter()
        .find(|(v, _)| *v == voltage)
        .map(|(_, currents)| currents.as_slice())
}

/// 운전점 검증 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidOperatingPoint {
    /// 선택지에 없는 전압
    UnknownVoltage(f64),
    /// 해당 전압과 짝지어지지 않은 전류
    CurrentNotPaired { voltage: f64, current: f64 },
    /// 직접 입력 모드에서 허용되지 않는 효율 값
    UnsupportedEfficiency(f64),
}

impl std::fmt::Display for InvalidOperatingPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidOperatingPoint::UnknownVoltage(v) => write!(f, "지원하지 않는 전압: {v} V"),
            InvalidOperatingPoint::CurrentNotPaired { voltage, current } => {
                write!(f, "{voltage} V 에서 선택할 수 없는 전류: {current} A")
            }
            InvalidOperatingPoint::UnsupportedEfficiency(e) => {
                write!(f, "지원하지 않는 효율 값: {e} %")
            }
        }
    }
}

impl std::error::Error for InvalidOperatingPoint {}

/// 운전자가 선택한 운전점.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    /// 인가 전압 [V]
    pub voltage: f64,
    /// 전류 [A]
    pub current: f64,
    /// 운전 온도 [°C] (표시 전용)
    pub temperature_c: f64,
    /// 운전 압력 [bar(a)] (표시 전용)
    pub pressure_bar: f64,
}

impl OperatingPoint {
    /// 고정 온도/압력을 채운 운전점을 만든다.
    pub fn new(voltage: f64, current: f64) -> Self {
        Self {
            voltage,
            current,
            temperature_c: FIXED_TEMPERATURE_C,
            pressure_bar: FIXED_PRESSURE_BAR,
        }
    }

    /// 전압/전류 짝이 선택지 표에 있는지 확인한다.
    pub fn validate(&self) -> Result<(), InvalidOperatingPoint> {
        let currents = current_options(self.voltage)
            .ok_or(InvalidOperatingPoint::UnknownVoltage(self.voltage))?;
        if currents.contains(&self.current) {
            Ok(())
        } else {
            Err(InvalidOperatingPoint::CurrentNotPaired {
                voltage: self.voltage,
                current: self.current,
            })
        }
    }
}

impl Default for OperatingPoint {
    fn default() -> Self {
        let (voltage, currents) = VOLTAGE_CURRENT_OPTIONS[0];
        Self::new(voltage, currents[0])
    }
}

/// 직접 입력 효율이 선택지에 있는지 확인한다.
pub fn validate_direct_efficiency(percent: f64) -> Result<f64, InvalidOperatingPoint> {
    if DIRECT_EFFICIENCY_OPTIONS.contains(&percent) {
        Ok(percent)
    } else {
        Err(InvalidOperatingPoint::UnsupportedEfficiency(percent))
    }
}

/// 생산량 계산에는 쓰이지 않고 화면 지표에만 쓰는 입력.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayInputs {
    /// 급수 유량 [L/min]
    pub water_flow_l_min: f64,
    /// 전극 면적 [cm²]
    pub electrode_area_cm2: f64,
}

impl Default for DisplayInputs {
    fn default() -> Self {
        Self {
            water_flow_l_min: DEFAULT_WATER_FLOW_L_MIN,
            electrode_area_cm2: DEFAULT_ELECTRODE_AREA_CM2,
        }
    }
}

impl DisplayInputs {
    /// 입력 위젯 범위로 잘라낸 값을 반환한다.
    pub fn clamped(self) -> Self {
        Self {
            water_flow_l_min: self
                .water_flow_l_min
                .clamp(WATER_FLOW_RANGE_L_MIN.0, WATER_FLOW_RANGE_L_MIN.1),
            electrode_area_cm2: self
                .electrode_area_cm2
                .clamp(ELECTRODE_AREA_RANGE_CM2.0, ELECTRODE_AREA_RANGE_CM2.1),
        }
    }
}
