//! 수소/산소 생산량, 소비전력, 비에너지 소비량, 시스템 효율 계산.
//!
//! 실측 표에 해당 운전점이 있으면 그 평균값을 쓰고, 없으면 패러데이 법칙으로
//! 이론 생산량을 추정한다. 계산은 입력과 표에만 의존하는 순수 함수다.

use crate::constants::{
    ASSUMED_FARADAIC_EFFICIENCY, ELECTRONS_PER_H2, FARADAY_C_PER_MOL, L_PER_M3,
    MINUTES_PER_HOUR, MOLAR_VOLUME_L_PER_MOL, REVERSIBLE_CELL_VOLTAGE_V, SECONDS_PER_MINUTE,
};
use crate::lookup_table::LookupTable;
use crate::operating_point::{validate_direct_efficiency, InvalidOperatingPoint, OperatingPoint};

/// 시스템 효율 산정 방식.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EfficiencyMode {
    /// 운전자가 고른 효율[%]을 그대로 결과에 싣는다.
    Direct(f64),
    /// 전압 효율 × 패러데이 효율로 산정한다.
    #[default]
    Derived,
}

/// 생산량 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductionResult {
    /// H₂ 생산량 [L/min]
    pub h2_production_l_min: f64,
    /// O₂ 생산량 [L/min] (항상 H₂의 절반)
    pub o2_production_l_min: f64,
    /// 소비전력 (전압 × 전류)
    pub power_kw: f64,
    /// 비에너지 소비량 [kWh/Nm³ H₂]
    pub specific_consumption_kwh_per_nm3: f64,
    /// 시스템 효율 [%]
    pub efficiency_percent: f64,
}

/// 이론식으로 대체한 이유.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// 실측 표를 읽지 못함
    NoTable,
    /// 표에 일치하는 행이 없음
    NoMatchingRow,
}

/// H₂ 생산량의 출처.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// 실측 표 평균 (평균에 쓰인 행 수)
    Empirical { samples: usize },
    /// 패러데이 법칙 기반 이론값
    Theoretical { reason: FallbackReason },
}

/// 계산 결과와 생산량 출처.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductionOutcome {
    pub result: ProductionResult,
    pub source: RateSource,
}

impl ProductionOutcome {
    /// 이론식 대체가 일어났으면 true. 화면 경고 표시에 쓴다.
    pub fn used_fallback(&self) -> bool {
        matches!(self.source, RateSource::Theoretical { .. })
    }
}

/// 유도 효율 모드의 중간값.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EfficiencyBreakdown {
    /// 전압 효율 [%]
    pub voltage_efficiency_percent: f64,
    /// 패러데이 효율 [%] (100 이하)
    pub faradaic_efficiency_percent: f64,
    /// 효율 100% 기준 이론 H₂ 생산량 [L/min]
    pub theoretical_h2_l_min: f64,
    /// 종합 효율 [%]
    pub combined_percent: f64,
}

/// 패러데이 법칙으로 H₂ 생산량[L/min]을 구한다.
/// `faradaic_fraction`은 0~1 효율이며, 음의 전류는 0으로 본다.
pub fn theoretical_h2_l_min(current: f64, faradaic_fraction: f64) -> f64 {
    let h2_mol_s =
        (current.max(0.0) * faradaic_fraction) / (ELECTRONS_PER_H2 * FARADAY_C_PER_MOL);
    h2_mol_s * MOLAR_VOLUME_L_PER_MOL * SECONDS_PER_MINUTE / 1000.0
}

/// 전압 효율 = 1.23 V / 인가 전압 × 100. 전압이 0 이하이면 0.
pub fn voltage_efficiency_percent(voltage: f64) -> f64 {
    if voltage > 0.0 {
        (REVERSIBLE_CELL_VOLTAGE_V / voltage) * 100.0
    } else {
        0.0
    }
}

/// 실제/이론 생산량 비율[%]. 100으로 제한하며 이론값이 0 이하이면 0.
pub fn faradaic_efficiency_percent(h2_l_min: f64, theoretical_h2_l_min: f64) -> f64 {
    if theoretical_h2_l_min > 0.0 {
        ((h2_l_min / theoretical_h2_l_min) * 100.0).min(100.0)
    } else {
        0.0
    }
}

/// 비에너지 소비량 = 전력 / (H₂ m³/h). 생산량이 0 이하이면 0.
///
/// `power_kw`는 V × I 값을 그대로 받으므로 결과는 실제로 W·h/Nm³ 크기이다
/// (kWh/Nm³ 값의 1000배). 표시 라벨은 kWh/Nm³를 유지한다.
pub fn specific_consumption_kwh_per_nm3(power_kw: f64, h2_l_min: f64) -> f64 {
    if h2_l_min > 0.0 {
        power_kw / (h2_l_min / L_PER_M3 * MINUTES_PER_HOUR)
    } else {
        0.0
    }
}

/// 전압 효율과 패러데이 효율을 곱해 종합 효율을 구한다.
pub fn efficiency_breakdown(voltage: f64, current: f64, h2_l_min: f64) -> EfficiencyBreakdown {
    let voltage_eff = voltage_efficiency_percent(voltage);
    let theoretical = theoretical_h2_l_min(current, 1.0);
    let faradaic = faradaic_efficiency_percent(h2_l_min, theoretical);
    EfficiencyBreakdown {
        voltage_efficiency_percent: voltage_eff,
        faradaic_efficiency_percent: faradaic,
        theoretical_h2_l_min: theoretical,
        combined_percent: voltage_eff * (faradaic / 100.0),
    }
}

/// 운전점에서 생산량과 효율을 계산한다.
/// `lookup`이 None이면 표를 읽지 못한 것으로 보고 이론식을 쓴다.
pub fn compute(
    point: &OperatingPoint,
    lookup: Option<&LookupTable>,
    mode: EfficiencyMode,
) -> ProductionOutcome {
    let (h2_l_min, source) = match lookup {
        None => (
            theoretical_h2_l_min(point.current, ASSUMED_FARADAIC_EFFICIENCY),
            RateSource::Theoretical {
                reason: FallbackReason::NoTable,
            },
        ),
        Some(table) => match table.query_samples(point.voltage, point.current) {
            Some(rate) => (
                rate.h2_l_min,
                RateSource::Empirical {
                    samples: rate.samples,
                },
            ),
            None => (
                theoretical_h2_l_min(point.current, ASSUMED_FARADAIC_EFFICIENCY),
                RateSource::Theoretical {
                    reason: FallbackReason::NoMatchingRow,
                },
            ),
        },
    };

    let power_kw = point.voltage * point.current;
    let efficiency_percent = match mode {
        EfficiencyMode::Direct(percent) => percent,
        EfficiencyMode::Derived => {
            efficiency_breakdown(point.voltage, point.current, h2_l_min).combined_percent
        }
    };

    ProductionOutcome {
        result: ProductionResult {
            h2_production_l_min: h2_l_min,
            o2_production_l_min: h2_l_min / 2.0,
            power_kw,
            specific_consumption_kwh_per_nm3: specific_consumption_kwh_per_nm3(power_kw, h2_l_min),
            efficiency_percent,
        },
        source,
    }
}

/// 전압/전류 짝과 직접 입력 효율을 검증한 뒤 계산한다.
pub fn compute_checked(
    point: &OperatingPoint,
    lookup: Option<&LookupTable>,
    mode: EfficiencyMode,
) -> Result<ProductionOutcome, InvalidOperatingPoint> {
    point.validate()?;
    if let EfficiencyMode::Direct(percent) = mode {
        validate_direct_efficiency(percent)?;
    }
    Ok(compute(point, lookup, mode))
}
