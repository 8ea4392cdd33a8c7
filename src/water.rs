//! 급수(순수) 물성 및 화학양론적 물 소비량.
//! 물 밀도는 IAPWS-IF97(seuif97)로 계산한다. 운전 범위의 급수는 압축수(Region 1)이다.

use seuif97::{pt, OV};

use crate::constants::{MOLAR_VOLUME_L_PER_MOL, WATER_MOLAR_MASS_G_PER_MOL};

/// 물성 계산 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum WaterError {
    /// IF97 유효 범위 밖이거나 수렴 실패
    OutOfRange { pressure_bar_abs: f64, temperature_c: f64 },
}

impl std::fmt::Display for WaterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaterError::OutOfRange {
                pressure_bar_abs,
                temperature_c,
            } => write!(
                f,
                "IF97 물 밀도 계산 실패: {pressure_bar_abs} bar(a), {temperature_c} °C"
            ),
        }
    }
}

impl std::error::Error for WaterError {}

/// 압축수 밀도[kg/m³]. 입력은 bar(abs)/°C.
pub fn water_density_kg_m3(pressure_bar_abs: f64, temperature_c: f64) -> Result<f64, WaterError> {
    let out_of_range = || WaterError::OutOfRange {
        pressure_bar_abs,
        temperature_c,
    };
    if pressure_bar_abs <= 0.0 {
        return Err(out_of_range());
    }
    let p_mpa = pressure_bar_abs / 10.0;
    let v = pt(p_mpa, temperature_c, OV);
    if v.is_nan() || v <= 0.0 {
        return Err(out_of_range());
    }
    Ok(1.0 / v)
}

/// H₂ 생산량에 대응하는 물 소비량[L/min]. H₂ 1 mol 당 H₂O 1 mol.
pub fn stoichiometric_water_l_min(h2_l_min: f64, density_kg_m3: f64) -> f64 {
    if density_kg_m3 <= 0.0 {
        return 0.0;
    }
    let h2_mol_min = h2_l_min.max(0.0) / MOLAR_VOLUME_L_PER_MOL;
    let water_kg_min = h2_mol_min * WATER_MOLAR_MASS_G_PER_MOL / 1000.0;
    // kg/min → m³/min → L/min
    water_kg_min / density_kg_m3 * 1000.0
}

/// 공급 대비 소비 비율[%]. 공급 유량이 0 이하이면 0.
pub fn feed_utilisation_percent(consumed_l_min: f64, fed_l_min: f64) -> f64 {
    if fed_l_min > 0.0 {
        consumed_l_min / fed_l_min * 100.0
    } else {
        0.0
    }
}
