//! 전기화학 계산에 쓰는 물리 상수.

/// 패러데이 상수 [C/mol]
pub const FARADAY_C_PER_MOL: f64 = 96485.0;

/// 표준 상태 이상기체 몰부피 [L/mol]
pub const MOLAR_VOLUME_L_PER_MOL: f64 = 22.4;

/// 물 전기분해의 표준 가역 전압 [V]
pub const REVERSIBLE_CELL_VOLTAGE_V: f64 = 1.23;

/// 측정 데이터가 없을 때 가정하는 패러데이 효율 (0~1)
pub const ASSUMED_FARADAIC_EFFICIENCY: f64 = 0.85;

/// H₂ 1 mol 생성에 필요한 전자 수
pub const ELECTRONS_PER_H2: f64 = 2.0;

/// 물의 몰질량 [g/mol]
pub const WATER_MOLAR_MASS_G_PER_MOL: f64 = 18.015;

pub const ML_PER_L: f64 = 1000.0;
pub const L_PER_M3: f64 = 1000.0;
pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const MINUTES_PER_HOUR: f64 = 60.0;
