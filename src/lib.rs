//! PEM 수전해 장치 디지털 트윈의 계산 로직을 라이브러리로 분리하여 GUI는 표시만 담당한다.

pub mod app;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod i18n;
pub mod lookup_table;
pub mod operating_point;
pub mod process;
pub mod production;
pub mod water;
