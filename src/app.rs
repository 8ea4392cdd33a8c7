use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Config, ConfigError};
use crate::dashboard::{Dashboard, DashboardInputs};
use crate::lookup_table::{DataSourceError, LookupTable, TableCache};
use crate::operating_point::InvalidOperatingPoint;
use crate::process::ProcessState;
use crate::production;
use crate::water::{self, WaterError};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 설정 저장/로드 오류
    Config(ConfigError),
    /// 실측 표 로드 오류
    DataSource(DataSourceError),
    /// 허용되지 않은 운전점
    InvalidOperatingPoint(InvalidOperatingPoint),
    /// 물 물성 계산 오류
    Water(WaterError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "설정 오류: {e}"),
            AppError::DataSource(e) => write!(f, "데이터 오류: {e}"),
            AppError::InvalidOperatingPoint(e) => write!(f, "입력 오류: {e}"),
            AppError::Water(e) => write!(f, "물성 계산 오류: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<DataSourceError> for AppError {
    fn from(value: DataSourceError) -> Self {
        AppError::DataSource(value)
    }
}

impl From<InvalidOperatingPoint> for AppError {
    fn from(value: InvalidOperatingPoint) -> Self {
        AppError::InvalidOperatingPoint(value)
    }
}

impl From<WaterError> for AppError {
    fn from(value: WaterError) -> Self {
        AppError::Water(value)
    }
}

/// 설정과 시작 시 한 번 읽은 실측 표를 들고 있는 세션.
#[derive(Debug)]
pub struct Session {
    config: Config,
    cache: TableCache,
    data_path: PathBuf,
    table: Option<Arc<LookupTable>>,
    /// 표를 읽지 못한 경우의 오류 문구. 계산은 이론식으로 계속된다.
    table_error: Option<String>,
}

impl Session {
    /// 설정의 `data_path`에서 표를 읽어 세션을 만든다. 실패해도 세션은 만들어진다.
    pub fn start(config: Config) -> Self {
        let data_path = PathBuf::from(&config.data_path);
        let mut session = Self {
            config,
            cache: TableCache::new(),
            data_path: data_path.clone(),
            table: None,
            table_error: None,
        };
        // 실패는 table_error에 남고 이론식으로 계속 계산한다.
        match session.fetch(&data_path) {
            Ok(table) => session.table = Some(table),
            Err(e) => session.table_error = Some(e.to_string()),
        }
        session
    }

    /// 이미 읽은 표로 세션을 만든다.
    pub fn with_table(config: Config, table: LookupTable) -> Self {
        Self {
            data_path: PathBuf::from(&config.data_path),
            config,
            cache: TableCache::new(),
            table: Some(Arc::new(table)),
            table_error: None,
        }
    }

    /// 운전자가 고른 다른 표 파일로 전환한다.
    /// 읽기에 실패하면 기존 표와 경로를 그대로 두고 오류만 돌려준다.
    pub fn reload_from(&mut self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref().to_path_buf();
        let table = self.fetch(&path)?;
        self.table = Some(table);
        self.table_error = None;
        self.data_path = path;
        Ok(())
    }

    fn fetch(&mut self, path: &Path) -> Result<Arc<LookupTable>, DataSourceError> {
        match self.cache.get_or_load(path, self.config.key_match()) {
            Ok(table) => {
                eprintln!(
                    "Lookup table loaded: {} ({} rows)",
                    path.display(),
                    table.len()
                );
                Ok(table)
            }
            Err(e) => {
                eprintln!("Lookup table unavailable ({}): {e}", path.display());
                Err(e)
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn table(&self) -> Option<&LookupTable> {
        self.table.as_deref()
    }

    pub fn table_error(&self) -> Option<&str> {
        self.table_error.as_deref()
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// 입력을 검증하고 계산해 대시보드를 만든다.
    pub fn evaluate(
        &self,
        inputs: &DashboardInputs,
        process: ProcessState,
    ) -> Result<Dashboard, AppError> {
        let outcome = production::compute_checked(&inputs.point, self.table(), inputs.efficiency)?;
        let density =
            water::water_density_kg_m3(inputs.point.pressure_bar, inputs.point.temperature_c);
        Ok(Dashboard::build(
            inputs,
            outcome,
            process,
            density,
            self.table_error.clone(),
        ))
    }
}
