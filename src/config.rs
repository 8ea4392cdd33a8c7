use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::lookup_table::{KeyMatch, DEFAULT_KEY_TOLERANCE};
use crate::production::EfficiencyMode;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_DATA_PATH: &str = "Datosvoltaje.xlsx";
pub const DEFAULT_IMAGE_PATH: &str = "fig.png";

/// 효율 산정 방식 설정값.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EfficiencySetting {
    /// 전압 효율 × 패러데이 효율
    Derived,
    /// `direct_efficiency_percent` 값을 그대로 사용
    Direct,
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드(auto/es/en/ko)
    pub language: String,
    /// 외부 언어팩 디렉터리
    pub language_pack_dir: Option<String>,
    /// 실측 표 경로 (xlsx/xls/ods 또는 CSV)
    pub data_path: String,
    /// 개략도 이미지 경로
    pub image_path: String,
    pub efficiency_mode: EfficiencySetting,
    /// 직접 입력 모드 효율 [%] (75/80/85/90/95)
    pub direct_efficiency_percent: f64,
    /// 표 키 매칭 허용오차. 없으면 정확 일치.
    pub key_match_tolerance: Option<f64>,
    pub window_alpha: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            language_pack_dir: None,
            data_path: DEFAULT_DATA_PATH.into(),
            image_path: DEFAULT_IMAGE_PATH.into(),
            efficiency_mode: EfficiencySetting::Derived,
            direct_efficiency_percent: 85.0,
            key_match_tolerance: Some(DEFAULT_KEY_TOLERANCE),
            window_alpha: 1.0,
        }
    }
}

impl Config {
    /// 설정값을 계산용 효율 모드로 바꾼다.
    pub fn efficiency(&self) -> EfficiencyMode {
        match self.efficiency_mode {
            EfficiencySetting::Derived => EfficiencyMode::Derived,
            EfficiencySetting::Direct => EfficiencyMode::Direct(self.direct_efficiency_percent),
        }
    }

    pub fn key_match(&self) -> KeyMatch {
        KeyMatch::from_tolerance(self.key_match_tolerance)
    }

    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(DEFAULT_CONFIG_PATH)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 역직렬화 오류
    Serde(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            ConfigError::Serde(e) => write!(f, "설정 파싱 오류: {e}"),
            ConfigError::Serialize(e) => write!(f, "설정 직렬화 오류: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Serde(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        ConfigError::Serialize(value)
    }
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_or_default_at(DEFAULT_CONFIG_PATH)
}

/// 지정 경로의 설정을 로드하거나, 파일이 없으면 기본 설정을 그 경로에 저장한 뒤 반환한다.
pub fn load_or_default_at(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        Ok(cfg)
    }
}
