//! 전압/전류별 수소 발생량 실측 표를 읽고 조회한다.
//!
//! 표는 `Voltaje`, `Corriente`, `Tasa de producción H2(ml/min)` 열을 가진 엑셀 통합문서
//! (첫 시트) 또는 CSV이며, 확장자로 형식을 고른다. 같은 (전압, 전류) 조합의 반복
//! 측정값은 평균을 낸다. 표는 시작 시 한 번 읽고 이후 수정하지 않는다.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use calamine::{open_workbook_auto, Data, Reader};

use crate::constants::ML_PER_L;

pub const VOLTAGE_COLUMN: &str = "Voltaje";
pub const CURRENT_COLUMN: &str = "Corriente";
pub const RATE_COLUMN: &str = "Tasa de producción H2(ml/min)";

/// 기본 키 매칭 허용오차. 표준 선택지 값(5.3, 5.75 ...)끼리는 정확히 일치한다.
pub const DEFAULT_KEY_TOLERANCE: f64 = 1e-6;

/// 실측 표의 한 행.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRecord {
    /// 전압 [V]
    pub voltage: f64,
    /// 전류 [A]
    pub current: f64,
    /// 측정 H₂ 발생량 [mL/min]
    pub gas_rate_ml_per_min: f64,
}

/// 표 로드 시 발생 가능한 오류.
#[derive(Debug)]
pub enum DataSourceError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// CSV 파싱 오류
    Csv(csv::Error),
    /// 통합문서 읽기 오류
    Workbook(calamine::Error),
    /// 통합문서에 시트가 없음
    NoSheet,
    /// 필수 열이 없음
    MissingColumn(&'static str),
    /// 숫자로 읽을 수 없는 셀
    Malformed {
        line: u64,
        column: &'static str,
        value: String,
    },
}

impl std::fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSourceError::Io(e) => write!(f, "데이터 파일 입출력 오류: {e}"),
            DataSourceError::Csv(e) => write!(f, "CSV 파싱 오류: {e}"),
            DataSourceError::Workbook(e) => write!(f, "통합문서 읽기 오류: {e}"),
            DataSourceError::NoSheet => write!(f, "통합문서에 시트가 없음"),
            DataSourceError::MissingColumn(c) => write!(f, "필수 열이 없음: {c}"),
            DataSourceError::Malformed {
                line,
                column,
                value,
            } => write!(f, "{line}행 '{column}' 값을 숫자로 읽을 수 없음: {value:?}"),
        }
    }
}

impl std::error::Error for DataSourceError {}

impl From<std::io::Error> for DataSourceError {
    fn from(value: std::io::Error) -> Self {
        DataSourceError::Io(value)
    }
}

impl From<csv::Error> for DataSourceError {
    fn from(value: csv::Error) -> Self {
        DataSourceError::Csv(value)
    }
}

impl From<calamine::Error> for DataSourceError {
    fn from(value: calamine::Error) -> Self {
        DataSourceError::Workbook(value)
    }
}

/// 표 키(전압, 전류) 비교 방식.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyMatch {
    /// f64 값이 정확히 같아야 한다.
    Exact,
    /// 절대 오차가 주어진 값 이하이면 같다고 본다.
    Tolerance(f64),
}

impl Default for KeyMatch {
    fn default() -> Self {
        KeyMatch::Tolerance(DEFAULT_KEY_TOLERANCE)
    }
}

impl KeyMatch {
    /// 설정값에서 매칭 방식을 만든다. None 또는 0 이하는 정확 일치.
    pub fn from_tolerance(tolerance: Option<f64>) -> Self {
        match tolerance {
            Some(t) if t > 0.0 => KeyMatch::Tolerance(t),
            _ => KeyMatch::Exact,
        }
    }

    fn matches(self, a: f64, b: f64) -> bool {
        match self {
            KeyMatch::Exact => a == b,
            KeyMatch::Tolerance(eps) => (a - b).abs() <= eps,
        }
    }
}

/// 조회 결과: 평균 발생량과 평균에 쓰인 측정 횟수.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmpiricalRate {
    /// 평균 H₂ 발생량 [L/min]
    pub h2_l_min: f64,
    /// 일치한 행 수
    pub samples: usize,
}

/// 불변 실측 표.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    records: Vec<MeasurementRecord>,
    key_match: KeyMatch,
}

impl LookupTable {
    pub fn new(records: Vec<MeasurementRecord>) -> Self {
        Self {
            records,
            key_match: KeyMatch::default(),
        }
    }

    pub fn with_key_match(mut self, key_match: KeyMatch) -> Self {
        self.key_match = key_match;
        self
    }

    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }

    pub fn key_match(&self) -> KeyMatch {
        self.key_match
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 일치하는 행들의 평균 발생량[L/min]과 행 수를 반환한다.
    pub fn query_samples(&self, voltage: f64, current: f64) -> Option<EmpiricalRate> {
        let (sum_ml, samples) = self
            .records
            .iter()
            .filter(|r| {
                self.key_match.matches(r.voltage, voltage)
                    && self.key_match.matches(r.current, current)
            })
            .fold((0.0, 0usize), |(sum, n), r| (sum + r.gas_rate_ml_per_min, n + 1));
        if samples == 0 {
            return None;
        }
        let mean_ml = sum_ml / samples as f64;
        Some(EmpiricalRate {
            h2_l_min: mean_ml / ML_PER_L,
            samples,
        })
    }

    /// 일치하는 행들의 평균 발생량을 L/min 으로 반환한다. 없으면 None.
    pub fn query(&self, voltage: f64, current: f64) -> Option<f64> {
        self.query_samples(voltage, current).map(|r| r.h2_l_min)
    }
}

/// 통합문서로 읽는 확장자.
pub const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// 파일 경로에서 표를 읽는다. 통합문서 확장자면 첫 시트를, 그 밖에는 CSV로 읽는다.
pub fn load(path: impl AsRef<Path>) -> Result<LookupTable, DataSourceError> {
    let path = path.as_ref();
    if is_workbook(path) {
        return load_workbook(path);
    }
    let content = fs::read_to_string(path)?;
    parse(&content)
}

pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|w| e.eq_ignore_ascii_case(w))
        })
        .unwrap_or(false)
}

/// 통합문서의 첫 시트에서 표를 읽는다. 머리글 행은 사용 범위의 첫 행이다.
pub fn load_workbook(path: impl AsRef<Path>) -> Result<LookupTable, DataSourceError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )
        .into());
    }
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DataSourceError::NoSheet)??;
    let first_row = range.start().map(|(r, _)| u64::from(r)).unwrap_or_default();

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|c| c.to_string().trim().to_string()).collect())
        .unwrap_or_default();
    let column = |name: &'static str| -> Result<usize, DataSourceError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(DataSourceError::MissingColumn(name))
    };
    let v_idx = column(VOLTAGE_COLUMN)?;
    let i_idx = column(CURRENT_COLUMN)?;
    let r_idx = column(RATE_COLUMN)?;

    let empty = Data::Empty;
    let mut records = Vec::new();
    // 시트 행 번호(1부터). 머리글이 first_row + 1 행이다.
    for (n, row) in rows.enumerate() {
        let line = first_row + n as u64 + 2;
        let cell = |idx: usize| row.get(idx).unwrap_or(&empty);
        let (v, i, r) = (cell(v_idx), cell(i_idx), cell(r_idx));
        if [v, i, r].iter().all(|c| is_blank_cell(c)) {
            continue;
        }
        records.push(MeasurementRecord {
            voltage: cell_number(v, line, VOLTAGE_COLUMN)?,
            current: cell_number(i, line, CURRENT_COLUMN)?,
            gas_rate_ml_per_min: cell_number(r, line, RATE_COLUMN)?,
        });
    }
    Ok(LookupTable::new(records))
}

fn is_blank_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_number(cell: &Data, line: u64, column: &'static str) -> Result<f64, DataSourceError> {
    match cell {
        Data::Float(f) => Ok(*f),
        Data::Int(i) => Ok(*i as f64),
        // 텍스트로 저장된 숫자는 소수점 쉼표도 받는다.
        Data::String(s) => parse_number(s.trim(), true, line, column),
        other => Err(DataSourceError::Malformed {
            line,
            column,
            value: other.to_string(),
        }),
    }
}

/// 임의의 reader에서 표를 읽는다.
pub fn from_reader<R: Read>(mut reader: R) -> Result<LookupTable, DataSourceError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse(&content)
}

fn parse(content: &str) -> Result<LookupTable, DataSourceError> {
    let content = content.trim_start_matches('\u{feff}');
    let header_line = content.lines().next().unwrap_or_default();
    // 스프레드시트 지역 설정에 따라 ';' 구분자 + 소수점 쉼표로 내보내는 경우가 있다.
    let semicolon = header_line.contains(';');
    let delimiter = if semicolon { b';' } else { b',' };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = rdr.headers()?.clone();
    let column = |name: &'static str| -> Result<usize, DataSourceError> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(DataSourceError::MissingColumn(name))
    };
    let v_idx = column(VOLTAGE_COLUMN)?;
    let i_idx = column(CURRENT_COLUMN)?;
    let r_idx = column(RATE_COLUMN)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let cell = |idx: usize| row.get(idx).unwrap_or_default().trim();
        let (v, i, r) = (cell(v_idx), cell(i_idx), cell(r_idx));
        if v.is_empty() && i.is_empty() && r.is_empty() {
            continue;
        }
        records.push(MeasurementRecord {
            voltage: parse_number(v, semicolon, line, VOLTAGE_COLUMN)?,
            current: parse_number(i, semicolon, line, CURRENT_COLUMN)?,
            gas_rate_ml_per_min: parse_number(r, semicolon, line, RATE_COLUMN)?,
        });
    }
    Ok(LookupTable::new(records))
}

fn parse_number(
    raw: &str,
    decimal_comma: bool,
    line: u64,
    column: &'static str,
) -> Result<f64, DataSourceError> {
    let text = if decimal_comma {
        raw.replace(',', ".")
    } else {
        raw.to_string()
    };
    text.parse::<f64>().map_err(|_| DataSourceError::Malformed {
        line,
        column,
        value: raw.to_string(),
    })
}

/// 경로별로 읽은 표를 보관해 같은 파일을 다시 읽지 않게 한다.
/// 항목은 프로세스가 끝날 때까지 유지된다.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: HashMap<PathBuf, Arc<LookupTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 캐시에 있으면 그대로, 없으면 읽어서 보관한 뒤 반환한다.
    /// 실패한 로드는 보관하지 않는다.
    pub fn get_or_load(
        &mut self,
        path: impl AsRef<Path>,
        key_match: KeyMatch,
    ) -> Result<Arc<LookupTable>, DataSourceError> {
        let path = path.as_ref();
        if let Some(table) = self.tables.get(path) {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load(path)?.with_key_match(key_match));
        self.tables.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.tables.contains_key(path.as_ref())
    }
}
