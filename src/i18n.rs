use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const APP_TITLE: &str = "app.title";
    pub const ERROR_PREFIX: &str = "general.error_prefix";

    pub const SIDEBAR_HEADING: &str = "sidebar.heading";
    pub const SIDEBAR_VOLTAGE: &str = "sidebar.voltage";
    pub const SIDEBAR_VOLTAGE_HELP: &str = "sidebar.voltage_help";
    pub const SIDEBAR_CURRENT: &str = "sidebar.current";
    pub const SIDEBAR_CURRENT_HELP: &str = "sidebar.current_help";
    pub const SIDEBAR_TEMPERATURE: &str = "sidebar.temperature";
    pub const SIDEBAR_TEMPERATURE_HELP: &str = "sidebar.temperature_help";
    pub const SIDEBAR_PRESSURE: &str = "sidebar.pressure";
    pub const SIDEBAR_PRESSURE_HELP: &str = "sidebar.pressure_help";
    pub const SIDEBAR_WATER_HEADING: &str = "sidebar.water_heading";
    pub const SIDEBAR_WATER_FLOW: &str = "sidebar.water_flow";
    pub const SIDEBAR_ELECTRODE_AREA: &str = "sidebar.electrode_area";
    pub const SIDEBAR_EFFICIENCY_MODE: &str = "sidebar.efficiency_mode";
    pub const SIDEBAR_EFFICIENCY_DERIVED: &str = "sidebar.efficiency_derived";
    pub const SIDEBAR_EFFICIENCY_DIRECT: &str = "sidebar.efficiency_direct";
    pub const SIDEBAR_DATA_HEADING: &str = "sidebar.data_heading";
    pub const SIDEBAR_PICK_FILE: &str = "sidebar.pick_file";
    pub const SIDEBAR_TABLE_ROWS: &str = "sidebar.table_rows";

    pub const PARAMS_HEADING: &str = "params.heading";
    pub const PARAMS_VOLTAGE: &str = "params.voltage";
    pub const PARAMS_CURRENT: &str = "params.current";
    pub const PARAMS_TEMPERATURE: &str = "params.temperature";
    pub const PARAMS_PRESSURE: &str = "params.pressure";
    pub const PARAMS_POWER: &str = "params.power";
    pub const PARAMS_WATER_FLOW: &str = "params.water_flow";
    pub const PARAMS_CURRENT_DENSITY: &str = "params.current_density";

    pub const CENTER_HEADING: &str = "center.heading";
    pub const CENTER_START: &str = "center.start";
    pub const CENTER_PAUSE: &str = "center.pause";
    pub const CENTER_STOP: &str = "center.stop";
    pub const CENTER_IMAGE_CAPTION: &str = "center.image_caption";
    pub const CENTER_REACTION_TITLE: &str = "center.reaction_title";
    pub const CENTER_REACTION_NOTE: &str = "center.reaction_note";

    pub const PROCESS_RUNNING: &str = "process.running";
    pub const PROCESS_PAUSED: &str = "process.paused";
    pub const PROCESS_STOPPED: &str = "process.stopped";

    pub const OUTPUTS_HEADING: &str = "outputs.heading";
    pub const OUTPUTS_H2: &str = "outputs.h2";
    pub const OUTPUTS_O2: &str = "outputs.o2";
    pub const OUTPUTS_EFFICIENCY: &str = "outputs.efficiency";
    pub const OUTPUTS_SPECIFIC: &str = "outputs.specific";
    pub const OUTPUTS_WATER_CONSUMPTION: &str = "outputs.water_consumption";
    pub const OUTPUTS_WATER_UTILISATION: &str = "outputs.water_utilisation";
    pub const OUTPUTS_SOURCE_EMPIRICAL: &str = "outputs.source_empirical";
    pub const OUTPUTS_SOURCE_THEORETICAL: &str = "outputs.source_theoretical";

    pub const RATING_OPTIMAL: &str = "rating.optimal";
    pub const RATING_MODERATE: &str = "rating.moderate";
    pub const RATING_LOW: &str = "rating.low";

    pub const WARNING_FALLBACK: &str = "warning.fallback";
    pub const WARNING_NO_TABLE: &str = "warning.no_table";
    pub const WARNING_WATER: &str = "warning.water";

    pub const FORMULA_BUTTON: &str = "formula.button";
    pub const FORMULA_TITLE: &str = "formula.title";
    pub const FORMULA_EMPIRICAL: &str = "formula.empirical";
    pub const FORMULA_FARADAY: &str = "formula.faraday";
    pub const FORMULA_SPECIFIC: &str = "formula.specific";
    pub const FORMULA_EFFICIENCY: &str = "formula.efficiency";
    pub const FORMULA_BREAKDOWN: &str = "formula.breakdown";

    pub const SETTINGS_TITLE: &str = "settings.title";
    pub const SETTINGS_LANGUAGE: &str = "settings.language";
    pub const SETTINGS_LANGUAGE_AUTO: &str = "settings.language_auto";
    pub const SETTINGS_ALPHA: &str = "settings.alpha";
    pub const SETTINGS_SAVE: &str = "settings.save";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const FOOTER_TITLE: &str = "footer.title";
    pub const FOOTER_MADE_BY: &str = "footer.made_by";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Es,
    En,
    Ko,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::Es
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
            Language::Ko => "ko",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    strings: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Translator {
    /// 언어 코드(es/en/ko)에 따라 내장 언어팩으로 번역기를 생성한다.
    pub fn new(lang_code: &str) -> Self {
        Self::new_with_pack(lang_code, None)
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let lang = Language::from_code(lang_code);
        let mut strings = built_in_pack(lang).unwrap_or_default();
        if let Some(overrides) = pack_dir.and_then(|dir| load_overrides(dir, lang_code)) {
            strings.extend(overrides);
        }
        Self {
            lang,
            strings,
            fallback: built_in_pack(Language::Es).unwrap_or_default(),
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }

    /// 번역을 가져온다. 없으면 스페인어 내장 문자열, 그것도 없으면 키를 그대로 반환한다.
    pub fn t(&self, key: &str) -> String {
        self.strings
            .get(key)
            .or_else(|| self.fallback.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// `{name}` 자리표시자를 채운 번역을 반환한다.
    pub fn t_with(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(&self.t(key), vars)
    }
}

/// 템플릿의 `{name}`을 값으로 치환한다.
pub fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "es".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("es") => Some("es".into()),
        other if other.starts_with("en") => Some("en".into()),
        other if other.starts_with("ko") => Some("ko".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "es" => Some("es".into()),
        "en" => Some("en".into()),
        "ko" => Some("ko".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    for var in ["LANG", "LC_ALL"] {
        if let Ok(lang) = std::env::var(var) {
            if let Some(code) = normalize_locale_string(&lang) {
                return Some(code);
            }
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [섹션] 아래 key = "value".
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // 1) full code (e.g., es-co)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    // 2) base code (e.g., es)
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// 내장 언어팩(파일이 없어도 동작하도록 빌드 시 포함).
fn built_in_pack(lang: Language) -> Option<HashMap<String, String>> {
    match lang {
        Language::Es => parse_toml_to_map(include_str!("../locales/es.toml")),
        Language::En => parse_toml_to_map(include_str!("../locales/en.toml")),
        Language::Ko => parse_toml_to_map(include_str!("../locales/ko.toml")),
    }
}
