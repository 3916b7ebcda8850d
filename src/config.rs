use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::air::{pressure_from_altitude, PsychroResult, SolverOptions};

/// 기본 설정 파일 이름.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 결과 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 표 형태 텍스트
    Text,
    /// JSON
    Json,
}

/// 계산 지점(현장) 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// 해발 고도 [m]. 대기압은 기압식으로 구한다.
    pub altitude_m: f64,
    /// 대기압 직접 지정 [kPa]. 있으면 고도보다 우선한다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure_kpa: Option<f64>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            altitude_m: 0.0,
            pressure_kpa: None,
        }
    }
}

/// 출력 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// JSON 출력에 선도 데이터를 포함할지 여부
    pub chart: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            chart: false,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub solver: SolverOptions,
    pub output: OutputConfig,
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 값 검증 실패
    #[error("설정 값 오류: {0}")]
    Invalid(String),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "설정 로드");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        tracing::info!(path = %path.display(), "기본 설정 파일 생성");
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 반복 한도와 현장 값을 검증한다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.solver.max_iterations == 0 || self.solver.wet_bulb_max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "solver 반복 횟수는 1 이상이어야 합니다".into(),
            ));
        }
        if let Some(p) = self.site.pressure_kpa {
            if !p.is_finite() || p <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "site.pressure_kpa 는 0보다 커야 합니다: {p}"
                )));
            }
        }
        pressure_from_altitude(self.site.altitude_m)
            .map_err(|e| ConfigError::Invalid(format!("site.altitude_m: {e}")))?;
        Ok(())
    }

    /// 계산에 사용할 대기압 [kPa]. 직접 지정값이 없으면 고도로부터 구한다.
    pub fn pressure_kpa(&self) -> PsychroResult<f64> {
        match self.site.pressure_kpa {
            Some(p) => Ok(p),
            None => pressure_from_altitude(self.site.altitude_m),
        }
    }
}
