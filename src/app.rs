use std::io::{self, Write};

use crate::air::{
    from_dry_bulb_dew_point, from_dry_bulb_rh, from_dry_bulb_vapor_pressure,
    from_dry_bulb_wet_bulb, heating_cooling, humidify_to_dry_bulb, humidify_to_ratio,
    humidify_to_rh, mix_streams, pressure_from_altitude, PsychroError, StreamInput,
};
use crate::cli::{Cli, Command, HumidifyCommand, StateCommand};
use crate::config::{self, Config, ConfigError, OutputFormat};
use crate::report::{self, Outcome};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 습공기 계산 오류
    #[error("습공기 계산 오류: {0}")]
    Psychro(#[from] PsychroError),
    /// JSON 출력 오류
    #[error("JSON 출력 오류: {0}")]
    Json(#[from] serde_json::Error),
}

/// 명령행 옵션을 설정 위에 덮어쓴다.
pub fn apply_overrides(cfg: &mut Config, cli: &Cli) {
    if let Some(altitude) = cli.altitude {
        cfg.site.altitude_m = altitude;
        cfg.site.pressure_kpa = None;
    }
    if let Some(pressure) = cli.pressure {
        cfg.site.pressure_kpa = Some(pressure);
    }
    if let Some(format) = cli.format {
        cfg.output.format = format;
    }
    if cli.chart {
        cfg.output.chart = true;
    }
}

/// 명령 하나를 계산한다. 상태를 남기지 않는 순수 계산이다.
pub fn execute(command: &Command, cfg: &Config, patm_kpa: f64) -> Result<Outcome, PsychroError> {
    let opts = &cfg.solver;
    let outcome = match command {
        Command::State(state) => {
            let state = match *state {
                StateCommand::DbRh { dry_bulb, rh } => {
                    from_dry_bulb_rh(dry_bulb, rh, patm_kpa, opts)?
                }
                StateCommand::DbWb { dry_bulb, wet_bulb } => {
                    from_dry_bulb_wet_bulb(dry_bulb, wet_bulb, patm_kpa)?
                }
                StateCommand::DbDp {
                    dry_bulb,
                    dew_point,
                } => from_dry_bulb_dew_point(dry_bulb, dew_point, patm_kpa, opts)?,
                StateCommand::DbPv {
                    dry_bulb,
                    vapor_pressure,
                } => from_dry_bulb_vapor_pressure(dry_bulb, vapor_pressure, patm_kpa, opts)?,
            };
            Outcome::State { state }
        }
        Command::HeatCool {
            dry_bulb_1,
            rh_1,
            dry_bulb_2,
        } => Outcome::Process(heating_cooling(*dry_bulb_1, *rh_1, *dry_bulb_2, patm_kpa, opts)?),
        Command::Humidify(h) => Outcome::Process(match *h {
            HumidifyCommand::DryBulb {
                dry_bulb_1,
                rh_1,
                dry_bulb_2,
            } => humidify_to_dry_bulb(dry_bulb_1, rh_1, dry_bulb_2, patm_kpa, opts)?,
            HumidifyCommand::Rh {
                dry_bulb_1,
                rh_1,
                rh_2,
            } => humidify_to_rh(dry_bulb_1, rh_1, rh_2, patm_kpa, opts)?,
            HumidifyCommand::Ratio {
                dry_bulb_1,
                ratio_1,
                ratio_2,
            } => humidify_to_ratio(dry_bulb_1, ratio_1, ratio_2, patm_kpa, opts)?,
        }),
        Command::Mix {
            dry_bulb_1,
            rh_1,
            flow_1,
            dry_bulb_2,
            rh_2,
            flow_2,
        } => {
            let a = StreamInput {
                dry_bulb_c: *dry_bulb_1,
                rh_pct: *rh_1,
                flow_m3_per_h: *flow_1,
            };
            let b = StreamInput {
                dry_bulb_c: *dry_bulb_2,
                rh_pct: *rh_2,
                flow_m3_per_h: *flow_2,
            };
            Outcome::Mixing(mix_streams(&a, &b, patm_kpa, opts)?)
        }
        Command::Pressure { altitude } => Outcome::Pressure {
            altitude_m: *altitude,
            pressure_kpa: pressure_from_altitude(*altitude)?,
        },
    };
    Ok(outcome)
}

/// CLI 애플리케이션을 실행한다. 설정 로드 → 대기압 결정 → 계산 → 출력.
pub fn run(cli: &Cli) -> Result<(), AppError> {
    let mut cfg = config::load_or_default(&cli.config)?;
    apply_overrides(&mut cfg, cli);
    cfg.validate()?;

    let patm_kpa = cfg.pressure_kpa()?;
    tracing::debug!(patm_kpa, command = ?cli.command, "계산 시작");
    let outcome = execute(&cli.command, &cfg, patm_kpa)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cfg.output.format {
        OutputFormat::Text => report::write_text(&mut out, &outcome, patm_kpa)?,
        OutputFormat::Json => {
            let json = report::to_json(&outcome, patm_kpa, cfg.output.chart)?;
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}
