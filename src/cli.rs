use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{OutputFormat, DEFAULT_CONFIG_PATH};

/// 명령행 인자.
#[derive(Debug, Parser)]
#[command(name = "psychrometric_toolbox", version)]
#[command(about = "습공기 상태점 및 공기 조화 공정 계산기", long_about = None)]
pub struct Cli {
    /// 설정 파일 경로 (없으면 기본값으로 생성)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// 해발 고도 [m]. 설정 파일 값보다 우선한다
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub altitude: Option<f64>,
    /// 대기압 [kPa]. 고도보다 우선한다
    #[arg(long, global = true)]
    pub pressure: Option<f64>,
    /// 출력 형식
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,
    /// JSON 출력에 선도 데이터를 포함한다
    #[arg(long, global = true)]
    pub chart: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 상태점 계산 (독립 물성 두 개)
    #[command(subcommand)]
    State(StateCommand),
    /// 현열 가열/냉각: 건구온도1 [°C], 상대습도1 [%], 목표 건구온도2 [°C]
    #[command(allow_negative_numbers = true)]
    HeatCool {
        dry_bulb_1: f64,
        rh_1: f64,
        dry_bulb_2: f64,
    },
    /// 단열 가습
    #[command(subcommand)]
    Humidify(HumidifyCommand),
    /// 두 기류 혼합: 건구온도 [°C], 상대습도 [%], 체적 유량 [m³/h] 를 기류별로 입력
    #[command(allow_negative_numbers = true)]
    Mix {
        dry_bulb_1: f64,
        rh_1: f64,
        flow_1: f64,
        dry_bulb_2: f64,
        rh_2: f64,
        flow_2: f64,
    },
    /// 고도 [m] 로부터 대기압 계산
    #[command(allow_negative_numbers = true)]
    Pressure { altitude: f64 },
}

#[derive(Debug, Subcommand)]
pub enum StateCommand {
    /// 건구온도 [°C] + 상대습도 [%]
    #[command(allow_negative_numbers = true)]
    DbRh { dry_bulb: f64, rh: f64 },
    /// 건구온도 [°C] + 습구온도 [°C]
    #[command(allow_negative_numbers = true)]
    DbWb { dry_bulb: f64, wet_bulb: f64 },
    /// 건구온도 [°C] + 이슬점 [°C]
    #[command(allow_negative_numbers = true)]
    DbDp { dry_bulb: f64, dew_point: f64 },
    /// 건구온도 [°C] + 수증기 분압 [kPa]
    #[command(allow_negative_numbers = true)]
    DbPv { dry_bulb: f64, vapor_pressure: f64 },
}

#[derive(Debug, Subcommand)]
pub enum HumidifyCommand {
    /// 목표 건구온도: 건구온도1 [°C], 상대습도1 [%], 건구온도2 [°C]
    #[command(allow_negative_numbers = true)]
    DryBulb {
        dry_bulb_1: f64,
        rh_1: f64,
        dry_bulb_2: f64,
    },
    /// 목표 상대습도: 건구온도1 [°C], 상대습도1 [%], 상대습도2 [%]
    #[command(allow_negative_numbers = true)]
    Rh {
        dry_bulb_1: f64,
        rh_1: f64,
        rh_2: f64,
    },
    /// 목표 습도비: 건구온도1 [°C], 습도비1 [g/kg], 습도비2 [g/kg]
    #[command(allow_negative_numbers = true)]
    Ratio {
        dry_bulb_1: f64,
        ratio_1: f64,
        ratio_2: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_temperatures() {
        let cli = Cli::try_parse_from([
            "psychrometric_toolbox",
            "state",
            "db-dp",
            "-5",
            "-12.5",
        ])
        .unwrap();
        match cli.command {
            Command::State(StateCommand::DbDp {
                dry_bulb,
                dew_point,
            }) => {
                assert_eq!(dry_bulb, -5.0);
                assert_eq!(dew_point, -12.5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_pressure_after_subcommand() {
        let cli = Cli::try_parse_from([
            "psychrometric_toolbox",
            "heat-cool",
            "30",
            "80",
            "10",
            "--pressure",
            "95.5",
        ])
        .unwrap();
        assert_eq!(cli.pressure, Some(95.5));
    }
}
