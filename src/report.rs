//! 계산 결과 출력. 텍스트 표와 JSON 두 가지를 지원한다.

use serde::Serialize;
use std::io::{self, Write};

use crate::air::{MixingResult, ProcessResult, StateRecord};
use crate::chart::{ChartFrame, ChartPayload};

/// 한 번의 계산 요청 결과.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    State { state: StateRecord },
    Process(ProcessResult),
    Mixing(MixingResult),
    Pressure { altitude_m: f64, pressure_kpa: f64 },
}

impl Outcome {
    /// 선도에 올릴 페이로드. 대기압 계산은 선도 대상이 아니다.
    pub fn chart_payload(&self) -> Option<ChartPayload> {
        match self {
            Outcome::State { state } => Some(ChartPayload::from(state)),
            Outcome::Process(r) => Some(ChartPayload::from(r)),
            Outcome::Mixing(r) => Some(ChartPayload::from(r)),
            Outcome::Pressure { .. } => None,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    pressure_kpa: f64,
    result: &'a Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<ChartFrame>,
}

/// JSON 문서로 직렬화한다.
pub fn to_json(
    outcome: &Outcome,
    pressure_kpa: f64,
    with_chart: bool,
) -> Result<String, serde_json::Error> {
    let chart = if with_chart {
        outcome
            .chart_payload()
            .map(|payload| ChartFrame::for_payload(payload, pressure_kpa))
    } else {
        None
    };
    serde_json::to_string_pretty(&JsonReport {
        pressure_kpa,
        result: outcome,
        chart,
    })
}

/// 텍스트 표를 쓴다.
pub fn write_text<W: Write>(out: &mut W, outcome: &Outcome, pressure_kpa: f64) -> io::Result<()> {
    writeln!(out, "대기압: {pressure_kpa:.2} kPa")?;
    match outcome {
        Outcome::State { state } => write_state(out, "상태점", state)?,
        Outcome::Process(r) => {
            write_state(out, "점 1", &r.initial)?;
            write_state(out, "점 2", &r.final_state)?;
            write_warnings(out, &r.warnings)?;
        }
        Outcome::Mixing(r) => {
            write_state(out, "기류 1", &r.stream_a)?;
            write_state(out, "기류 2", &r.stream_b)?;
            write_state(out, "혼합", &r.mixed)?;
            write_warnings(out, &r.warnings)?;
        }
        Outcome::Pressure { altitude_m, .. } => {
            writeln!(out, "고도: {altitude_m:.1} m")?;
        }
    }
    Ok(())
}

fn write_state<W: Write>(out: &mut W, title: &str, s: &StateRecord) -> io::Result<()> {
    writeln!(out, "\n-- {title} --")?;
    writeln!(out, "건구온도:        {:>10.2} °C", s.dry_bulb_c)?;
    writeln!(out, "습구온도:        {:>10.2} °C", s.wet_bulb_c)?;
    writeln!(out, "이슬점:          {:>10.2} °C", s.dew_point_c)?;
    writeln!(out, "상대습도:        {:>10.2} %", s.relative_humidity_pct)?;
    writeln!(out, "습도비:          {:>10.2} g/kg", s.humidity_ratio_g_per_kg)?;
    writeln!(out, "포화 수증기압:   {:>10.4} kPa", s.saturation_pressure_kpa)?;
    writeln!(out, "수증기 분압:     {:>10.4} kPa", s.vapor_pressure_kpa)?;
    writeln!(out, "비체적:          {:>10.4} m³/kg", s.specific_volume_m3_per_kg)?;
    writeln!(out, "비엔탈피:        {:>10.2} kJ/kg", s.enthalpy_kj_per_kg)?;
    if let Some(flow) = s.flow {
        writeln!(out, "체적 유량:       {:>10.2} m³/h", flow.volumetric_m3_per_h)?;
        writeln!(out, "건공기 유량:     {:>10.2} kg/h", flow.dry_air_kg_per_h)?;
    }
    Ok(())
}

fn write_warnings<W: Write>(out: &mut W, warnings: &[String]) -> io::Result<()> {
    for w in warnings {
        writeln!(out, "주의: {w}")?;
    }
    Ok(())
}
