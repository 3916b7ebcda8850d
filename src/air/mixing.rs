//! 두 기류의 단열 혼합.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::{PsychroError, PsychroResult};
use super::point::{
    check_partial_pressure, check_pressure, check_temperature, parts_from_dry_bulb_rh,
    rh_input_fraction, StateParts,
};
use super::properties::{
    dew_point_or_dry_bulb, dry_bulb_from_enthalpy, relative_humidity, saturation_pressure_kpa,
    vapor_pressure_from_ratio, wet_bulb_c,
};
use super::solver::SolverOptions;
use super::state::StateRecord;

/// 혼합 기류 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamInput {
    /// 건구온도 [°C]
    pub dry_bulb_c: f64,
    /// 상대습도 [%]
    pub rh_pct: f64,
    /// 체적 유량 [m³/h]
    pub flow_m3_per_h: f64,
}

/// 혼합 결과. 세 상태점 모두 유량 정보를 가진다.
#[derive(Debug, Clone, Serialize)]
pub struct MixingResult {
    pub stream_a: StateRecord,
    pub stream_b: StateRecord,
    pub mixed: StateRecord,
    /// 경고/주의 메시지
    pub warnings: Vec<String>,
}

fn resolve_stream(
    label: &'static str,
    input: &StreamInput,
    patm_kpa: f64,
    options: &SolverOptions,
) -> PsychroResult<(StateParts, StateRecord)> {
    check_temperature(label, input.dry_bulb_c)?;
    if !input.flow_m3_per_h.is_finite() || input.flow_m3_per_h <= 0.0 {
        return Err(PsychroError::InvalidInput(format!(
            "{label} 유량은 0보다 커야 합니다: {} m³/h",
            input.flow_m3_per_h
        )));
    }
    let rh = rh_input_fraction(input.rh_pct)?;
    let parts = parts_from_dry_bulb_rh(input.dry_bulb_c, rh, patm_kpa, options)?;
    let record = parts
        .into_record(patm_kpa)
        .with_volumetric_flow(input.flow_m3_per_h);
    Ok((parts, record))
}

/// 두 기류를 혼합한다.
///
/// 습도비와 비엔탈피는 체적 유량이 아닌 건공기 질량 유량으로 가중 평균하고, 혼합 건구온도는
/// 혼합 비엔탈피와 습도비에서 역산한다. 혼합 체적 유량 = 혼합 건공기 질량 × 혼합 비체적.
pub fn mix_streams(
    a: &StreamInput,
    b: &StreamInput,
    patm_kpa: f64,
    options: &SolverOptions,
) -> PsychroResult<MixingResult> {
    check_pressure(patm_kpa)?;
    let (pa, ra) = resolve_stream("기류 1", a, patm_kpa, options)?;
    let (pb, rb) = resolve_stream("기류 2", b, patm_kpa, options)?;

    let ma = ra.flow.map_or(0.0, |f| f.dry_air_kg_per_h);
    let mb = rb.flow.map_or(0.0, |f| f.dry_air_kg_per_h);
    let m = ma + mb;
    let w = (ma * pa.w + mb * pb.w) / m;
    let h = (ma * pa.h_kj_per_kg + mb * pb.h_kj_per_kg) / m;

    let t = dry_bulb_from_enthalpy(h, w);
    let p_sat = saturation_pressure_kpa(t);
    let p = vapor_pressure_from_ratio(w, patm_kpa);
    check_partial_pressure(p, patm_kpa)?;
    let rh = relative_humidity(p, p_sat);

    let mut warnings = Vec::new();
    if rh > 1.0 {
        warn!(rh, "혼합 공기가 과포화 상태");
        warnings.push(format!(
            "혼합 공기의 상대습도가 {:.2}% 로 과포화입니다. 실제로는 안개(응축)가 생깁니다.",
            rh * 100.0
        ));
    }

    let mixed = StateParts {
        dry_bulb_c: t,
        wet_bulb_c: wet_bulb_c(t, h, patm_kpa, options)?,
        dew_point_c: dew_point_or_dry_bulb(t, p, rh),
        rh,
        w,
        p_sat_kpa: p_sat,
        p_kpa: p,
        h_kj_per_kg: h,
    }
    .into_record(patm_kpa);
    let mixed = mixed.with_volumetric_flow(m * mixed.specific_volume_m3_per_kg);

    Ok(MixingResult {
        stream_a: ra,
        stream_b: rb,
        mixed,
        warnings,
    })
}
