//! 2점 공기 조화 공정: 가열/냉각, 단열 가습(목표 건구온도·상대습도·습도비).
//!
//! 공통 흐름은 점 1을 먼저 완전히 계산한 뒤, 공정별 보존량을 유지하며 점 2를 찾는 것이다.
//! 단열 가습은 비엔탈피를 보존하고, 점 2의 습구온도는 점 1과 같다.

use serde::Serialize;
use tracing::{debug, warn};

use super::error::{PsychroError, PsychroResult};
use super::point::{
    check_partial_pressure, check_pressure, check_temperature, parts_from_dry_bulb_rh,
    rh_input_fraction, StateParts,
};
use super::properties::{
    dew_point_c, dew_point_or_dry_bulb, dry_bulb_from_enthalpy, enthalpy_kj_per_kg,
    humidity_ratio_from_vapor_pressure, relative_humidity, saturation_pressure_kpa,
    vapor_pressure_from_ratio, wet_bulb_c,
};
use super::solver::{bisect, Probe, SolverOptions};
use super::state::StateRecord;

/// 목표 건구온도 허용오차 [°C]
pub const DRY_BULB_TOLERANCE_C: f64 = 0.01;
/// 목표 상대습도 허용오차 [소수]
pub const RH_TOLERANCE: f64 = 0.001;
/// 이 값 이상의 목표 상대습도는 습구온도선 위의 포화점으로 맞춘다.
const SNAP_TO_SATURATION_RH: f64 = 0.99;
/// 습도비 목표 공정에서 포화 경계에 맞춘 점의 상대습도(소수)
const RATIO_TARGET_SATURATED_RH: f64 = 0.99999;

/// 2점 공정 결과.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    /// 공정 시작점
    pub initial: StateRecord,
    /// 공정 종료점
    #[serde(rename = "final")]
    pub final_state: StateRecord,
    /// 경고/주의 메시지
    pub warnings: Vec<String>,
}

/// 점 1(건구온도 + 상대습도 %)을 검증 후 계산한다.
fn resolve_initial(
    dry_bulb_c: f64,
    rh_pct: f64,
    patm_kpa: f64,
    options: &SolverOptions,
) -> PsychroResult<StateParts> {
    check_pressure(patm_kpa)?;
    check_temperature("건구온도 1", dry_bulb_c)?;
    let rh = rh_input_fraction(rh_pct)?;
    parts_from_dry_bulb_rh(dry_bulb_c, rh, patm_kpa, options)
}

/// 습구온도선 위의 포화점. 단열 가습의 한계 상태이다.
fn saturated_on_wet_bulb_line(
    initial: &StateParts,
    rh: f64,
    patm_kpa: f64,
) -> PsychroResult<StateParts> {
    let t = initial.wet_bulb_c;
    let p_sat = saturation_pressure_kpa(t);
    check_partial_pressure(p_sat, patm_kpa)?;
    Ok(StateParts {
        dry_bulb_c: t,
        wet_bulb_c: t,
        dew_point_c: t,
        rh,
        w: humidity_ratio_from_vapor_pressure(p_sat, patm_kpa),
        p_sat_kpa: p_sat,
        p_kpa: p_sat,
        h_kj_per_kg: initial.h_kj_per_kg,
    })
}

/// 등엔탈피선 위에서 습도비 `w`에 해당하는 상태값. 습구온도는 점 1 값을 그대로 쓴다.
fn on_constant_enthalpy(
    initial: &StateParts,
    dry_bulb_c: f64,
    w: f64,
    patm_kpa: f64,
) -> StateParts {
    let p_sat = saturation_pressure_kpa(dry_bulb_c);
    let p = vapor_pressure_from_ratio(w, patm_kpa);
    let rh = relative_humidity(p, p_sat);
    StateParts {
        dry_bulb_c,
        wet_bulb_c: initial.wet_bulb_c,
        dew_point_c: dew_point_or_dry_bulb(dry_bulb_c, p, rh),
        rh,
        w,
        p_sat_kpa: p_sat,
        p_kpa: p,
        h_kj_per_kg: initial.h_kj_per_kg,
    }
}

/// 등엔탈피 탐색 구간의 습도비 상한. 이 값에서 건구온도는 점 1의 습구온도 아래로 내려간다.
fn saturation_ratio_bound(initial: &StateParts, patm_kpa: f64) -> PsychroResult<f64> {
    let p_sat = saturation_pressure_kpa(initial.wet_bulb_c);
    check_partial_pressure(p_sat, patm_kpa)?;
    Ok(humidity_ratio_from_vapor_pressure(p_sat, patm_kpa) * 1.05 + 1e-4)
}

/// 현열 가열/냉각.
///
/// 목표 건구온도의 포화 수증기압이 점 1의 수증기 분압보다 크면 습도비를 보존한다.
/// 그렇지 않으면 포화곡선을 넘은 것이므로 응축으로 보고 점 2를 목표 건구온도의
/// 포화곡선(상대습도 100%) 위에 둔다. 이 경우 습도비는 점 1보다 작다.
pub fn heating_cooling(
    dry_bulb_1_c: f64,
    rh_1_pct: f64,
    dry_bulb_2_c: f64,
    patm_kpa: f64,
    options: &SolverOptions,
) -> PsychroResult<ProcessResult> {
    let p1 = resolve_initial(dry_bulb_1_c, rh_1_pct, patm_kpa, options)?;
    check_temperature("건구온도 2", dry_bulb_2_c)?;

    let mut warnings = Vec::new();
    let p_sat_2 = saturation_pressure_kpa(dry_bulb_2_c);
    // 표시용 이슬점(포화 근처에서 건구온도로 대체)이 아닌 분압으로 판정한다
    let p2 = if p_sat_2 > p1.p_kpa {
        let h = enthalpy_kj_per_kg(dry_bulb_2_c, p1.w);
        let rh = relative_humidity(p1.p_kpa, p_sat_2);
        StateParts {
            dry_bulb_c: dry_bulb_2_c,
            wet_bulb_c: wet_bulb_c(dry_bulb_2_c, h, patm_kpa, options)?,
            dew_point_c: dew_point_or_dry_bulb(dry_bulb_2_c, p1.p_kpa, rh),
            rh,
            w: p1.w,
            p_sat_kpa: p_sat_2,
            p_kpa: p1.p_kpa,
            h_kj_per_kg: h,
        }
    } else {
        check_partial_pressure(p_sat_2, patm_kpa)?;
        let w = humidity_ratio_from_vapor_pressure(p_sat_2, patm_kpa);
        warnings.push(format!(
            "목표 건구온도 {dry_bulb_2_c:.2} °C 가 이슬점 {:.2} °C 이하이므로 응축이 발생합니다 (습도비 {:.2} → {:.2} g/kg).",
            dew_point_c(p1.p_kpa),
            p1.w * 1000.0,
            w * 1000.0
        ));
        StateParts {
            dry_bulb_c: dry_bulb_2_c,
            wet_bulb_c: dry_bulb_2_c,
            dew_point_c: dry_bulb_2_c,
            rh: 1.0,
            w,
            p_sat_kpa: p_sat_2,
            p_kpa: p_sat_2,
            h_kj_per_kg: enthalpy_kj_per_kg(dry_bulb_2_c, w),
        }
    };

    Ok(ProcessResult {
        initial: p1.into_record(patm_kpa),
        final_state: p2.into_record(patm_kpa),
        warnings,
    })
}

/// 단열 가습: 목표 건구온도.
///
/// 비엔탈피를 고정하고 (h, W)가 주는 건구온도가 목표의 0.01 °C 안에 들 때까지 습도비를
/// 이분법으로 찾는다. 목표가 점 1의 습구온도보다 낮으면 도달할 수 없고, 습구온도와
/// 허용오차 안에서 같으면 점 2는 습구온도선 위의 포화점이다.
pub fn humidify_to_dry_bulb(
    dry_bulb_1_c: f64,
    rh_1_pct: f64,
    dry_bulb_2_c: f64,
    patm_kpa: f64,
    options: &SolverOptions,
) -> PsychroResult<ProcessResult> {
    let p1 = resolve_initial(dry_bulb_1_c, rh_1_pct, patm_kpa, options)?;
    check_temperature("건구온도 2", dry_bulb_2_c)?;

    if dry_bulb_2_c < p1.wet_bulb_c - DRY_BULB_TOLERANCE_C {
        return Err(PsychroError::Infeasible(format!(
            "목표 건구온도 {dry_bulb_2_c:.2} °C 가 습구온도 {:.2} °C 보다 낮아 단열 가습으로 도달할 수 없습니다",
            p1.wet_bulb_c
        )));
    }
    let dry_limit = dry_bulb_from_enthalpy(p1.h_kj_per_kg, 0.0);
    if dry_bulb_2_c > dry_limit + DRY_BULB_TOLERANCE_C {
        return Err(PsychroError::Infeasible(format!(
            "목표 건구온도 {dry_bulb_2_c:.2} °C 가 건공기 한계 {dry_limit:.2} °C 를 넘습니다"
        )));
    }

    if dry_bulb_2_c < p1.wet_bulb_c + DRY_BULB_TOLERANCE_C {
        // 허용오차 안에서 습구온도와 같은 목표는 단열 포화점 그 자체이다
        let p2 = saturated_on_wet_bulb_line(&p1, 1.0, patm_kpa)?;
        return Ok(ProcessResult {
            initial: p1.into_record(patm_kpa),
            final_state: p2.into_record(patm_kpa),
            warnings: Vec::new(),
        });
    }

    let h = p1.h_kj_per_kg;
    let w_hi = saturation_ratio_bound(&p1, patm_kpa)?;
    let w2 = bisect("단열 가습(건구온도)", 0.0, w_hi, options.max_iterations, |w| {
        let t = dry_bulb_from_enthalpy(h, w);
        if (t - dry_bulb_2_c).abs() < DRY_BULB_TOLERANCE_C {
            Probe::Accept
        } else if t > dry_bulb_2_c {
            // 습도비가 커질수록 건구온도는 내려간다
            Probe::Raise
        } else {
            Probe::Lower
        }
    })?;
    debug!(w1 = p1.w, w2, "단열 가습(건구온도) 수렴");

    let mut warnings = Vec::new();
    if w2 < p1.w {
        warnings.push(format!(
            "목표 건구온도가 초기값보다 높아 습도비가 감소합니다 ({:.2} → {:.2} g/kg).",
            p1.w * 1000.0,
            w2 * 1000.0
        ));
    }
    let p2 = on_constant_enthalpy(&p1, dry_bulb_2_c, w2, patm_kpa);
    Ok(ProcessResult {
        initial: p1.into_record(patm_kpa),
        final_state: p2.into_record(patm_kpa),
        warnings,
    })
}

/// 단열 가습: 목표 상대습도(%).
///
/// 목표가 99% 이상이면 점 1의 습구온도에서 포화된 점으로 맞춘다. 그 외에는 등엔탈피선을
/// 따라 습도비를 늘리며 상대습도가 목표의 0.001 안에 들 때까지 이분법으로 찾는다.
pub fn humidify_to_rh(
    dry_bulb_1_c: f64,
    rh_1_pct: f64,
    rh_2_pct: f64,
    patm_kpa: f64,
    options: &SolverOptions,
) -> PsychroResult<ProcessResult> {
    let p1 = resolve_initial(dry_bulb_1_c, rh_1_pct, patm_kpa, options)?;
    let target = rh_input_fraction(rh_2_pct)?;
    if target < p1.rh - RH_TOLERANCE {
        return Err(PsychroError::Infeasible(format!(
            "목표 상대습도 {rh_2_pct:.2}% 가 초기 상대습도 {:.2}% 보다 낮습니다. 단열 가습은 상대습도를 높이기만 합니다",
            p1.rh * 100.0
        )));
    }

    let p2 = if target >= SNAP_TO_SATURATION_RH {
        saturated_on_wet_bulb_line(&p1, 1.0, patm_kpa)?
    } else {
        let h = p1.h_kj_per_kg;
        let w_hi = saturation_ratio_bound(&p1, patm_kpa)?;
        let w2 = bisect("단열 가습(상대습도)", p1.w, w_hi, options.max_iterations, |w| {
            let t = dry_bulb_from_enthalpy(h, w);
            let rh = vapor_pressure_from_ratio(w, patm_kpa) / saturation_pressure_kpa(t);
            if (rh - target).abs() < RH_TOLERANCE {
                Probe::Accept
            } else if rh < target {
                Probe::Raise
            } else {
                Probe::Lower
            }
        })?;
        debug!(w1 = p1.w, w2, "단열 가습(상대습도) 수렴");
        on_constant_enthalpy(&p1, dry_bulb_from_enthalpy(h, w2), w2, patm_kpa)
    };

    Ok(ProcessResult {
        initial: p1.into_record(patm_kpa),
        final_state: p2.into_record(patm_kpa),
        warnings: Vec::new(),
    })
}

/// 단열 가습: 목표 습도비. 두 습도비는 g/kg 으로 받는다.
///
/// 점 2의 건구온도는 보존된 비엔탈피와 목표 습도비에서 바로 구한다. 어느 한 점이라도
/// 상대습도 100%를 넘으면 `Infeasible`을 반환한다.
pub fn humidify_to_ratio(
    dry_bulb_1_c: f64,
    ratio_1_g_per_kg: f64,
    ratio_2_g_per_kg: f64,
    patm_kpa: f64,
    options: &SolverOptions,
) -> PsychroResult<ProcessResult> {
    check_pressure(patm_kpa)?;
    check_temperature("건구온도 1", dry_bulb_1_c)?;
    for (label, value) in [("습도비 1", ratio_1_g_per_kg), ("습도비 2", ratio_2_g_per_kg)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(PsychroError::InvalidInput(format!(
                "{label}는 0보다 커야 합니다: {value} g/kg"
            )));
        }
    }
    let w1 = ratio_1_g_per_kg / 1000.0;
    let w2 = ratio_2_g_per_kg / 1000.0;

    let p_sat_1 = saturation_pressure_kpa(dry_bulb_1_c);
    let p_1 = vapor_pressure_from_ratio(w1, patm_kpa);
    let rh_1 = relative_humidity(p_1, p_sat_1);
    if rh_1 > 1.0 {
        return Err(PsychroError::Infeasible(
            "점 1의 습도비가 너무 높습니다(상대습도 100% 초과)".into(),
        ));
    }
    let h = enthalpy_kj_per_kg(dry_bulb_1_c, w1);
    let p1 = StateParts {
        dry_bulb_c: dry_bulb_1_c,
        wet_bulb_c: wet_bulb_c(dry_bulb_1_c, h, patm_kpa, options)?,
        dew_point_c: dew_point_or_dry_bulb(dry_bulb_1_c, p_1, rh_1),
        rh: rh_1,
        w: w1,
        p_sat_kpa: p_sat_1,
        p_kpa: p_1,
        h_kj_per_kg: h,
    };

    let dry_bulb_2_c = dry_bulb_from_enthalpy(h, w2);
    check_temperature("건구온도 2", dry_bulb_2_c)?;
    let candidate = on_constant_enthalpy(&p1, dry_bulb_2_c, w2, patm_kpa);
    if candidate.rh > 1.0 {
        return Err(PsychroError::Infeasible(
            "점 2의 습도비가 너무 높습니다(상대습도 100% 초과)".into(),
        ));
    }
    let p2 = if candidate.rh >= 1.0 {
        saturated_on_wet_bulb_line(&p1, RATIO_TARGET_SATURATED_RH, patm_kpa)?
    } else {
        candidate
    };

    let mut warnings = Vec::new();
    if w2 < w1 {
        warn!(w1, w2, "습도비 목표 공정에서 습도비가 감소함");
        warnings.push(format!(
            "목표 습도비 {ratio_2_g_per_kg:.2} g/kg 가 초기값 {ratio_1_g_per_kg:.2} g/kg 보다 작습니다."
        ));
    }
    Ok(ProcessResult {
        initial: p1.into_record(patm_kpa),
        final_state: p2.into_record(patm_kpa),
        warnings,
    })
}
