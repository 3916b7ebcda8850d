//! 독립 물성 두 개와 대기압으로 상태점 전체를 계산한다.

use super::error::{PsychroError, PsychroResult};
use super::properties::{
    dew_point_or_dry_bulb, enthalpy_kj_per_kg, humidity_ratio_from_vapor_pressure,
    humidity_ratio_from_wet_bulb, relative_humidity, saturation_pressure_kpa,
    specific_volume_m3_per_kg, vapor_pressure_from_ratio, wet_bulb_c, MAX_TEMPERATURE_C,
    MIN_TEMPERATURE_C,
};
use super::solver::SolverOptions;
use super::state::StateRecord;

/// 상대습도 입력 상한 [%]. 100% 이상은 이 값으로 낮춰 계산한다.
pub const MAX_INPUT_RH_PCT: f64 = 99.999;
/// 건구온도 = 이슬점일 때 사용하는 관례상 상대습도(소수)
const DEW_POINT_SATURATED_RH: f64 = 0.999999;

/// 계산기 내부에서 조립하는 상태값. 습도비는 kg/kg.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StateParts {
    pub dry_bulb_c: f64,
    pub wet_bulb_c: f64,
    pub dew_point_c: f64,
    pub rh: f64,
    pub w: f64,
    pub p_sat_kpa: f64,
    pub p_kpa: f64,
    pub h_kj_per_kg: f64,
}

impl StateParts {
    /// g/kg, % 환산과 비체적 계산을 거쳐 레코드로 만든다.
    pub(crate) fn into_record(self, patm_kpa: f64) -> StateRecord {
        StateRecord {
            dry_bulb_c: self.dry_bulb_c,
            wet_bulb_c: self.wet_bulb_c,
            dew_point_c: self.dew_point_c,
            relative_humidity_pct: self.rh * 100.0,
            humidity_ratio_g_per_kg: self.w * 1000.0,
            saturation_pressure_kpa: self.p_sat_kpa,
            vapor_pressure_kpa: self.p_kpa,
            specific_volume_m3_per_kg: specific_volume_m3_per_kg(
                self.dry_bulb_c,
                self.w,
                patm_kpa,
            ),
            enthalpy_kj_per_kg: self.h_kj_per_kg,
            flow: None,
        }
    }
}

/// 대기압이 양수이며 유한한지 확인한다.
pub(crate) fn check_pressure(patm_kpa: f64) -> PsychroResult<()> {
    if !patm_kpa.is_finite() || patm_kpa <= 0.0 {
        return Err(PsychroError::InvalidInput(format!(
            "대기압은 0보다 커야 합니다: {patm_kpa} kPa"
        )));
    }
    Ok(())
}

/// 온도가 지원 범위(-100 ~ 372 °C) 안에 있는지 확인한다.
pub(crate) fn check_temperature(name: &'static str, t_c: f64) -> PsychroResult<()> {
    if !(MIN_TEMPERATURE_C..=MAX_TEMPERATURE_C).contains(&t_c) {
        return Err(PsychroError::OutOfRange {
            name,
            value: t_c,
            min: MIN_TEMPERATURE_C,
            max: MAX_TEMPERATURE_C,
        });
    }
    Ok(())
}

/// 수증기 분압이 대기압보다 작은지 확인한다(습도비 분모 patm − p).
pub(crate) fn check_partial_pressure(p_kpa: f64, patm_kpa: f64) -> PsychroResult<()> {
    if p_kpa >= patm_kpa {
        return Err(PsychroError::InvalidInput(format!(
            "수증기 분압({p_kpa:.4} kPa)이 대기압({patm_kpa:.4} kPa) 이상입니다"
        )));
    }
    Ok(())
}

/// 상대습도 입력(%)을 소수로 바꾼다. 100% 이상은 99.999%로 낮춘다.
pub(crate) fn rh_input_fraction(rh_pct: f64) -> PsychroResult<f64> {
    if !rh_pct.is_finite() || rh_pct <= 0.0 {
        return Err(PsychroError::InvalidInput(format!(
            "상대습도는 0%보다 커야 합니다: {rh_pct}"
        )));
    }
    Ok(rh_pct.min(MAX_INPUT_RH_PCT) / 100.0)
}

/// 건구온도 + 상대습도(%).
pub fn from_dry_bulb_rh(
    dry_bulb_c: f64,
    rh_pct: f64,
    patm_kpa: f64,
    options: &SolverOptions,
) -> PsychroResult<StateRecord> {
    check_pressure(patm_kpa)?;
    check_temperature("건구온도", dry_bulb_c)?;
    let rh = rh_input_fraction(rh_pct)?;
    Ok(parts_from_dry_bulb_rh(dry_bulb_c, rh, patm_kpa, options)?.into_record(patm_kpa))
}

/// 검증을 마친 입력(상대습도 소수)으로 상태값을 조립한다. 공정 계산기가 재사용한다.
pub(crate) fn parts_from_dry_bulb_rh(
    dry_bulb_c: f64,
    rh: f64,
    patm_kpa: f64,
    options: &SolverOptions,
) -> PsychroResult<StateParts> {
    let p_sat = saturation_pressure_kpa(dry_bulb_c);
    let p = rh * p_sat;
    check_partial_pressure(p, patm_kpa)?;
    let w = humidity_ratio_from_vapor_pressure(p, patm_kpa);
    let h = enthalpy_kj_per_kg(dry_bulb_c, w);
    let wet_bulb = wet_bulb_c(dry_bulb_c, h, patm_kpa, options)?;
    Ok(StateParts {
        dry_bulb_c,
        wet_bulb_c: wet_bulb,
        dew_point_c: dew_point_or_dry_bulb(dry_bulb_c, p, rh),
        rh,
        w,
        p_sat_kpa: p_sat,
        p_kpa: p,
        h_kj_per_kg: h,
    })
}

/// 건구온도 + 습구온도.
pub fn from_dry_bulb_wet_bulb(
    dry_bulb_c: f64,
    wet_bulb: f64,
    patm_kpa: f64,
) -> PsychroResult<StateRecord> {
    check_pressure(patm_kpa)?;
    check_temperature("건구온도", dry_bulb_c)?;
    check_temperature("습구온도", wet_bulb)?;
    if wet_bulb > dry_bulb_c {
        return Err(PsychroError::InvalidInput(format!(
            "습구온도({wet_bulb} °C)는 건구온도({dry_bulb_c} °C)보다 높을 수 없습니다"
        )));
    }

    let p_sat = saturation_pressure_kpa(dry_bulb_c);
    let parts = if wet_bulb == dry_bulb_c {
        // 완전 포화
        check_partial_pressure(p_sat, patm_kpa)?;
        let w = humidity_ratio_from_vapor_pressure(p_sat, patm_kpa);
        StateParts {
            dry_bulb_c,
            wet_bulb_c: wet_bulb,
            dew_point_c: dry_bulb_c,
            rh: 1.0,
            w,
            p_sat_kpa: p_sat,
            p_kpa: p_sat,
            h_kj_per_kg: enthalpy_kj_per_kg(dry_bulb_c, w),
        }
    } else {
        let p_sat_wet = saturation_pressure_kpa(wet_bulb);
        check_partial_pressure(p_sat_wet, patm_kpa)?;
        let w_sat_wet = humidity_ratio_from_vapor_pressure(p_sat_wet, patm_kpa);
        let w = humidity_ratio_from_wet_bulb(dry_bulb_c, wet_bulb, w_sat_wet);
        if w <= 0.0 {
            return Err(PsychroError::Infeasible(format!(
                "습구온도 {wet_bulb} °C 는 건구온도 {dry_bulb_c} °C 에 비해 너무 낮습니다(습도비 ≤ 0)"
            )));
        }
        let p = vapor_pressure_from_ratio(w, patm_kpa);
        let rh = relative_humidity(p, p_sat);
        StateParts {
            dry_bulb_c,
            wet_bulb_c: wet_bulb,
            dew_point_c: dew_point_or_dry_bulb(dry_bulb_c, p, rh),
            rh,
            w,
            p_sat_kpa: p_sat,
            p_kpa: p,
            h_kj_per_kg: enthalpy_kj_per_kg(dry_bulb_c, w),
        }
    };
    Ok(parts.into_record(patm_kpa))
}

/// 건구온도 + 이슬점.
pub fn from_dry_bulb_dew_point(
    dry_bulb_c: f64,
    dew_point: f64,
    patm_kpa: f64,
    options: &SolverOptions,
) -> PsychroResult<StateRecord> {
    check_pressure(patm_kpa)?;
    check_temperature("건구온도", dry_bulb_c)?;
    check_temperature("이슬점", dew_point)?;
    if dew_point > dry_bulb_c {
        return Err(PsychroError::InvalidInput(format!(
            "이슬점({dew_point} °C)은 건구온도({dry_bulb_c} °C)보다 높을 수 없습니다"
        )));
    }

    let p_sat = saturation_pressure_kpa(dry_bulb_c);
    let parts = if dew_point == dry_bulb_c {
        check_partial_pressure(p_sat, patm_kpa)?;
        let w = humidity_ratio_from_vapor_pressure(p_sat, patm_kpa);
        StateParts {
            dry_bulb_c,
            wet_bulb_c: dry_bulb_c,
            dew_point_c: dew_point,
            rh: DEW_POINT_SATURATED_RH,
            w,
            p_sat_kpa: p_sat,
            p_kpa: p_sat,
            h_kj_per_kg: enthalpy_kj_per_kg(dry_bulb_c, w),
        }
    } else {
        let p = saturation_pressure_kpa(dew_point);
        check_partial_pressure(p, patm_kpa)?;
        let w = humidity_ratio_from_vapor_pressure(p, patm_kpa);
        let h = enthalpy_kj_per_kg(dry_bulb_c, w);
        StateParts {
            dry_bulb_c,
            wet_bulb_c: wet_bulb_c(dry_bulb_c, h, patm_kpa, options)?,
            dew_point_c: dew_point,
            rh: relative_humidity(p, p_sat),
            w,
            p_sat_kpa: p_sat,
            p_kpa: p,
            h_kj_per_kg: h,
        }
    };
    Ok(parts.into_record(patm_kpa))
}

/// 건구온도 + 수증기 분압. 선도 위 좌표(x=건구온도, y=분압)를 상태점으로 바꿀 때 쓴다.
pub fn from_dry_bulb_vapor_pressure(
    dry_bulb_c: f64,
    p_kpa: f64,
    patm_kpa: f64,
    options: &SolverOptions,
) -> PsychroResult<StateRecord> {
    check_pressure(patm_kpa)?;
    check_temperature("건구온도", dry_bulb_c)?;
    if !p_kpa.is_finite() || p_kpa <= 0.0 {
        return Err(PsychroError::InvalidInput(format!(
            "수증기 분압은 0보다 커야 합니다: {p_kpa} kPa"
        )));
    }
    check_partial_pressure(p_kpa, patm_kpa)?;

    let p_sat = saturation_pressure_kpa(dry_bulb_c);
    let rh = relative_humidity(p_kpa, p_sat);
    if rh > 1.0 {
        return Err(PsychroError::Infeasible(format!(
            "수증기 분압 {p_kpa:.4} kPa 가 {dry_bulb_c} °C 의 포화 수증기압 {p_sat:.4} kPa 를 넘습니다"
        )));
    }
    let w = humidity_ratio_from_vapor_pressure(p_kpa, patm_kpa);
    let h = enthalpy_kj_per_kg(dry_bulb_c, w);
    let parts = StateParts {
        dry_bulb_c,
        wet_bulb_c: wet_bulb_c(dry_bulb_c, h, patm_kpa, options)?,
        dew_point_c: dew_point_or_dry_bulb(dry_bulb_c, p_kpa, rh),
        rh,
        w,
        p_sat_kpa: p_sat,
        p_kpa,
        h_kj_per_kg: h,
    };
    Ok(parts.into_record(patm_kpa))
}
