//! 습공기 물성 함수 모음.
//!
//! 모든 함수는 순수 함수이며 온도는 °C, 압력은 kPa, 습도비는 kg/kg(소수)를 사용한다.
//! g/kg 환산은 상태점 계산기(`point`, `process`)에서만 수행한다.

use tracing::debug;

use super::error::{PsychroError, PsychroResult};
use super::solver::{bisect, Probe, SolverOptions};

/// 절대온도 환산 오프셋. 삼중점 기준(273.16)을 그대로 사용한다.
pub const KELVIN_OFFSET: f64 = 273.16;
/// 물/건공기 분자량비
pub const MOLAR_MASS_RATIO: f64 = 0.62198;
/// 건공기 기체상수 [kJ/(kg·K)]
pub const DRY_AIR_GAS_CONSTANT: f64 = 0.28705;
/// 지원 온도 범위 [°C]
pub const MIN_TEMPERATURE_C: f64 = -100.0;
pub const MAX_TEMPERATURE_C: f64 = 372.0;

const CP_DRY_AIR: f64 = 1.006;
const CP_VAPOR: f64 = 1.775;
const LATENT_HEAT_0C: f64 = 2501.0;

/// 습구온도 판정 구간 [하한, 상한)
const WET_BULB_RH_LOW: f64 = 0.999;
const WET_BULB_RH_HIGH: f64 = 1.0;

/// 포화 수증기압 [kPa].
///
/// 삼중점 초과 구간은 Hyland-Wexler 형태의 6항 상관식, 이하 구간은 얼음 상관식을 쓴다.
/// 두 식 사이 보간은 하지 않는다.
pub fn saturation_pressure_kpa(t_c: f64) -> f64 {
    let t = t_c + KELVIN_OFFSET;
    if t > KELVIN_OFFSET {
        let aux = -7511.52 / t + 89.63121 + 0.023998970 * t - 1.1654551e-5 * t.powi(2)
            - 1.2810336e-8 * t.powi(3)
            + 2.0998405e-11 * t.powi(4)
            - 12.150799 * t.ln();
        aux.exp()
    } else {
        (24.2779 - 6238.64 / t - 0.344438 * t.ln()).exp()
    }
}

/// 수증기 분압으로부터 습도비 [kg/kg]. 호출 측에서 p < patm 을 보장해야 한다.
pub fn humidity_ratio_from_vapor_pressure(p_kpa: f64, patm_kpa: f64) -> f64 {
    MOLAR_MASS_RATIO * p_kpa / (patm_kpa - p_kpa)
}

/// 건구/습구온도와 습구온도에서의 포화 습도비로 습도비 [kg/kg]를 구한다.
pub fn humidity_ratio_from_wet_bulb(dry_bulb_c: f64, wet_bulb_c: f64, w_sat_wet_bulb: f64) -> f64 {
    let numerator = (LATENT_HEAT_0C - 2.411 * wet_bulb_c) * w_sat_wet_bulb
        - CP_DRY_AIR * (dry_bulb_c - wet_bulb_c);
    let denominator = LATENT_HEAT_0C + CP_VAPOR * dry_bulb_c - 4.186 * wet_bulb_c;
    numerator / denominator
}

/// 상대습도(소수). 표시용 % 변환은 호출 측에서 한다.
pub fn relative_humidity(p_kpa: f64, p_sat_kpa: f64) -> f64 {
    p_kpa / p_sat_kpa
}

/// 비엔탈피 [kJ/kg 건공기].
pub fn enthalpy_kj_per_kg(t_c: f64, w: f64) -> f64 {
    CP_DRY_AIR * t_c + w * (LATENT_HEAT_0C + CP_VAPOR * t_c)
}

/// 습도비로부터 수증기 분압 [kPa].
pub fn vapor_pressure_from_ratio(w: f64, patm_kpa: f64) -> f64 {
    patm_kpa * w / (MOLAR_MASS_RATIO + w)
}

/// 이슬점 온도 [°C]. p > 0 에서만 유효하다.
///
/// 포화에 가까운 경우 상관식이 불안정하므로 호출 측에서 건구온도로 대체한다.
pub fn dew_point_c(p_kpa: f64) -> f64 {
    let a = (p_kpa * 10.0).log10();
    (186.4905 - 237.3 * a) / (a - 8.2859)
}

/// 비엔탈피와 습도비로부터 건구온도 [°C].
pub fn dry_bulb_from_enthalpy(h_kj_per_kg: f64, w: f64) -> f64 {
    (h_kj_per_kg - LATENT_HEAT_0C * w) / (CP_DRY_AIR + CP_VAPOR * w)
}

/// 비체적 [m³/kg 건공기].
pub fn specific_volume_m3_per_kg(t_c: f64, w: f64, patm_kpa: f64) -> f64 {
    DRY_AIR_GAS_CONSTANT * (t_c + KELVIN_OFFSET) / patm_kpa * (1.0 + 1.6078 * w)
}

/// 후보 습구온도 `th`에서 같은 엔탈피를 갖는 포화 습공기의 상대습도(소수).
///
/// `th`가 낮아질수록 값이 커진다.
fn implied_rh_at_wet_bulb(th: f64, h_kj_per_kg: f64, patm_kpa: f64) -> f64 {
    let w = (h_kj_per_kg - CP_DRY_AIR * th) / (LATENT_HEAT_0C + CP_VAPOR * th);
    let ps = saturation_pressure_kpa(th);
    (patm_kpa * w) / (ps * (MOLAR_MASS_RATIO + w))
}

fn classify_wet_bulb(rh: f64) -> Probe {
    if rh >= WET_BULB_RH_HIGH {
        // 과포화: 해는 더 높은 온도 쪽
        Probe::Raise
    } else if rh < WET_BULB_RH_LOW {
        Probe::Lower
    } else {
        Probe::Accept
    }
}

/// 습구온도 [°C].
///
/// 후보 습구온도에서의 내재 상대습도가 [0.999, 1.0) 에 들어오면 수렴으로 본다.
/// 상한은 건구온도, 하한은 간격을 두 배씩 넓혀 가며 과포화 지점을 찾은 뒤 이분법으로 좁힌다.
pub fn wet_bulb_c(
    dry_bulb_c: f64,
    h_kj_per_kg: f64,
    patm_kpa: f64,
    options: &SolverOptions,
) -> PsychroResult<f64> {
    let at_dry_bulb = implied_rh_at_wet_bulb(dry_bulb_c, h_kj_per_kg, patm_kpa);
    if at_dry_bulb >= WET_BULB_RH_LOW {
        // 포화(또는 수치상 과포화) 상태: 습구 = 건구
        return Ok(dry_bulb_c);
    }

    let hi = dry_bulb_c;
    let mut lo = dry_bulb_c - 0.1;
    let mut step = 0.1;
    let mut expansions = 0;
    loop {
        match classify_wet_bulb(implied_rh_at_wet_bulb(lo, h_kj_per_kg, patm_kpa)) {
            Probe::Accept => return Ok(lo),
            Probe::Raise => break,
            Probe::Lower => {
                expansions += 1;
                if expansions > options.wet_bulb_max_iterations
                    || lo < MIN_TEMPERATURE_C - 100.0
                {
                    return Err(PsychroError::NonConvergence {
                        what: "습구온도 구간 탐색",
                        iterations: expansions,
                    });
                }
                step *= 2.0;
                lo = dry_bulb_c - step;
            }
        }
    }

    let th = bisect(
        "습구온도",
        lo,
        hi,
        options.wet_bulb_max_iterations,
        |th| classify_wet_bulb(implied_rh_at_wet_bulb(th, h_kj_per_kg, patm_kpa)),
    )?;
    debug!(dry_bulb_c, wet_bulb_c = th, "습구온도 수렴");
    Ok(th)
}

/// 이슬점을 계산하되 포화 근처(상대습도 ≥ 99%)에서는 건구온도로 대체한다.
pub fn dew_point_or_dry_bulb(dry_bulb_c: f64, p_kpa: f64, rh: f64) -> f64 {
    if rh >= 0.99 {
        dry_bulb_c
    } else {
        dew_point_c(p_kpa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn saturation_pressure_reference_points() {
        assert_abs_diff_eq!(saturation_pressure_kpa(25.0), 3.1689, epsilon = 1e-3);
        assert_abs_diff_eq!(saturation_pressure_kpa(100.0), 101.36, epsilon = 0.05);
        // 얼음 구간
        assert_abs_diff_eq!(saturation_pressure_kpa(-10.0), 0.2597, epsilon = 2e-3);
    }

    #[test]
    fn branches_meet_near_triple_point() {
        let below = saturation_pressure_kpa(0.0);
        let above = saturation_pressure_kpa(1e-9);
        assert!((below - above).abs() < 5e-3, "below={below} above={above}");
    }

    #[test]
    fn vapor_pressure_and_ratio_are_inverse() {
        let patm = 101.325;
        let w = humidity_ratio_from_vapor_pressure(1.585, patm);
        assert_abs_diff_eq!(vapor_pressure_from_ratio(w, patm), 1.585, epsilon = 1e-12);
    }

    #[test]
    fn dry_bulb_inverts_enthalpy() {
        let h = enthalpy_kj_per_kg(31.5, 0.012);
        assert_abs_diff_eq!(dry_bulb_from_enthalpy(h, 0.012), 31.5, epsilon = 1e-10);
    }

    #[test]
    fn dew_point_of_saturation_pressure_is_temperature() {
        let p = saturation_pressure_kpa(20.0);
        assert_abs_diff_eq!(dew_point_c(p), 20.0, epsilon = 0.01);
    }

    #[test]
    fn wet_bulb_lies_between_dew_point_and_dry_bulb() {
        let patm = 101.325;
        let p = 0.5 * saturation_pressure_kpa(25.0);
        let w = humidity_ratio_from_vapor_pressure(p, patm);
        let h = enthalpy_kj_per_kg(25.0, w);
        let twb = wet_bulb_c(25.0, h, patm, &SolverOptions::default()).expect("wet bulb");
        assert!(twb < 25.0 && twb > dew_point_c(p), "twb={twb}");
        assert_abs_diff_eq!(twb, 17.82, epsilon = 0.05);
        let rh = implied_rh_at_wet_bulb(twb, h, patm);
        assert!((0.999..1.0).contains(&rh), "rh={rh}");
    }

    #[test]
    fn wet_bulb_of_saturated_air_is_dry_bulb() {
        let patm = 101.325;
        let w = humidity_ratio_from_vapor_pressure(saturation_pressure_kpa(15.0), patm);
        let h = enthalpy_kj_per_kg(15.0, w);
        let twb = wet_bulb_c(15.0, h, patm, &SolverOptions::default()).expect("wet bulb");
        assert_abs_diff_eq!(twb, 15.0, epsilon = 1e-12);
    }

    #[test]
    fn wet_bulb_reports_non_convergence_with_tiny_budget() {
        let patm = 101.325;
        let h = enthalpy_kj_per_kg(60.0, 0.001);
        let options = SolverOptions {
            wet_bulb_max_iterations: 1,
            ..SolverOptions::default()
        };
        let err = wet_bulb_c(60.0, h, patm, &options).unwrap_err();
        assert!(matches!(err, PsychroError::NonConvergence { .. }), "{err:?}");
    }
}
