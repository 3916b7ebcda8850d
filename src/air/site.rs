use super::error::{PsychroError, PsychroResult};

/// 해수면 기준 대기압 [kPa] (기압식 상수)
const SEA_LEVEL_KPA: f64 = 101.324;
const LAPSE_COEFF: f64 = 2.2556e-5;
const EXPONENT: f64 = 5.2559;

/// 기압식 적용 범위 [m]. 대류권 안으로 제한한다.
pub const MIN_ALTITUDE_M: f64 = -500.0;
pub const MAX_ALTITUDE_M: f64 = 11_000.0;

/// 고도로부터 대기압 [kPa]을 구한다.
///
/// P = 101.324 · (1 − 2.2556e-5 · z)^5.2559
pub fn pressure_from_altitude(altitude_m: f64) -> PsychroResult<f64> {
    if !(MIN_ALTITUDE_M..=MAX_ALTITUDE_M).contains(&altitude_m) {
        return Err(PsychroError::OutOfRange {
            name: "고도",
            value: altitude_m,
            min: MIN_ALTITUDE_M,
            max: MAX_ALTITUDE_M,
        });
    }
    Ok(SEA_LEVEL_KPA * (1.0 - LAPSE_COEFF * altitude_m).powf(EXPONENT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sea_level_and_mountain_site() {
        assert_abs_diff_eq!(pressure_from_altitude(0.0).unwrap(), 101.324, epsilon = 1e-12);
        // 1500 m 에서 약 84.5 kPa
        assert_abs_diff_eq!(pressure_from_altitude(1500.0).unwrap(), 84.55, epsilon = 0.05);
    }

    #[test]
    fn rejects_altitude_above_troposphere() {
        assert!(pressure_from_altitude(12_000.0).is_err());
    }
}
