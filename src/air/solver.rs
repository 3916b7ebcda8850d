use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{PsychroError, PsychroResult};

/// 반복 계산 한도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// 가습 공정의 습도비 탐색 최대 반복 횟수
    pub max_iterations: usize,
    /// 습구온도 탐색(구간 확장 + 이분법) 최대 반복 횟수
    pub wet_bulb_max_iterations: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            wet_bulb_max_iterations: 200,
        }
    }
}

/// 후보값 판정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// 수렴 조건을 만족
    Accept,
    /// 해가 후보값보다 크다
    Raise,
    /// 해가 후보값보다 작다
    Lower,
}

/// 구간 [lo, hi] 안에서 `probe`가 `Accept`를 반환할 때까지 이분법으로 좁힌다.
///
/// 수렴 판정은 전적으로 `probe`가 담당하므로, 허용오차는 호출 측의 판정식이 결정한다.
pub fn bisect<F>(
    what: &'static str,
    mut lo: f64,
    mut hi: f64,
    max_iterations: usize,
    mut probe: F,
) -> PsychroResult<f64>
where
    F: FnMut(f64) -> Probe,
{
    if !(lo.is_finite() && hi.is_finite()) || lo > hi {
        return Err(PsychroError::InvalidInput(format!(
            "{what} 탐색 구간이 올바르지 않습니다: [{lo}, {hi}]"
        )));
    }
    for iteration in 1..=max_iterations {
        let mid = 0.5 * (lo + hi);
        match probe(mid) {
            Probe::Accept => {
                debug!(what, iteration, value = mid, "이분법 수렴");
                return Ok(mid);
            }
            Probe::Raise => lo = mid,
            Probe::Lower => hi = mid,
        }
        if hi - lo <= f64::EPSILON * mid.abs().max(1.0) {
            // 구간이 부동소수 해상도 아래로 줄었는데도 판정을 통과하지 못함
            break;
        }
    }
    Err(PsychroError::NonConvergence {
        what,
        iterations: max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn finds_square_root() {
        let root = bisect("sqrt", 0.0, 4.0, 100, |x| {
            let r = x * x - 2.0;
            if r.abs() < 1e-9 {
                Probe::Accept
            } else if r < 0.0 {
                Probe::Raise
            } else {
                Probe::Lower
            }
        })
        .expect("root");
        assert_abs_diff_eq!(root, 2f64.sqrt(), epsilon = 1e-8);
    }

    #[test]
    fn stops_at_iteration_cap() {
        let err = bisect("never", 0.0, 1.0, 10, |_| Probe::Raise).unwrap_err();
        assert_eq!(
            err,
            PsychroError::NonConvergence {
                what: "never",
                iterations: 10
            }
        );
    }

    #[test]
    fn rejects_reversed_bracket() {
        let err = bisect("bad", 2.0, 1.0, 10, |_| Probe::Accept).unwrap_err();
        assert!(matches!(err, PsychroError::InvalidInput(_)));
    }
}
