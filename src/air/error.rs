/// 습공기 계산 결과 타입.
pub type PsychroResult<T> = Result<T, PsychroError>;

/// 습공기 상태/공정 계산 시 발생 가능한 오류.
///
/// 모든 오류는 한 번의 계산 요청에 국한되며 복구 가능하다.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PsychroError {
    /// 물리적으로 성립하지 않는 입력값(대기압 ≤ 0, 상대습도 ≤ 0 등)
    #[error("입력 오류: {0}")]
    InvalidInput(String),
    /// 지원 범위를 벗어난 값
    #[error("범위를 벗어남: {name}={value} (허용 {min} ~ {max})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// 입력 조합으로는 도달할 수 없는 상태(상대습도 100% 초과 등)
    #[error("계산 불가: {0}")]
    Infeasible(String),
    /// 반복 계산이 최대 반복 횟수 안에 수렴하지 않음
    #[error("{what} 계산이 {iterations}회 반복 후에도 수렴하지 않았습니다")]
    NonConvergence {
        what: &'static str,
        iterations: usize,
    },
}
