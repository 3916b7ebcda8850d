//! 습공기(사이크로메트릭) 계산 모듈 모음.
//! 물성 함수, 상태점 계산, 2점 공정, 기류 혼합, 고도-대기압 환산으로 구성한다.

pub mod error;
pub mod mixing;
pub mod point;
pub mod process;
pub mod properties;
pub mod site;
pub mod solver;
pub mod state;

pub use error::{PsychroError, PsychroResult};
pub use mixing::{mix_streams, MixingResult, StreamInput};
pub use point::{
    from_dry_bulb_dew_point, from_dry_bulb_rh, from_dry_bulb_vapor_pressure,
    from_dry_bulb_wet_bulb,
};
pub use process::{
    heating_cooling, humidify_to_dry_bulb, humidify_to_ratio, humidify_to_rh, ProcessResult,
};
pub use site::pressure_from_altitude;
pub use solver::SolverOptions;
pub use state::{StateRecord, StreamFlow};
