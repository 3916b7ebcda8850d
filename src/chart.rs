//! 사이크로메트릭 선도 데이터.
//!
//! 그리기는 외부(GUI/웹)에서 담당하고, 여기서는 계산 결과를 그대로 담은 페이로드와
//! 선도 배경 곡선(포화곡선, 등상대습도선, 등엔탈피선)의 표본점만 만든다.
//! 상태점은 계산기 결과를 직접 쓰며 다시 풀지 않는다.

use serde::Serialize;

use crate::air::properties::{
    dry_bulb_from_enthalpy, humidity_ratio_from_vapor_pressure, saturation_pressure_kpa,
    vapor_pressure_from_ratio,
};
use crate::air::{MixingResult, ProcessResult, StateRecord};

/// 기본 건구온도 창 [°C]
const DEFAULT_DRY_BULB_MIN: f64 = 10.0;
const DEFAULT_DRY_BULB_MAX: f64 = 50.0;
/// 고온 입력 시 창 하한 [°C]
const WIDE_DRY_BULB_MIN: f64 = 15.0;
/// 습도비 축 상한 [g/kg]
pub const HUMIDITY_RATIO_MAX_G_PER_KG: f64 = 30.0;
const CURVE_SAMPLES: usize = 100;
const ENTHALPY_LINE_SAMPLES: usize = 50;
const RH_CURVES_PCT: [u32; 9] = [10, 20, 30, 40, 50, 60, 70, 80, 90];

/// 선도에 표시할 계산 결과.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartPayload {
    Point {
        state: StateRecord,
    },
    Process {
        initial: StateRecord,
        #[serde(rename = "final")]
        final_state: StateRecord,
    },
    Mixing {
        stream_a: StateRecord,
        stream_b: StateRecord,
        mixed: StateRecord,
    },
}

impl ChartPayload {
    /// 페이로드에 포함된 상태점들.
    pub fn states(&self) -> Vec<&StateRecord> {
        match self {
            ChartPayload::Point { state } => vec![state],
            ChartPayload::Process {
                initial,
                final_state,
            } => vec![initial, final_state],
            ChartPayload::Mixing {
                stream_a,
                stream_b,
                mixed,
            } => vec![stream_a, stream_b, mixed],
        }
    }
}

impl From<&StateRecord> for ChartPayload {
    fn from(state: &StateRecord) -> Self {
        ChartPayload::Point { state: *state }
    }
}

impl From<&ProcessResult> for ChartPayload {
    fn from(result: &ProcessResult) -> Self {
        ChartPayload::Process {
            initial: result.initial,
            final_state: result.final_state,
        }
    }
}

impl From<&MixingResult> for ChartPayload {
    fn from(result: &MixingResult) -> Self {
        ChartPayload::Mixing {
            stream_a: result.stream_a,
            stream_b: result.stream_b,
            mixed: result.mixed,
        }
    }
}

/// 곡선 위의 한 점. 좌축은 수증기 분압, 우축은 습도비이다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub dry_bulb_c: f64,
    pub vapor_pressure_kpa: f64,
    pub humidity_ratio_g_per_kg: f64,
}

/// 라벨이 붙은 곡선.
#[derive(Debug, Clone, Serialize)]
pub struct Curve {
    /// 등상대습도선이면 %, 등엔탈피선이면 kJ/kg
    pub value: f64,
    pub points: Vec<CurvePoint>,
}

/// 선도 한 장을 그리는 데 필요한 데이터.
#[derive(Debug, Clone, Serialize)]
pub struct ChartFrame {
    pub pressure_kpa: f64,
    pub dry_bulb_min_c: f64,
    pub dry_bulb_max_c: f64,
    pub humidity_ratio_max_g_per_kg: f64,
    pub saturation: Vec<CurvePoint>,
    pub rh_curves: Vec<Curve>,
    pub enthalpy_lines: Vec<Curve>,
    pub payload: ChartPayload,
}

impl ChartFrame {
    /// 페이로드의 상태점에 맞춘 온도 창으로 배경 곡선을 표본화한다.
    pub fn for_payload(payload: ChartPayload, pressure_kpa: f64) -> Self {
        let max_input = payload
            .states()
            .iter()
            .map(|s| s.dry_bulb_c)
            .fold(0.0_f64, f64::max);
        let (t_min, t_max) = dry_bulb_window(max_input);
        let temperatures = linspace(t_min, t_max, CURVE_SAMPLES);

        let saturation = temperatures
            .iter()
            .filter_map(|&t| curve_point(t, saturation_pressure_kpa(t), pressure_kpa))
            .collect();

        let rh_curves = RH_CURVES_PCT
            .iter()
            .map(|&pct| Curve {
                value: f64::from(pct),
                points: temperatures
                    .iter()
                    .filter_map(|&t| {
                        let p = saturation_pressure_kpa(t) * f64::from(pct) / 100.0;
                        curve_point(t, p, pressure_kpa)
                    })
                    .collect(),
            })
            .collect();

        let enthalpy_lines = enthalpy_values(t_max)
            .into_iter()
            .filter_map(|h| {
                let points: Vec<CurvePoint> = linspace(
                    0.001,
                    HUMIDITY_RATIO_MAX_G_PER_KG / 1000.0,
                    ENTHALPY_LINE_SAMPLES,
                )
                .into_iter()
                .filter_map(|w| {
                    let t = dry_bulb_from_enthalpy(h, w);
                    (t_min..=t_max).contains(&t).then(|| CurvePoint {
                        dry_bulb_c: t,
                        vapor_pressure_kpa: vapor_pressure_from_ratio(w, pressure_kpa),
                        humidity_ratio_g_per_kg: w * 1000.0,
                    })
                })
                .collect();
                (points.len() > 1).then_some(Curve { value: h, points })
            })
            .collect();

        Self {
            pressure_kpa,
            dry_bulb_min_c: t_min,
            dry_bulb_max_c: t_max,
            humidity_ratio_max_g_per_kg: HUMIDITY_RATIO_MAX_G_PER_KG,
            saturation,
            rh_curves,
            enthalpy_lines,
            payload,
        }
    }
}

/// 50 °C 를 넘는 상태점이 있으면 창을 15 °C ~ (최고온도 + 5 °C)로 넓힌다.
fn dry_bulb_window(max_input_c: f64) -> (f64, f64) {
    if max_input_c > DEFAULT_DRY_BULB_MAX {
        (WIDE_DRY_BULB_MIN, max_input_c + 5.0)
    } else {
        (DEFAULT_DRY_BULB_MIN, DEFAULT_DRY_BULB_MAX)
    }
}

fn enthalpy_values(t_max: f64) -> Vec<f64> {
    let (start, end, step): (u32, u32, usize) = if t_max > DEFAULT_DRY_BULB_MAX {
        (20, 300, 20)
    } else {
        (20, 150, 10)
    };
    (start..end).step_by(step).map(f64::from).collect()
}

/// 분압이 대기압 이상인 점(습도비 발산)은 버린다.
fn curve_point(t: f64, p: f64, pressure_kpa: f64) -> Option<CurvePoint> {
    (p < pressure_kpa).then(|| CurvePoint {
        dry_bulb_c: t,
        vapor_pressure_kpa: p,
        humidity_ratio_g_per_kg: humidity_ratio_from_vapor_pressure(p, pressure_kpa) * 1000.0,
    })
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}
