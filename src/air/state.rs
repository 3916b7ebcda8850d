use serde::Serialize;

/// 혼합 공정에서 각 기류가 갖는 유량 정보.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StreamFlow {
    /// 체적 유량 [m³/h]
    pub volumetric_m3_per_h: f64,
    /// 건공기 질량 유량 [kg/h]
    pub dry_air_kg_per_h: f64,
}

/// 대기압 하나에서 완전히 결정된 습공기 상태점.
///
/// 습도비는 g/kg 으로 보관한다. 물성 함수(kg/kg)와의 환산은 계산기 경계에서만 한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateRecord {
    /// 건구온도 [°C]
    pub dry_bulb_c: f64,
    /// 습구온도 [°C]
    pub wet_bulb_c: f64,
    /// 이슬점 온도 [°C]
    pub dew_point_c: f64,
    /// 상대습도 [%]
    pub relative_humidity_pct: f64,
    /// 습도비 [g/kg 건공기]
    pub humidity_ratio_g_per_kg: f64,
    /// 포화 수증기압 [kPa]
    pub saturation_pressure_kpa: f64,
    /// 수증기 분압 [kPa]
    pub vapor_pressure_kpa: f64,
    /// 비체적 [m³/kg 건공기]
    pub specific_volume_m3_per_kg: f64,
    /// 비엔탈피 [kJ/kg 건공기]
    pub enthalpy_kj_per_kg: f64,
    /// 혼합 기류일 때만 채워지는 유량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<StreamFlow>,
}

impl StateRecord {
    /// 습도비 [kg/kg].
    pub fn humidity_ratio(&self) -> f64 {
        self.humidity_ratio_g_per_kg / 1000.0
    }

    /// 상대습도 [소수].
    pub fn relative_humidity(&self) -> f64 {
        self.relative_humidity_pct / 100.0
    }

    /// 상대습도가 99% 이상이면 포화로 본다.
    pub fn is_saturated(&self) -> bool {
        self.relative_humidity() >= 0.99
    }

    /// 체적 유량을 붙인 기류 상태를 만든다. 건공기 질량 유량 = Q / v.
    pub fn with_volumetric_flow(mut self, volumetric_m3_per_h: f64) -> Self {
        self.flow = Some(StreamFlow {
            volumetric_m3_per_h,
            dry_air_kg_per_h: volumetric_m3_per_h / self.specific_volume_m3_per_kg,
        });
        self
    }
}
