//! 2점 공정과 기류 혼합 회귀 테스트.
use psychrometric_toolbox::air::{
    heating_cooling, humidify_to_dry_bulb, humidify_to_ratio, humidify_to_rh, mix_streams,
    PsychroError, SolverOptions, StreamInput,
};

const PATM: f64 = 101.325;

fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {tol})"
    );
}

fn opts() -> SolverOptions {
    SolverOptions::default()
}

#[test]
fn cooling_below_dew_point_condenses() {
    let r = heating_cooling(30.0, 80.0, 10.0, PATM, &opts()).expect("heat-cool");
    assert_close("W1", r.initial.humidity_ratio_g_per_kg, 21.57, 0.02);
    assert_close("tdp1", r.initial.dew_point_c, 26.18, 0.05);
    assert_close("rh2", r.final_state.relative_humidity_pct, 100.0, 1e-9);
    assert_close("W2", r.final_state.humidity_ratio_g_per_kg, 7.63, 0.02);
    assert_close("twb2", r.final_state.wet_bulb_c, 10.0, 0.0);
    assert_close("tdp2", r.final_state.dew_point_c, 10.0, 0.0);
    assert!(r.final_state.humidity_ratio_g_per_kg < r.initial.humidity_ratio_g_per_kg);
    assert_eq!(r.warnings.len(), 1);
}

#[test]
fn sensible_heating_keeps_humidity_ratio() {
    let r = heating_cooling(20.0, 50.0, 35.0, PATM, &opts()).expect("heat-cool");
    assert_close(
        "W",
        r.final_state.humidity_ratio_g_per_kg,
        r.initial.humidity_ratio_g_per_kg,
        1e-12,
    );
    assert_close("tdp", r.final_state.dew_point_c, r.initial.dew_point_c, 1e-12);
    assert!(r.final_state.relative_humidity_pct < r.initial.relative_humidity_pct);
    assert!(r.final_state.enthalpy_kj_per_kg > r.initial.enthalpy_kj_per_kg);
    assert!(r.final_state.wet_bulb_c > r.initial.wet_bulb_c);
    assert!(r.warnings.is_empty());
}

#[test]
fn humidify_to_dry_bulb_follows_constant_enthalpy() {
    let r = humidify_to_dry_bulb(30.0, 40.0, 22.0, PATM, &opts()).expect("humidify");
    assert_close("twb1", r.initial.wet_bulb_c, 19.96, 0.05);
    assert_close("t2", r.final_state.dry_bulb_c, 22.0, 0.0);
    assert_close("W2", r.final_state.humidity_ratio_g_per_kg, 13.83, 0.02);
    assert_close("rh2", r.final_state.relative_humidity_pct, 83.3, 0.2);
    assert_close(
        "h",
        r.final_state.enthalpy_kj_per_kg,
        r.initial.enthalpy_kj_per_kg,
        1e-12,
    );
    assert_close("twb2", r.final_state.wet_bulb_c, r.initial.wet_bulb_c, 1e-12);
}

#[test]
fn humidify_to_dry_bulb_below_wet_bulb_is_infeasible() {
    let err = humidify_to_dry_bulb(30.0, 40.0, 15.0, PATM, &opts()).unwrap_err();
    assert!(matches!(err, PsychroError::Infeasible(_)), "{err:?}");
}

#[test]
fn humidify_to_rh_reaches_target() {
    let r = humidify_to_rh(30.0, 40.0, 70.0, PATM, &opts()).expect("humidify");
    assert_close("rh2", r.final_state.relative_humidity_pct, 70.0, 0.1);
    assert_close("W2", r.final_state.humidity_ratio_g_per_kg, 13.05, 0.05);
    assert_close("t2", r.final_state.dry_bulb_c, 23.93, 0.05);
    assert_close(
        "h",
        r.final_state.enthalpy_kj_per_kg,
        r.initial.enthalpy_kj_per_kg,
        1e-12,
    );
}

#[test]
fn humidify_to_saturation_lands_on_wet_bulb() {
    let r = humidify_to_rh(30.0, 40.0, 100.0, PATM, &opts()).expect("humidify");
    assert!(r.final_state.is_saturated());
    assert_close("t2", r.final_state.dry_bulb_c, r.initial.wet_bulb_c, 0.0);
    assert_close("tdp2", r.final_state.dew_point_c, r.initial.wet_bulb_c, 0.0);
}

#[test]
fn humidify_to_lower_rh_is_infeasible() {
    let err = humidify_to_rh(30.0, 40.0, 20.0, PATM, &opts()).unwrap_err();
    assert!(matches!(err, PsychroError::Infeasible(_)), "{err:?}");
}

#[test]
fn humidify_to_ratio_moves_along_constant_enthalpy() {
    let r = humidify_to_ratio(20.0, 8.0, 10.0, PATM, &opts()).expect("humidify");
    assert_close("rh1", r.initial.relative_humidity_pct, 55.02, 0.05);
    assert_close("t2", r.final_state.dry_bulb_c, 15.04, 0.01);
    assert_close("rh2", r.final_state.relative_humidity_pct, 93.74, 0.05);
    assert_close("W2", r.final_state.humidity_ratio_g_per_kg, 10.0, 1e-9);
    assert!(r.warnings.is_empty());
}

#[test]
fn humidify_to_ratio_rejects_supersaturated_points() {
    match humidify_to_ratio(20.0, 30.0, 35.0, PATM, &opts()) {
        Err(PsychroError::Infeasible(msg)) => {
            assert_eq!(msg, "점 1의 습도비가 너무 높습니다(상대습도 100% 초과)")
        }
        other => panic!("unexpected: {other:?}"),
    }
    match humidify_to_ratio(20.0, 8.0, 12.0, PATM, &opts()) {
        Err(PsychroError::Infeasible(msg)) => {
            assert_eq!(msg, "점 2의 습도비가 너무 높습니다(상대습도 100% 초과)")
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn mixing_weights_by_dry_air_mass() {
    let a = StreamInput {
        dry_bulb_c: 32.0,
        rh_pct: 60.0,
        flow_m3_per_h: 1000.0,
    };
    let b = StreamInput {
        dry_bulb_c: 20.0,
        rh_pct: 40.0,
        flow_m3_per_h: 2000.0,
    };
    let r = mix_streams(&a, &b, PATM, &opts()).expect("mix");
    let fa = r.stream_a.flow.expect("flow a");
    let fb = r.stream_b.flow.expect("flow b");
    let fm = r.mixed.flow.expect("flow mixed");
    assert_close("m_a", fa.dry_air_kg_per_h, 1124.1, 0.5);
    assert_close("m_b", fb.dry_air_kg_per_h, 2385.9, 0.5);
    assert_close(
        "m_mix",
        fm.dry_air_kg_per_h,
        fa.dry_air_kg_per_h + fb.dry_air_kg_per_h,
        1e-6,
    );
    assert_close("t_mix", r.mixed.dry_bulb_c, 23.90, 0.02);
    assert_close("W_mix", r.mixed.humidity_ratio_g_per_kg, 9.714, 0.01);
    assert_close("h_mix", r.mixed.enthalpy_kj_per_kg, 48.75, 0.02);
    assert!(r.warnings.is_empty());
}

#[test]
fn mixing_rejects_non_positive_flow() {
    let a = StreamInput {
        dry_bulb_c: 25.0,
        rh_pct: 50.0,
        flow_m3_per_h: -1.0,
    };
    let err = mix_streams(&a, &a, PATM, &opts()).unwrap_err();
    assert!(matches!(err, PsychroError::InvalidInput(_)), "{err:?}");
}

#[test]
fn slight_cooling_of_near_saturated_air_stays_sensible() {
    let r = heating_cooling(20.0, 99.5, 19.95, PATM, &opts()).expect("heat-cool");
    assert_close(
        "W2",
        r.final_state.humidity_ratio_g_per_kg,
        r.initial.humidity_ratio_g_per_kg,
        1e-12,
    );
    assert!(r.final_state.relative_humidity_pct < 100.0);
    assert!(r.final_state.vapor_pressure_kpa < r.final_state.saturation_pressure_kpa);
    assert!(r.final_state.dew_point_c <= r.final_state.dry_bulb_c);
    assert!(r.warnings.is_empty(), "{:?}", r.warnings);
}

#[test]
fn cooling_past_saturation_never_adds_moisture() {
    let r = heating_cooling(20.0, 99.5, 19.5, PATM, &opts()).expect("heat-cool");
    assert_close("W1", r.initial.humidity_ratio_g_per_kg, 14.620, 0.005);
    assert_close("W2", r.final_state.humidity_ratio_g_per_kg, 14.236, 0.005);
    assert!(r.final_state.humidity_ratio_g_per_kg < r.initial.humidity_ratio_g_per_kg);
    assert_close("rh2", r.final_state.relative_humidity_pct, 100.0, 0.0);
    assert_eq!(r.warnings.len(), 1);
}

#[test]
fn dry_bulb_target_at_wet_bulb_lands_on_saturation() {
    let twb1 = humidify_to_dry_bulb(30.0, 40.0, 22.0, PATM, &opts())
        .expect("humidify")
        .initial
        .wet_bulb_c;
    for target in [twb1 - 0.009, twb1, twb1 + 0.005] {
        let r = humidify_to_dry_bulb(30.0, 40.0, target, PATM, &opts()).expect("humidify");
        let s = r.final_state;
        assert_close("t2", s.dry_bulb_c, twb1, 0.0);
        assert!(s.relative_humidity_pct <= 100.0, "rh2={}", s.relative_humidity_pct);
        assert!(s.vapor_pressure_kpa <= s.saturation_pressure_kpa);
        assert_close("h", s.enthalpy_kj_per_kg, r.initial.enthalpy_kj_per_kg, 1e-12);
    }
}

#[test]
fn humidification_searches_honour_iteration_budget() {
    let tight = SolverOptions {
        max_iterations: 2,
        wet_bulb_max_iterations: 200,
    };
    let err = humidify_to_dry_bulb(30.0, 40.0, 22.0, PATM, &tight).unwrap_err();
    assert!(matches!(err, PsychroError::NonConvergence { iterations: 2, .. }), "{err:?}");
    let err = humidify_to_rh(30.0, 40.0, 55.0, PATM, &tight).unwrap_err();
    assert!(matches!(err, PsychroError::NonConvergence { iterations: 2, .. }), "{err:?}");
}
