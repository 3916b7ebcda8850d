//! 습공기 물성 계산 엔진과 공기 조화 공정 시뮬레이터.
//! 핵심 계산 로직을 라이브러리로 분리하여 CLI 뿐 아니라 선도/GUI 확장도 쉽게 한다.

pub mod air;
pub mod app;
pub mod chart;
pub mod cli;
pub mod config;
pub mod report;
