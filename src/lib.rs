//! # photokiosk
//!
//! 사진관 키오스크 백엔드 라이브러리입니다.
//! 사진작가가 촬영 세션을 만들고 사진을 올리면, 고객이 세션 ID와 PIN으로 들어와
//! 요금제 한도 안에서 사진을 고르고 편집해 주문하고, 주문은 인쇄 대기열로 넘어갑니다.
//!
//! 서버 바이너리(`main.rs`)와 통합 테스트(`tests/`)가 같은 모듈을 공유하도록
//! 라이브러리로 분리되어 있습니다.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
