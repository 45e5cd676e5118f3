//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `admin`: 관리자 계정
//! - `bundle_plan`: 요금제(사진 수 상한 + 가격)
//! - `location`: 촬영 장소
//! - `order`: 주문, 주문 상태 머신, 사진 편집 기록
//! - `photographer`: 사진작가 계정
//! - `print`: 인쇄 대기열 항목
//! - `session`: 촬영 세션과 세션에 포함된 사진
//! - `settings`: 앱 설정 싱글턴
//!
//! 영속 포맷과 API 본문은 모두 camelCase JSON입니다.

pub mod admin;
pub mod bundle_plan;
pub mod location;
pub mod order;
pub mod photographer;
pub mod print;
pub mod session;
pub mod settings;

pub use admin::*;
pub use bundle_plan::*;
pub use location::*;
pub use order::*;
pub use photographer::*;
pub use print::*;
pub use session::*;
pub use settings::*;
