//! # 비즈니스 로직 모듈
//!
//! HTTP 핸들러와 저장소 사이에서 도메인 규칙을 처리합니다.
//!
//! - `ids`: 엔티티 ID / PIN / 읽기 쉬운 세션 ID 생성
//! - `validation`: 입력 검증 규칙
//! - `uploads`: 사진 업로드 처리와 object URL 레지스트리
//! - `checkout`: 주문 작업 상태, 주문 상태 머신, 영수증
//! - `print_queue`: 인쇄 대기열과 프린터 기능
//! - `editor`: 외부 이미지 편집기 어댑터

pub mod checkout;
pub mod editor;
pub mod ids;
pub mod print_queue;
pub mod uploads;
pub mod validation;
