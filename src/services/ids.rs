//! # 식별자 생성기
//!
//! 세션/사진/주문 ID와 4자리 PIN을 만듭니다.
//!
//! - `generate_id()`: UUIDv7 (밀리초 타임스탬프 + 랜덤 비트). 한 프로세스 안에서 사실상 유일.
//! - `generate_pin()`: 1000~9999 범위의 균등 난수. 세션 간 중복은 허용됩니다 (데모용 입장 코드).
//! - `generate_session_readable_id()`: 이름 기반의 사람이 기억하기 쉬운 세션 ID.

use chrono::Utc;
use rand_core::{OsRng, RngCore};

const PIN_MIN: u32 = 1000;
const PIN_SPAN: u32 = 9000;

/// 새 엔티티 ID를 생성합니다.
pub fn generate_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// 4자리 PIN을 생성합니다.
///
/// 나머지 연산의 편향을 피하려고, `PIN_SPAN`의 배수 범위를 벗어난 난수는 버리고 다시 뽑습니다.
pub fn generate_pin() -> String {
    let zone = u32::MAX - (u32::MAX % PIN_SPAN);
    loop {
        let n = OsRng.next_u32();
        if n < zone {
            return (PIN_MIN + n % PIN_SPAN).to_string();
        }
    }
}

/// 이름에서 영숫자만 남겨 대문자로 바꾼 앞 6글자 + 현재 밀리초 타임스탬프의 마지막 6자리
///
/// 예: "Smith Family" → "SMITHF" + "123456" → "SMITHF123456"
pub fn generate_session_readable_id(name: &str) -> String {
    let prefix: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(6)
        .collect();
    format!("{}{}", prefix, timestamp_suffix(Utc::now().timestamp_millis()))
}

fn timestamp_suffix(millis: i64) -> String {
    format!("{:06}", millis.rem_euclid(1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validation;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_across_many_calls() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn pins_are_four_digits_in_range() {
        for _ in 0..500 {
            let pin = generate_pin();
            assert!(validation::is_valid_pin(&pin), "bad pin {}", pin);
            let n: u32 = pin.parse().unwrap();
            assert!((1000..=9999).contains(&n));
        }
    }

    #[test]
    fn readable_id_strips_and_uppercases_name() {
        let id = generate_session_readable_id("Smith Family!");
        assert!(id.starts_with("SMITHF"));
        assert_eq!(id.len(), 12);
        assert!(validation::is_valid_session_id(&id));
    }

    #[test]
    fn readable_id_without_alphanumerics_is_only_the_suffix() {
        let id = generate_session_readable_id("!!! ---");
        assert_eq!(id.len(), 6);
        assert!(id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn timestamp_suffix_keeps_last_six_digits() {
        assert_eq!(timestamp_suffix(1_718_000_123_456), "123456");
        assert_eq!(timestamp_suffix(42), "000042");
    }
}
