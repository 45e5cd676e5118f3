//! # 입력 검증 규칙
//!
//! 저장소에 넣기 전에 엔티티 필드 제약을 검사하는 순수 함수들입니다.
//! 불리언을 돌려주는 대신 `ValidationError`(메시지 + 문제 필드 이름)를 반환하므로,
//! 호출자는 어느 필드가 잘못됐는지 사용자에게 그대로 보여줄 수 있습니다.
//!
//! 각 함수는 앞에서부터 검사하며 처음 실패한 규칙의 에러를 돌려줍니다.

use thiserror::Error;

use crate::models::{BundlePlan, Location, Photographer, Session};

/// 업로드 가능한 최대 파일 크기 (10 MiB)
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// 허용되는 이미지 MIME 타입 (`image/jpg`는 `image/jpeg`의 별칭)
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// 필드 단위 검증 실패
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    /// 문제가 된 필드 이름 (camelCase, 예: "photoLimit")
    pub field: Option<&'static str>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, field: &'static str) -> Self {
        Self {
            message: message.into(),
            field: Some(field),
        }
    }

    /// 특정 필드에 묶이지 않는 검증 실패
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }
}

pub type ValidationResult = Result<(), ValidationError>;

/// 세션: 이름은 공백 제거 후 3자 이상, 장소 필수, 사진작가 ID 필수
pub fn validate_session(session: &Session) -> ValidationResult {
    if session.name.trim().chars().count() < 3 {
        return Err(ValidationError::new(
            "Session name must be at least 3 characters long",
            "name",
        ));
    }
    if session.location.trim().is_empty() {
        return Err(ValidationError::new("Location is required", "location"));
    }
    if session.photographer_id.trim().is_empty() {
        return Err(ValidationError::new(
            "Photographer ID is required",
            "photographerId",
        ));
    }
    Ok(())
}

/// 사진작가: 이름 2자 이상, 이메일 형식, 비밀번호 6자 이상
pub fn validate_photographer(photographer: &Photographer) -> ValidationResult {
    if photographer.name.trim().chars().count() < 2 {
        return Err(ValidationError::new(
            "Name must be at least 2 characters long",
            "name",
        ));
    }
    if !is_valid_email(&photographer.email) {
        return Err(ValidationError::new(
            "Valid email address is required",
            "email",
        ));
    }
    if photographer.password.chars().count() < 6 {
        return Err(ValidationError::new(
            "Password must be at least 6 characters long",
            "password",
        ));
    }
    Ok(())
}

/// 요금제: 이름 2자 이상, 사진 수 1~50, 가격 0~10000
pub fn validate_bundle_plan(plan: &BundlePlan) -> ValidationResult {
    if plan.name.trim().chars().count() < 2 {
        return Err(ValidationError::new(
            "Plan name must be at least 2 characters long",
            "name",
        ));
    }
    if !(1..=50).contains(&plan.photo_limit) {
        return Err(ValidationError::new(
            "Photo limit must be between 1 and 50",
            "photoLimit",
        ));
    }
    if !(0..=10_000).contains(&plan.price) {
        return Err(ValidationError::new(
            "Price must be between 0 and 10000",
            "price",
        ));
    }
    Ok(())
}

pub fn validate_location(location: &Location) -> ValidationResult {
    if location.name.trim().chars().count() < 2 {
        return Err(ValidationError::new(
            "Location name must be at least 2 characters long",
            "name",
        ));
    }
    Ok(())
}

/// 주문: 최소 1장 선택, 요금제의 사진 수 상한 이하
pub fn validate_order(selected_photos: &[String], plan: &BundlePlan) -> ValidationResult {
    if selected_photos.is_empty() {
        return Err(ValidationError::new(
            "At least one photo must be selected",
            "selectedPhotos",
        ));
    }
    if selected_photos.len() as i64 > plan.photo_limit {
        return Err(ValidationError::new(
            format!(
                "Cannot select more than {} photos for this plan",
                plan.photo_limit
            ),
            "selectedPhotos",
        ));
    }
    Ok(())
}

/// 이미지 파일: MIME 타입을 먼저, 그 다음 크기를 검사합니다.
///
/// 두 규칙이 모두 어긋나도 타입 에러가 먼저 보고됩니다 (메시지가 다르므로 순서가 중요).
pub fn validate_image_file(content_type: &str, size: u64) -> ValidationResult {
    let content_type = content_type.trim().to_ascii_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err(ValidationError::new(
            "Only JPEG, PNG, and WEBP images are allowed",
            "type",
        ));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(ValidationError::new(
            "File size must be less than 10MB",
            "size",
        ));
    }
    Ok(())
}

/// 정확히 4자리 십진수인지
pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == 4 && pin.bytes().all(|b| b.is_ascii_digit())
}

/// 읽기 쉬운 세션 ID 형식: 대문자 영숫자 6~12자
pub fn is_valid_session_id(session_id: &str) -> bool {
    (6..=12).contains(&session_id.len())
        && session_id
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// `local@domain.tld` 형태인지 검사합니다. 공백과 두 번째 `@`는 허용하지 않습니다.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// 기존 이메일 목록과 대소문자 무시 비교로 중복을 검사합니다.
pub fn validate_unique_email<S: AsRef<str>>(email: &str, existing: &[S]) -> ValidationResult {
    let candidate = email.trim().to_lowercase();
    if existing
        .iter()
        .any(|e| e.as_ref().trim().to_lowercase() == candidate)
    {
        return Err(ValidationError::new("Email address already exists", "email"));
    }
    Ok(())
}

/// 자유 입력 텍스트에서 앞뒤 공백과 `<`, `>`를 제거합니다.
///
/// 주입 위험을 줄일 뿐 보안 경계는 아닙니다.
pub fn sanitize_input(input: &str) -> String {
    input.trim().chars().filter(|c| *c != '<' && *c != '>').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStatus;
    use chrono::Utc;

    fn plan(limit: i64, price: i64) -> BundlePlan {
        BundlePlan {
            id: "1".into(),
            name: "Basic".into(),
            photo_limit: limit,
            price,
            description: String::new(),
            is_active: true,
        }
    }

    fn session(name: &str, location: &str, photographer_id: &str) -> Session {
        Session {
            id: "S".into(),
            name: name.into(),
            location: location.into(),
            pin: "1234".into(),
            photographer_id: photographer_id.into(),
            created_at: Utc::now(),
            photos: Vec::new(),
            status: SessionStatus::Active,
        }
    }

    #[test]
    fn session_rules_report_the_offending_field() {
        assert!(validate_session(&session("Smith Family", "Beach Resort", "p1")).is_ok());
        assert_eq!(
            validate_session(&session("  ab  ", "Beach", "p1")).unwrap_err().field,
            Some("name")
        );
        assert_eq!(
            validate_session(&session("Smith", "   ", "p1")).unwrap_err().field,
            Some("location")
        );
        assert_eq!(
            validate_session(&session("Smith", "Beach", "")).unwrap_err().field,
            Some("photographerId")
        );
    }

    #[test]
    fn bundle_plan_bounds() {
        assert!(validate_bundle_plan(&plan(1, 0)).is_ok());
        assert!(validate_bundle_plan(&plan(50, 10_000)).is_ok());
        assert_eq!(validate_bundle_plan(&plan(0, 100)).unwrap_err().field, Some("photoLimit"));
        assert_eq!(validate_bundle_plan(&plan(51, 100)).unwrap_err().field, Some("photoLimit"));
        assert_eq!(validate_bundle_plan(&plan(5, 10_001)).unwrap_err().field, Some("price"));
        assert_eq!(validate_bundle_plan(&plan(5, -1)).unwrap_err().field, Some("price"));
    }

    #[test]
    fn order_limit_message_names_the_limit() {
        let ids: Vec<String> = (0..3).map(|i| i.to_string()).collect();
        let err = validate_order(&ids, &plan(2, 100)).unwrap_err();
        assert!(err.message.contains('2'), "{}", err.message);
        assert!(validate_order(&ids[..2], &plan(2, 100)).is_ok());
        assert!(validate_order(&[], &plan(2, 100)).is_err());
    }

    #[test]
    fn image_type_is_checked_before_size() {
        let err = validate_image_file("application/pdf", 20 * 1024 * 1024).unwrap_err();
        assert_eq!(err.field, Some("type"));

        let err = validate_image_file("image/jpeg", 11 * 1024 * 1024).unwrap_err();
        assert_eq!(err.field, Some("size"));

        assert!(validate_image_file("image/jpg", 9 * 1024 * 1024).is_ok());
        assert!(validate_image_file("IMAGE/WEBP", MAX_IMAGE_BYTES).is_ok());
    }

    #[test]
    fn pin_and_session_id_formats() {
        assert!(is_valid_pin("0420"));
        assert!(!is_valid_pin("123"));
        assert!(!is_valid_pin("12a4"));
        assert!(is_valid_session_id("SMITH123456"));
        assert!(!is_valid_session_id("smith123456"));
        assert!(!is_valid_session_id("ABC12"));
        assert!(!is_valid_session_id("ABCDEFGHIJKLM"));
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("john@photo.com"));
        assert!(!is_valid_email("john@photo"));
        assert!(!is_valid_email("john@.com"));
        assert!(!is_valid_email("jo hn@photo.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn unique_email_ignores_case() {
        let existing = vec!["John@Photo.com".to_string()];
        assert!(validate_unique_email("john@photo.com", &existing).is_err());
        assert!(validate_unique_email("jane@photo.com", &existing).is_ok());
    }

    #[test]
    fn sanitize_strips_angle_brackets() {
        assert_eq!(sanitize_input("  <b>Smith</b> "), "bSmith/b");
    }
}
