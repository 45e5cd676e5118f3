//! # 요금제(Bundle Plan) 모델
//!
//! 고객이 고를 수 있는 사진 수 상한(`photo_limit`)과 가격을 묶은 패키지입니다.
//! 대부분 읽기 전용 참조 데이터이며, 사진 선택 단계에서 선택 개수를 제한하는 데 쓰입니다.

use serde::{Deserialize, Serialize};

use crate::db::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlePlan {
    pub id: String,
    pub name: String,
    /// 선택 가능한 최대 사진 수 (1~50)
    pub photo_limit: i64,
    /// 가격 (0~10000, 통화 단위 정수)
    pub price: i64,
    pub description: String,
    pub is_active: bool,
}

impl Record for BundlePlan {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.id.as_str()]
    }
}

/// 요금제 생성 요청: `POST /api/v1/bundle-plans`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBundlePlanRequest {
    pub name: String,
    pub photo_limit: i64,
    pub price: i64,
    #[serde(default)]
    pub description: String,
    /// 생략하면 활성 상태로 생성
    pub is_active: Option<bool>,
}
