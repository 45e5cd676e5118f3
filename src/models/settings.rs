//! # 앱 설정 모델
//!
//! 프로세스 전체에 하나만 존재하는 싱글턴 레코드입니다 (`appSettings` 키, 배열이 아닌 객체).
//! 처음 접근할 때 기본값으로 생성됩니다.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub company_name: String,
    /// ISO 통화 코드 (예: "INR")
    pub currency: String,
    /// 세율 (퍼센트, 예: 18)
    pub tax_rate: f64,
    pub print_settings: PrintSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            company_name: "PhotoKiosk Pro".to_string(),
            currency: "INR".to_string(),
            tax_rate: 18.0,
            print_settings: PrintSettings {
                quality: PrintQuality::High,
                paper_size: PaperSize::FourBySix,
            },
        }
    }
}

impl AppSettings {
    /// 영수증 표시에 쓰는 통화 기호. 모르는 통화는 코드 뒤에 공백을 붙여 그대로 씁니다.
    pub fn currency_symbol(&self) -> String {
        match self.currency.as_str() {
            "INR" => "₹".to_string(),
            "USD" => "$".to_string(),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            other => format!("{} ", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSettings {
    pub quality: PrintQuality,
    pub paper_size: PaperSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintQuality {
    Standard,
    High,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    #[serde(rename = "A4")]
    A4,
    #[serde(rename = "4x6")]
    FourBySix,
    #[serde(rename = "5x7")]
    FiveBySeven,
    #[serde(rename = "8x10")]
    EightByTen,
}
