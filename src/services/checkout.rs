//! # 주문 / 체크아웃 흐름
//!
//! 고객 화면의 흐름은 다음과 같습니다:
//!
//! ```text
//! 요금제 선택 → 사진 선택(상한까지) → 사진 편집 → 주문 생성(pending) → 결제(paid) → 인쇄(printed)
//! ```
//!
//! - `CheckoutDraft`: 주문이 만들어지기 전까지의 작업 상태. 저장하지 않고 메모리에만 둡니다.
//! - `Checkout`: 주문 생성과 상태 전이, 영수증 투영을 담당하는 서비스.
//!
//! ## 가격 정책
//! 주문 금액은 **요금제의 고정 가격**입니다 (`totalAmount = plan.price`).
//! 사진을 상한보다 적게 골라도 금액은 같습니다.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::Store;
use crate::error::AppError;
use crate::models::*;
use crate::services::editor::{self, ImageEditor};
use crate::services::{ids, validation};
use crate::services::validation::ValidationError;

/// 주문 전 작업 상태 (세션 하나당 하나)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutDraft {
    pub session_id: String,
    plan: Option<BundlePlan>,
    selected: Vec<String>,
    edits: BTreeMap<String, EditedPhoto>,
    customer_info: Option<CustomerInfo>,
}

impl CheckoutDraft {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Default::default()
        }
    }

    /// 요금제를 고릅니다. 이전 선택과 편집은 모두 초기화됩니다.
    pub fn select_plan(&mut self, plan: BundlePlan) {
        self.plan = Some(plan);
        self.selected.clear();
        self.edits.clear();
    }

    pub fn plan(&self) -> Option<&BundlePlan> {
        self.plan.as_ref()
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn edits(&self) -> &BTreeMap<String, EditedPhoto> {
        &self.edits
    }

    /// 사진 선택을 토글합니다. 선택된 상태가 되면 `true`.
    ///
    /// 이미 상한만큼 골랐으면 새 사진은 거부되고, 메시지에 상한과 요금제 이름이 들어갑니다.
    pub fn toggle_photo(&mut self, photo_id: &str) -> Result<bool, ValidationError> {
        let Some(plan) = &self.plan else {
            return Err(ValidationError::new(
                "Please select a bundle plan first",
                "bundlePlan",
            ));
        };

        if let Some(index) = self.selected.iter().position(|id| id == photo_id) {
            self.selected.remove(index);
            self.edits.remove(photo_id);
            return Ok(false);
        }

        if self.selected.len() as i64 >= plan.photo_limit {
            return Err(ValidationError::new(
                format!(
                    "You can only select {} photos with the {} plan",
                    plan.photo_limit, plan.name
                ),
                "selectedPhotos",
            ));
        }

        self.selected.push(photo_id.to_string());
        Ok(true)
    }

    /// 선택된 사진의 편집 결과를 기록합니다 (같은 사진이면 덮어씀).
    pub fn record_edit(&mut self, edited: EditedPhoto) -> Result<(), ValidationError> {
        if !self.selected.contains(&edited.photo_id) {
            return Err(ValidationError::new(
                "Only selected photos can be edited",
                "photoId",
            ));
        }
        self.edits.insert(edited.photo_id.clone(), edited);
        Ok(())
    }

    /// 편집기로 편집을 적용하고 결과를 기록합니다.
    pub fn edit_with(
        &mut self,
        editor: &mut dyn ImageEditor,
        photo: &Photo,
        edits: &PhotoEdits,
    ) -> Result<&EditedPhoto, AppError> {
        let edited = editor::apply_edits(editor, photo, edits)
            .map_err(|e| AppError::Internal(format!("image editor: {}", e)))?;
        self.record_edit(edited)?;
        self.edits
            .get(&photo.id)
            .ok_or_else(|| AppError::not_found("edited photo", &photo.id))
    }

    pub fn set_customer_info(&mut self, info: CustomerInfo) {
        self.customer_info = Some(info);
    }

    /// 작업 상태를 주문으로 확정합니다.
    pub async fn place_order(&self, checkout: &Checkout) -> Result<Order, AppError> {
        let Some(plan) = self.plan.clone() else {
            return Err(ValidationError::new("Please select a bundle plan first", "bundlePlan").into());
        };
        checkout
            .create_order(
                &self.session_id,
                plan,
                self.selected.clone(),
                self.edits.clone(),
                self.customer_info.clone(),
            )
            .await
    }
}

/// 주문 생성과 상태 전이
#[derive(Clone)]
pub struct Checkout {
    store: Store,
}

impl Checkout {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// 주문을 만듭니다 (상태 `pending`).
    ///
    /// - 빈 ID와 중복 선택은 제거합니다 (처음 선택한 순서 유지).
    /// - 선택 수는 요금제 상한 이하여야 합니다.
    /// - 선택되지 않은 사진의 편집 기록은 버립니다.
    pub async fn create_order(
        &self,
        session_id: &str,
        plan: BundlePlan,
        selected_photos: Vec<String>,
        mut edited_photos: BTreeMap<String, EditedPhoto>,
        customer_info: Option<CustomerInfo>,
    ) -> Result<Order, AppError> {
        let mut selected: Vec<String> = Vec::with_capacity(selected_photos.len());
        for id in selected_photos {
            let id = id.trim().to_string();
            if !id.is_empty() && !selected.contains(&id) {
                selected.push(id);
            }
        }
        validation::validate_order(&selected, &plan)?;

        if self.store.sessions.find_by_id(session_id).await?.is_none() {
            return Err(AppError::not_found("session", session_id));
        }

        edited_photos.retain(|id, _| selected.contains(id));

        let order = Order {
            id: ids::generate_id(),
            session_id: session_id.to_string(),
            total_amount: plan.price,
            bundle_plan: plan,
            selected_photos: selected,
            edited_photos,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            customer_info,
        };

        let order = self.store.orders.add(order).await?;
        tracing::info!(
            order_id = %order.id,
            session_id = %order.session_id,
            total = order.total_amount,
            "Created order"
        );
        Ok(order)
    }

    /// HTTP 요청에서 주문을 만듭니다. 요금제는 ID로 찾고, 비활성 요금제는 거부합니다.
    pub async fn create_order_from_request(&self, req: CreateOrderRequest) -> Result<Order, AppError> {
        let plan = self.store.get_bundle_plan(&req.bundle_plan_id).await?;
        if !plan.is_active {
            return Err(ValidationError::new(
                "This bundle plan is no longer available",
                "bundlePlanId",
            )
            .into());
        }
        self.create_order(
            &req.session_id,
            plan,
            req.selected_photos,
            req.edited_photos,
            req.customer_info,
        )
        .await
    }

    pub async fn get_order(&self, id: &str) -> Result<Order, AppError> {
        self.store
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("order", id))
    }

    /// 상태 전이를 검사하고 저장합니다. 검사와 저장은 같은 잠금 안에서 일어납니다.
    async fn transition(&self, id: &str, to: OrderStatus) -> Result<Order, AppError> {
        let order = self
            .store
            .orders
            .modify(id, |order| {
                order.status = order.status.transition(to)?;
                Ok(())
            })
            .await?
            .ok_or_else(|| AppError::not_found("order", id))?;
        tracing::info!(order_id = %id, status = %to, "Order status changed");
        Ok(order)
    }

    pub async fn mark_paid(&self, id: &str) -> Result<Order, AppError> {
        self.transition(id, OrderStatus::Paid).await
    }

    pub async fn mark_printed(&self, id: &str) -> Result<Order, AppError> {
        self.transition(id, OrderStatus::Printed).await
    }

    pub async fn cancel_order(&self, id: &str) -> Result<Order, AppError> {
        self.transition(id, OrderStatus::Cancelled).await
    }

    /// 주문 ID로 영수증을 만듭니다.
    pub async fn receipt_for_order(&self, id: &str) -> Result<Receipt, AppError> {
        let order = self.get_order(id).await?;
        let session = self.store.get_session(&order.session_id).await?;
        let settings = self.store.settings().await?;
        Ok(build_receipt(&order, &session, &settings))
    }
}

/// 주문에 담긴 사진들의 참조. 편집본이 있으면 편집본 URL을 씁니다.
///
/// 세션에서 사라진 사진은 건너뜁니다.
pub fn photo_refs(order: &Order, session: &Session) -> Vec<PhotoRef> {
    order
        .selected_photos
        .iter()
        .filter_map(|id| session.photos.iter().find(|p| &p.id == id))
        .map(|photo| PhotoRef {
            id: photo.id.clone(),
            name: photo.original_name.clone(),
            url: order
                .edited_photos
                .get(&photo.id)
                .and_then(|e| e.edited_url.clone())
                .unwrap_or_else(|| photo.url.clone()),
        })
        .collect()
}

/// 영수증 한 줄
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub label: String,
    /// 금액이 없으면 "Included"로 표시
    pub amount: Option<i64>,
}

/// 영수증: 주문 + 세션 + 설정을 합친 읽기 전용 투영
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub company_name: String,
    /// 영수증 번호 (세션 ID)
    pub bill_no: String,
    pub order_id: String,
    pub date: DateTime<Utc>,
    pub session_name: String,
    pub location: String,
    pub plan_name: String,
    pub photo_count: usize,
    pub photos: Vec<PhotoRef>,
    pub lines: Vec<ReceiptLine>,
    pub total_amount: i64,
    pub currency: String,
    pub currency_symbol: String,
    pub status: OrderStatus,
}

pub fn build_receipt(order: &Order, session: &Session, settings: &AppSettings) -> Receipt {
    let plan_name = order.bundle_plan.name.clone();
    Receipt {
        company_name: settings.company_name.clone(),
        bill_no: session.id.clone(),
        order_id: order.id.clone(),
        date: order.created_at,
        session_name: session.name.clone(),
        location: session.location.clone(),
        photo_count: order.selected_photos.len(),
        photos: photo_refs(order, session),
        lines: vec![
            ReceiptLine {
                label: format!("{} Package", plan_name),
                amount: Some(order.total_amount),
            },
            ReceiptLine {
                label: "Photo Editing".to_string(),
                amount: None,
            },
            ReceiptLine {
                label: "Service Tax".to_string(),
                amount: None,
            },
        ],
        plan_name,
        total_amount: order.total_amount,
        currency: settings.currency.clone(),
        currency_symbol: settings.currency_symbol(),
        status: order.status,
    }
}

impl Receipt {
    /// 클립보드/공유용 일반 텍스트 영수증
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} Bill", self.company_name);
        let _ = writeln!(out, "Bill No: #{}", self.bill_no);
        let _ = writeln!(out, "Date: {}", self.date.format("%Y-%m-%d %H:%M"));
        let _ = writeln!(out, "Session: {}", self.session_name);
        let _ = writeln!(out, "Location: {}", self.location);
        let _ = writeln!(out, "Package: {}", self.plan_name);
        let _ = writeln!(out, "Number of Photos: {}", self.photo_count);
        for line in &self.lines {
            match line.amount {
                Some(amount) => {
                    let _ = writeln!(out, "{}: {}{}", line.label, self.currency_symbol, amount);
                }
                None => {
                    let _ = writeln!(out, "{}: Included", line.label);
                }
            }
        }
        let _ = write!(out, "Total: {}{}", self.currency_symbol, self.total_amount);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{SeedOptions, SessionIdStyle};
    use crate::services::editor::tests::{photo, RecordingEditor};

    fn plan(limit: i64, price: i64) -> BundlePlan {
        BundlePlan {
            id: "p".into(),
            name: "Basic".into(),
            photo_limit: limit,
            price,
            description: String::new(),
            is_active: true,
        }
    }

    async fn seeded() -> (Store, Checkout) {
        let store = Store::in_memory().await.unwrap();
        store.init(SeedOptions::default()).await.unwrap();
        let checkout = Checkout::new(store.clone());
        (store, checkout)
    }

    #[test]
    fn draft_enforces_the_plan_limit() {
        let mut draft = CheckoutDraft::new("S1");
        assert!(draft.toggle_photo("a").is_err());

        draft.select_plan(plan(2, 100));
        assert!(draft.toggle_photo("a").unwrap());
        assert!(draft.toggle_photo("b").unwrap());
        let err = draft.toggle_photo("c").unwrap_err();
        assert!(err.message.contains("2 photos"), "{}", err.message);
        assert!(err.message.contains("Basic"));

        // 해제하면 다시 고를 수 있음
        assert!(!draft.toggle_photo("a").unwrap());
        assert!(draft.toggle_photo("c").unwrap());
        assert_eq!(draft.selected().to_vec(), vec!["b", "c"]);
    }

    #[test]
    fn changing_plan_resets_selection() {
        let mut draft = CheckoutDraft::new("S1");
        draft.select_plan(plan(2, 100));
        draft.toggle_photo("a").unwrap();
        draft.select_plan(plan(5, 250));
        assert!(draft.selected().is_empty());
    }

    #[test]
    fn only_selected_photos_can_be_edited() {
        let mut draft = CheckoutDraft::new("S1");
        draft.select_plan(plan(2, 100));
        draft.toggle_photo("p1").unwrap();

        let mut editor = RecordingEditor::default();
        let edited = draft
            .edit_with(&mut editor, &photo("p1"), &PhotoEdits::default())
            .unwrap();
        assert!(edited.edited_url.is_some());

        let err = draft
            .edit_with(&mut editor, &photo("p2"), &PhotoEdits::default())
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // 선택 해제하면 편집 기록도 사라짐
        draft.toggle_photo("p1").unwrap();
        assert!(draft.edits().is_empty());
    }

    #[tokio::test]
    async fn limit_plus_one_is_rejected_naming_the_limit() {
        let (_store, checkout) = seeded().await;
        for limit in [1_i64, 2, 5] {
            let ids: Vec<String> = (0..=limit).map(|i| format!("photo-{}", i)).collect();
            let err = checkout
                .create_order("SMITH123456", plan(limit, 100), ids.clone(), BTreeMap::new(), None)
                .await
                .unwrap_err();
            match err {
                AppError::Validation(v) => assert!(v.message.contains(&limit.to_string())),
                other => panic!("unexpected {:?}", other),
            }

            let order = checkout
                .create_order(
                    "SMITH123456",
                    plan(limit, 100),
                    ids[..limit as usize].to_vec(),
                    BTreeMap::new(),
                    None,
                )
                .await
                .unwrap();
            assert_eq!(order.selected_photos.len(), limit as usize);
        }
    }

    #[tokio::test]
    async fn duplicates_and_blanks_are_dropped_before_the_limit_check() {
        let (_store, checkout) = seeded().await;
        let order = checkout
            .create_order(
                "SMITH123456",
                plan(2, 100),
                vec!["1".into(), "1".into(), " ".into(), "2".into()],
                BTreeMap::new(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(order.selected_photos, vec!["1", "2"]);
        assert_eq!(order.total_amount, 100);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn order_for_unknown_session_is_not_found() {
        let (_store, checkout) = seeded().await;
        let err = checkout
            .create_order("missing", plan(2, 100), vec!["1".into()], BTreeMap::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn status_transitions_follow_the_state_machine() {
        let (_store, checkout) = seeded().await;
        let order = checkout
            .create_order("SMITH123456", plan(2, 100), vec!["1".into()], BTreeMap::new(), None)
            .await
            .unwrap();

        assert_eq!(checkout.mark_paid(&order.id).await.unwrap().status, OrderStatus::Paid);
        assert!(matches!(
            checkout.cancel_order(&order.id).await.unwrap_err(),
            AppError::InvalidTransition(_)
        ));
        assert_eq!(
            checkout.mark_printed(&order.id).await.unwrap().status,
            OrderStatus::Printed
        );

        let other = checkout
            .create_order("SMITH123456", plan(2, 100), vec!["2".into()], BTreeMap::new(), None)
            .await
            .unwrap();
        assert_eq!(
            checkout.cancel_order(&other.id).await.unwrap().status,
            OrderStatus::Cancelled
        );
        assert!(checkout.mark_paid(&other.id).await.is_err());
        assert!(checkout.mark_printed(&other.id).await.is_err());

        assert!(matches!(
            checkout.mark_paid("missing").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn order_keeps_its_plan_snapshot() {
        let (store, checkout) = seeded().await;
        let order = checkout
            .create_order_from_request(CreateOrderRequest {
                session_id: "SMITH123456".into(),
                bundle_plan_id: "1".into(),
                selected_photos: vec!["1".into()],
                edited_photos: BTreeMap::new(),
                customer_info: None,
            })
            .await
            .unwrap();

        store
            .update_bundle_plan("1", &serde_json::json!({ "price": 999 }))
            .await
            .unwrap();
        let stored = checkout.get_order(&order.id).await.unwrap();
        assert_eq!(stored.total_amount, 100);
        assert_eq!(stored.bundle_plan.price, 100);
    }

    #[tokio::test]
    async fn inactive_plan_cannot_be_ordered() {
        let (store, checkout) = seeded().await;
        store
            .update_bundle_plan("2", &serde_json::json!({ "isActive": false }))
            .await
            .unwrap();
        let err = checkout
            .create_order_from_request(CreateOrderRequest {
                session_id: "SMITH123456".into(),
                bundle_plan_id: "2".into(),
                selected_photos: vec!["1".into()],
                edited_photos: BTreeMap::new(),
                customer_info: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref v) if v.field == Some("bundlePlanId")));
    }

    #[tokio::test]
    async fn draft_places_an_order_with_its_edits() {
        let (store, checkout) = seeded().await;
        let session = store
            .create_session(
                CreateSessionRequest {
                    name: "Lee Studio".into(),
                    location: "City Park".into(),
                    photographer_id: "1".into(),
                },
                SessionIdStyle::Generated,
            )
            .await
            .unwrap();

        let mut draft = CheckoutDraft::new(session.id.clone());
        assert!(draft.place_order(&checkout).await.is_err());

        draft.select_plan(store.get_bundle_plan("2").await.unwrap());
        draft.toggle_photo("p1").unwrap();
        let mut editor = RecordingEditor::default();
        draft
            .edit_with(&mut editor, &photo("p1"), &PhotoEdits::default())
            .unwrap();
        draft.set_customer_info(CustomerInfo {
            name: Some("Lee".into()),
            ..Default::default()
        });

        let order = draft.place_order(&checkout).await.unwrap();
        assert_eq!(order.total_amount, 250);
        assert!(order.edited_photos.contains_key("p1"));
        assert_eq!(store.orders_for_session(&session.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn receipt_projects_order_session_and_settings() {
        let (_store, checkout) = seeded().await;
        let mut edits = BTreeMap::new();
        edits.insert(
            "2".to_string(),
            EditedPhoto {
                photo_id: "2".into(),
                edits: PhotoEdits::default(),
                edited_url: Some("data:image/png;base64,BBBB".into()),
            },
        );
        let order = checkout
            .create_order("SMITH123456", plan(2, 100), vec!["1".into(), "2".into()], edits, None)
            .await
            .unwrap();

        let receipt = checkout.receipt_for_order(&order.id).await.unwrap();
        assert_eq!(receipt.bill_no, "SMITH123456");
        assert_eq!(receipt.session_name, "Smith Family");
        assert_eq!(receipt.photo_count, 2);
        assert_eq!(receipt.photos[0].url, "/placeholder.svg");
        assert_eq!(receipt.photos[1].url, "data:image/png;base64,BBBB");

        let text = receipt.to_text();
        assert!(text.starts_with("PhotoKiosk Pro Bill"));
        assert!(text.contains("Basic Package: ₹100"));
        assert!(text.contains("Photo Editing: Included"));
        assert!(text.ends_with("Total: ₹100"));
    }
}
