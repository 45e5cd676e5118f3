//! # 인쇄 대기열
//!
//! 체크아웃이 끝난 주문의 사본을 `printQueue` 컬렉션에 쌓고, 사진작가가 하나씩 인쇄 완료 처리합니다.
//!
//! ```text
//! enqueue(order) ──▶ [pending] ──complete──▶ [completed]   (+ 주문 paid → printed, 프린터 호출)
//!                        │
//!                        └──cancel──▶ (레코드 삭제)
//! ```
//!
//! 실제 인쇄는 주입된 `Printer`가 맡습니다. 호출하고 기다리지 않으며(fire-and-forget),
//! 성공/실패를 돌려받지 않습니다.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::db::Store;
use crate::error::AppError;
use crate::models::*;
use crate::services::checkout::photo_refs;
use crate::services::ids;

/// 인쇄 기능. 결과를 돌려주지 않습니다.
pub trait Printer: Send + Sync {
    fn print(&self, photo_urls: Vec<String>);
}

/// 실제 프린터 대신 지연 후 로그만 남기는 프린터
#[derive(Debug, Clone)]
pub struct LogPrinter {
    delay: Duration,
}

impl LogPrinter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Printer for LogPrinter {
    fn print(&self, photo_urls: Vec<String>) {
        let delay = self.delay;
        tokio::spawn(async move {
            tracing::debug!(count = photo_urls.len(), "Print job started");
            tokio::time::sleep(delay).await;
            tracing::info!(count = photo_urls.len(), "Print job finished");
        });
    }
}

#[derive(Clone)]
pub struct PrintQueue {
    store: Store,
    printer: Arc<dyn Printer>,
}

impl PrintQueue {
    pub fn new(store: Store, printer: Arc<dyn Printer>) -> Self {
        Self { store, printer }
    }

    /// 주문 사본을 대기열에 넣습니다.
    ///
    /// 취소되었거나 이미 인쇄된 주문, 이미 대기열에 있는 주문은 거부합니다.
    pub async fn enqueue(&self, order: &Order) -> Result<PrintRequest, AppError> {
        if order.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Order {} is {} and cannot be queued for printing",
                order.id, order.status
            )));
        }

        let session = self.store.get_session(&order.session_id).await?;
        let photos = photo_refs(order, &session);
        let request = PrintRequest {
            id: ids::generate_id(),
            order_id: order.id.clone(),
            session_id: session.id.clone(),
            session_name: session.name.clone(),
            customer_name: order.customer_info.as_ref().and_then(|c| c.name.clone()),
            plan_name: order.bundle_plan.name.clone(),
            photo_count: order.selected_photos.len(),
            total_amount: order.total_amount,
            status: PrintStatus::Pending,
            ordered_at: order.created_at,
            completed_at: None,
            photos,
        };

        let order_id = order.id.clone();
        let request = self
            .store
            .print_queue
            .add_checked(request, |existing| {
                if existing.iter().any(|r| r.order_id == order_id) {
                    return Err(AppError::Conflict(format!(
                        "Order {} is already in the print queue",
                        order_id
                    )));
                }
                Ok(())
            })
            .await?;

        tracing::info!(request_id = %request.id, order_id = %request.order_id, "Queued print request");
        Ok(request)
    }

    /// 주문 ID로 대기열에 넣습니다.
    pub async fn enqueue_order(&self, order_id: &str) -> Result<PrintRequest, AppError> {
        let order = self
            .store
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found("order", order_id))?;
        self.enqueue(&order).await
    }

    async fn list_by(&self, status: PrintStatus) -> Result<Vec<PrintRequest>, AppError> {
        Ok(self
            .store
            .print_queue
            .list()
            .await?
            .into_iter()
            .filter(|r| r.status == status)
            .collect())
    }

    pub async fn list_pending(&self) -> Result<Vec<PrintRequest>, AppError> {
        self.list_by(PrintStatus::Pending).await
    }

    pub async fn list_completed(&self) -> Result<Vec<PrintRequest>, AppError> {
        self.list_by(PrintStatus::Completed).await
    }

    /// 인쇄 완료 처리
    ///
    /// 1. 대기열 항목을 `completed`로 바꾸고 완료 시각을 기록
    /// 2. 원래 주문이 `paid`면 `printed`로 전이 (아직 `pending`이면 그대로 둠)
    /// 3. 프린터 호출 (기다리지 않음)
    pub async fn complete(&self, request_id: &str) -> Result<PrintRequest, AppError> {
        let request = self
            .store
            .print_queue
            .modify(request_id, |request| {
                if request.status == PrintStatus::Completed {
                    return Err(AppError::Conflict(format!(
                        "Print request {} is already completed",
                        request.id
                    )));
                }
                request.status = PrintStatus::Completed;
                request.completed_at = Some(Utc::now());
                Ok(())
            })
            .await?
            .ok_or_else(|| AppError::not_found("print request", request_id))?;

        let printed = self
            .store
            .orders
            .modify(&request.order_id, |order| {
                if order.status == OrderStatus::Paid {
                    order.status = order.status.transition(OrderStatus::Printed)?;
                }
                Ok(())
            })
            .await?;
        match printed {
            Some(order) if order.status == OrderStatus::Printed => {}
            Some(order) => tracing::warn!(
                order_id = %order.id,
                status = %order.status,
                "Printed an order that was not paid"
            ),
            None => tracing::warn!(order_id = %request.order_id, "Printed request has no order"),
        }

        self.printer
            .print(request.photos.iter().map(|p| p.url.clone()).collect());
        tracing::info!(request_id = %request.id, "Completed print request");
        Ok(request)
    }

    /// 대기열 항목을 삭제합니다. 상태 전이가 아니라 레코드 자체를 지웁니다.
    pub async fn cancel(&self, request_id: &str) -> Result<(), AppError> {
        if !self.store.print_queue.remove(request_id).await? {
            return Err(AppError::not_found("print request", request_id));
        }
        tracing::info!(request_id = %request_id, "Cancelled print request");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SeedOptions;
    use crate::services::checkout::Checkout;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// 인쇄 요청을 기록만 하는 프린터
    #[derive(Default)]
    struct RecordingPrinter {
        jobs: Mutex<Vec<Vec<String>>>,
    }

    impl Printer for RecordingPrinter {
        fn print(&self, photo_urls: Vec<String>) {
            self.jobs.lock().unwrap().push(photo_urls);
        }
    }

    async fn setup() -> (Store, Checkout, PrintQueue, Arc<RecordingPrinter>) {
        let store = Store::in_memory().await.unwrap();
        store.init(SeedOptions::default()).await.unwrap();
        let printer = Arc::new(RecordingPrinter::default());
        let queue = PrintQueue::new(store.clone(), printer.clone());
        (store.clone(), Checkout::new(store), queue, printer)
    }

    async fn paid_order(store: &Store, checkout: &Checkout) -> Order {
        let plan = store.get_bundle_plan("1").await.unwrap();
        let order = checkout
            .create_order(
                "SMITH123456",
                plan,
                vec!["1".into(), "2".into()],
                BTreeMap::new(),
                None,
            )
            .await
            .unwrap();
        checkout.mark_paid(&order.id).await.unwrap()
    }

    #[tokio::test]
    async fn complete_moves_request_out_of_pending() {
        let (store, checkout, queue, printer) = setup().await;
        let order = paid_order(&store, &checkout).await;

        let request = queue.enqueue(&order).await.unwrap();
        assert_eq!(request.session_name, "Smith Family");
        assert_eq!(request.photo_count, 2);
        assert_eq!(queue.list_pending().await.unwrap().len(), 1);

        let done = queue.complete(&request.id).await.unwrap();
        assert!(done.completed_at.is_some());
        assert!(queue.list_pending().await.unwrap().is_empty());
        assert_eq!(queue.list_completed().await.unwrap()[0].id, request.id);

        assert_eq!(
            checkout.get_order(&order.id).await.unwrap().status,
            OrderStatus::Printed
        );
        let jobs = printer.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].len(), 2);
    }

    #[tokio::test]
    async fn completing_twice_is_a_conflict() {
        let (store, checkout, queue, _printer) = setup().await;
        let order = paid_order(&store, &checkout).await;
        let request = queue.enqueue(&order).await.unwrap();

        queue.complete(&request.id).await.unwrap();
        assert!(matches!(
            queue.complete(&request.id).await.unwrap_err(),
            AppError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn same_order_cannot_be_queued_twice() {
        let (store, checkout, queue, _printer) = setup().await;
        let order = paid_order(&store, &checkout).await;

        queue.enqueue(&order).await.unwrap();
        assert!(matches!(
            queue.enqueue_order(&order.id).await.unwrap_err(),
            AppError::Conflict(_)
        ));
        assert_eq!(queue.list_pending().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_orders_are_not_queued() {
        let (store, checkout, queue, _printer) = setup().await;
        let plan = store.get_bundle_plan("1").await.unwrap();
        let order = checkout
            .create_order("SMITH123456", plan, vec!["1".into()], BTreeMap::new(), None)
            .await
            .unwrap();
        let order = checkout.cancel_order(&order.id).await.unwrap();

        assert!(matches!(
            queue.enqueue(&order).await.unwrap_err(),
            AppError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn cancel_is_a_hard_delete() {
        let (store, checkout, queue, printer) = setup().await;
        let order = paid_order(&store, &checkout).await;
        let request = queue.enqueue(&order).await.unwrap();

        queue.cancel(&request.id).await.unwrap();
        assert!(store.print_queue.list().await.unwrap().is_empty());
        assert!(matches!(
            queue.cancel(&request.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(printer.jobs.lock().unwrap().is_empty());
        // 주문 자체는 그대로
        assert_eq!(checkout.get_order(&order.id).await.unwrap().status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn queue_entry_is_a_snapshot() {
        let (store, checkout, queue, _printer) = setup().await;
        let order = paid_order(&store, &checkout).await;
        let request = queue.enqueue(&order).await.unwrap();

        store
            .update_session("SMITH123456", &serde_json::json!({ "name": "Smith Reunion" }))
            .await
            .unwrap();
        let stored = store.print_queue.find_by_id(&request.id).await.unwrap().unwrap();
        assert_eq!(stored.session_name, "Smith Family");
    }

    #[tokio::test]
    async fn log_printer_runs_in_the_background() {
        let printer = LogPrinter::new(Duration::from_millis(1));
        printer.print(vec!["/placeholder.svg".to_string()]);
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
