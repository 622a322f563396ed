// src/checkout.rs
//
// One purchase attempt: request an invoice, show the QR, poll the status
// function until the gateway reports PAID or the user walks away. The remote
// purchase record is never cancelled from here; an abandoned invoice ages
// out on the backend.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::qpay::{
    CreatePurchaseRequest, PaymentFunctions, PurchaseIntent, PurchaseKind, QpayFunctions,
};
use crate::error::AppError;
use crate::models::{BundleTier, Movie, PlanDuration, User};
use crate::AppState;

/// Bundle price in MNT per tier and term. The superseded blanket tier is not
/// sold.
pub const fn bundle_price(tier: BundleTier, duration: PlanDuration) -> Option<i64> {
    match (tier, duration) {
        (BundleTier::Premium, PlanDuration::OneMonth) => Some(29_900),
        (BundleTier::Premium, PlanDuration::ThreeMonths) => Some(79_900),
        (BundleTier::Premium, PlanDuration::SixMonths) => Some(149_900),
        (BundleTier::Premium, PlanDuration::OneYear) => Some(269_900),

        (BundleTier::Series, PlanDuration::OneMonth) => Some(19_900),
        (BundleTier::Series, PlanDuration::ThreeMonths) => Some(53_900),
        (BundleTier::Series, PlanDuration::SixMonths) => Some(99_900),
        (BundleTier::Series, PlanDuration::OneYear) => Some(179_900),

        (BundleTier::Movies, PlanDuration::OneMonth) => Some(19_900),
        (BundleTier::Movies, PlanDuration::ThreeMonths) => Some(53_900),
        (BundleTier::Movies, PlanDuration::SixMonths) => Some(99_900),
        (BundleTier::Movies, PlanDuration::OneYear) => Some(179_900),

        (BundleTier::AllAccess, _) => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutState {
    Idle,
    AwaitingQr,
    AwaitingPayment {
        qr_image: String,
        purchase_id: String,
    },
    Resolved(CheckoutOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Paid,
    Abandoned,
}

/// What the user picked on the purchase screen.
#[derive(Debug, Clone)]
pub enum CheckoutOrder {
    Single { movie: Movie },
    Bundle { tier: BundleTier, duration: PlanDuration },
}

fn build_request(user: &User, order: &CheckoutOrder) -> Result<CreatePurchaseRequest, AppError> {
    match order {
        CheckoutOrder::Single { movie } => {
            if movie.price <= 0 {
                return Err(AppError::Validation(format!(
                    "\"{}\" is not available for purchase",
                    movie.title
                )));
            }
            Ok(CreatePurchaseRequest {
                user_id: user.id.clone(),
                movie_id: movie.id.clone(),
                amount: movie.price,
                purchase_type: PurchaseKind::Single,
                movie_title: movie.title.clone(),
                duration: None,
            })
        }
        CheckoutOrder::Bundle { tier, duration } => {
            let amount = bundle_price(*tier, *duration).ok_or_else(|| {
                AppError::Validation("This subscription is no longer offered".to_string())
            })?;
            Ok(CreatePurchaseRequest {
                user_id: user.id.clone(),
                movie_id: tier.sentinel().to_string(),
                amount,
                purchase_type: PurchaseKind::Bundle,
                movie_title: format!("{} ({})", tier.label(), duration.label()),
                duration: Some(duration.days()),
            })
        }
    }
}

/// Drives a single purchase attempt. At most one poll task is alive per flow;
/// starting over, cancelling, or dropping the flow kills it.
pub struct CheckoutFlow {
    payments: Arc<dyn PaymentFunctions>,
    poll_interval: Duration,
    state_tx: Arc<watch::Sender<CheckoutState>>,
    poll_task: Option<JoinHandle<()>>,
}

impl CheckoutFlow {
    pub fn new(payments: Arc<dyn PaymentFunctions>, poll_interval: Duration) -> Self {
        let (state_tx, _) = watch::channel(CheckoutState::Idle);
        Self {
            payments,
            poll_interval,
            state_tx: Arc::new(state_tx),
            poll_task: None,
        }
    }

    /// Wires the flow to the QPay functions configured for the app.
    pub fn from_app(state: &AppState) -> Self {
        let payments = QpayFunctions::new(
            Arc::clone(&state.appwrite),
            state.payment_create_fn_id.clone(),
            state.payment_status_fn_id.clone(),
        );
        Self::new(Arc::new(payments), state.poll_interval)
    }

    /// Watch the attempt progress. Receivers see every state transition.
    pub fn state(&self) -> watch::Receiver<CheckoutState> {
        self.state_tx.subscribe()
    }

    pub fn current_state(&self) -> CheckoutState {
        self.state_tx.borrow().clone()
    }

    /// Requests the invoice and, on success, begins polling for payment.
    /// An initiation failure leaves the flow idle; polling never starts.
    pub async fn start(
        &mut self,
        user: &User,
        order: &CheckoutOrder,
    ) -> Result<PurchaseIntent, AppError> {
        let request = build_request(user, order)?;

        self.abort_poll();
        self.state_tx.send_replace(CheckoutState::AwaitingQr);

        let intent = match self.payments.create_purchase(&request).await {
            Ok(intent) => intent,
            Err(e) => {
                log::error!("purchase initiation failed: {e}");
                self.state_tx.send_replace(CheckoutState::Idle);
                return Err(e);
            }
        };

        self.state_tx.send_replace(CheckoutState::AwaitingPayment {
            qr_image: intent.qr_image.clone(),
            purchase_id: intent.purchase_id.clone(),
        });
        self.spawn_poll(intent.purchase_id.clone());

        Ok(intent)
    }

    fn spawn_poll(&mut self, purchase_id: String) {
        self.abort_poll();

        let payments = Arc::clone(&self.payments);
        let state_tx = Arc::clone(&self.state_tx);
        let every = self.poll_interval;

        self.poll_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // interval() yields immediately; the first status check should
            // come one full period after the QR went up.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match payments.check_purchase(&purchase_id).await {
                    // A flaky tick is not the end of the attempt.
                    Err(e) => log::warn!("purchase status check failed, retrying: {e}"),
                    Ok(status) if status.is_paid() => {
                        state_tx.send_replace(CheckoutState::Resolved(CheckoutOutcome::Paid));
                        break;
                    }
                    Ok(_) => {}
                }
            }
        }));
    }

    /// User walked away. Stops polling and drops the QR; the remote record is
    /// left to expire on its own.
    pub fn cancel(&mut self) {
        self.abort_poll();
        let in_flight = matches!(
            &*self.state_tx.borrow(),
            CheckoutState::AwaitingQr | CheckoutState::AwaitingPayment { .. }
        );
        if in_flight {
            self.state_tx
                .send_replace(CheckoutState::Resolved(CheckoutOutcome::Abandoned));
        }
    }

    fn abort_poll(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
    }
}

impl Drop for CheckoutFlow {
    fn drop(&mut self) {
        self.abort_poll();
    }
}
