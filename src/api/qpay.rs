// src/api/qpay.rs
//
// QPay checkout, reached through the backend's serverless functions: one
// function creates the purchase record and invoice (returning a QR payload),
// another reports the invoice status.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::appwrite::AppwriteClient;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseKind {
    Single,
    Bundle,
}

/// Payload for the purchase-initiation function. The `movieId` key carries
/// either a content id or a bundle sentinel; that key name is the deployed
/// function's contract.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePurchaseRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "movieId")]
    pub movie_id: String,
    /// Amount in MNT.
    pub amount: i64,
    #[serde(rename = "purchaseType")]
    pub purchase_type: PurchaseKind,
    #[serde(rename = "movieTitle")]
    pub movie_title: String,
    /// Access window in days; absent for single-title rentals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseIntent {
    #[serde(rename = "qrImage")]
    pub qr_image: String,
    #[serde(rename = "purchaseId")]
    pub purchase_id: String,
}

/// The initiation function answers with either the intent or `{"error": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CreatePurchaseResponse {
    Ok(PurchaseIntent),
    Err { error: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseStatusResponse {
    pub status: String,
}

impl PurchaseStatusResponse {
    pub fn is_paid(&self) -> bool {
        self.status == "PAID"
    }
}

/// Seam between the checkout flow and the payment backend, so the polling
/// machinery can be driven by a stub in tests.
#[async_trait]
pub trait PaymentFunctions: Send + Sync {
    async fn create_purchase(
        &self,
        request: &CreatePurchaseRequest,
    ) -> Result<PurchaseIntent, AppError>;

    async fn check_purchase(&self, purchase_id: &str)
        -> Result<PurchaseStatusResponse, AppError>;
}

pub struct QpayFunctions {
    appwrite: Arc<AppwriteClient>,
    create_fn_id: String,
    status_fn_id: String,
}

impl QpayFunctions {
    pub fn new(
        appwrite: Arc<AppwriteClient>,
        create_fn_id: impl Into<String>,
        status_fn_id: impl Into<String>,
    ) -> Self {
        Self {
            appwrite,
            create_fn_id: create_fn_id.into(),
            status_fn_id: status_fn_id.into(),
        }
    }
}

#[async_trait]
impl PaymentFunctions for QpayFunctions {
    async fn create_purchase(
        &self,
        request: &CreatePurchaseRequest,
    ) -> Result<PurchaseIntent, AppError> {
        let payload = serde_json::to_value(request)
            .map_err(|e| AppError::Parse(format!("purchase request: {e}")))?;
        let response: CreatePurchaseResponse = self
            .appwrite
            .execute_function_json(&self.create_fn_id, &payload)
            .await?;
        match response {
            CreatePurchaseResponse::Ok(intent) => Ok(intent),
            CreatePurchaseResponse::Err { error } => Err(AppError::RemoteExecution(error)),
        }
    }

    async fn check_purchase(
        &self,
        purchase_id: &str,
    ) -> Result<PurchaseStatusResponse, AppError> {
        let response: PurchaseStatusResponse = self
            .appwrite
            .execute_function_json(&self.status_fn_id, &json!({ "purchaseId": purchase_id }))
            .await?;
        Ok(response)
    }
}
