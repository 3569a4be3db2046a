//! Payment method endpoints.

use serde::Serialize;
use tracing::instrument;

use gursha_core::{PaymentKind, PaymentMethodId};

use crate::models::PaymentMethod;

use super::{ApiError, ApiGateway};

/// Fields for creating or editing a payment method.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodInput {
    #[serde(flatten)]
    pub kind: PaymentKind,
    #[serde(default)]
    pub is_default: bool,
}

impl ApiGateway {
    // =========================================================================
    // Payment Method Methods (never cached - mutable state)
    // =========================================================================

    /// List the signed-in user's payment methods.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, ApiError> {
        self.get("payment-methods").await
    }

    /// Store a payment method; the backend assigns the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn create_payment_method(
        &self,
        input: &PaymentMethodInput,
    ) -> Result<PaymentMethod, ApiError> {
        self.post("payment-methods", input).await
    }

    /// Replace a payment method's fields.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the payment method does not exist.
    #[instrument(skip(self, input), fields(payment_method_id = %payment_method_id))]
    pub async fn update_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
        input: &PaymentMethodInput,
    ) -> Result<PaymentMethod, ApiError> {
        self.put(&format!("payment-methods/{payment_method_id}"), input)
            .await
    }

    /// Delete a payment method.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the payment method does not exist.
    #[instrument(skip(self), fields(payment_method_id = %payment_method_id))]
    pub async fn delete_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<(), ApiError> {
        self.delete(&format!("payment-methods/{payment_method_id}"))
            .await
    }

    /// Mark a payment method as the default.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the payment method does not exist.
    #[instrument(skip(self), fields(payment_method_id = %payment_method_id))]
    pub async fn set_default_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<(), ApiError> {
        self.execute::<(), Option<serde_json::Value>>(
            reqwest::Method::POST,
            &format!("payment-methods/{payment_method_id}/default"),
            None,
        )
        .await?;
        Ok(())
    }
}
