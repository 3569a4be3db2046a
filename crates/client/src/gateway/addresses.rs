//! Address endpoints.

use tracing::instrument;

use gursha_core::AddressId;

use crate::models::{Address, AddressInput};

use super::{ApiError, ApiGateway};

impl ApiGateway {
    // =========================================================================
    // Address Methods (never cached - mutable state)
    // =========================================================================

    /// List the signed-in user's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_addresses(&self) -> Result<Vec<Address>, ApiError> {
        self.get("addresses").await
    }

    /// Create an address; the backend assigns the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn create_address(&self, input: &AddressInput) -> Result<Address, ApiError> {
        self.post("addresses", input).await
    }

    /// Replace an address's fields.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the address does not exist.
    #[instrument(skip(self, input), fields(address_id = %address_id))]
    pub async fn update_address(
        &self,
        address_id: &AddressId,
        input: &AddressInput,
    ) -> Result<Address, ApiError> {
        self.put(&format!("addresses/{address_id}"), input).await
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the address does not exist.
    #[instrument(skip(self), fields(address_id = %address_id))]
    pub async fn delete_address(&self, address_id: &AddressId) -> Result<(), ApiError> {
        self.delete(&format!("addresses/{address_id}")).await
    }

    /// Mark an address as the default. The backend clears the previous
    /// default in the same operation.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the address does not exist.
    #[instrument(skip(self), fields(address_id = %address_id))]
    pub async fn set_default_address(&self, address_id: &AddressId) -> Result<(), ApiError> {
        self.execute::<(), Option<serde_json::Value>>(
            reqwest::Method::POST,
            &format!("addresses/{address_id}/default"),
            None,
        )
        .await?;
        Ok(())
    }
}
