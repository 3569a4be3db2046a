//! Profile store: the single authoritative owner of saved addresses and
//! payment methods.
//!
//! Other stores hold ids only and come here for the entities - there is
//! deliberately no second copy anywhere, so the `is_default` invariant
//! has exactly one enforcement point: after any operation returns, at
//! most one address and at most one payment method carry the flag.

use thiserror::Error;
use tracing::instrument;

use gursha_core::{AddressId, PaymentMethodId};

use crate::gateway::{ApiError, ApiGateway, PaymentMethodInput};
use crate::models::{Address, AddressInput, PaymentMethod};

/// Errors from address/payment-method operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Removing the default entry is only allowed when it is the last one.
    #[error("cannot remove the default entry while other entries exist")]
    CannotRemoveDefault,

    /// The referenced entry does not exist.
    #[error("no such entry: {0}")]
    NotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The profile store.
pub struct ProfileStore {
    gateway: ApiGateway,
    addresses: Vec<Address>,
    payment_methods: Vec<PaymentMethod>,
}

impl ProfileStore {
    /// Create an empty store.
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            addresses: Vec::new(),
            payment_methods: Vec::new(),
        }
    }

    /// Fetch both lists from the backend.
    ///
    /// # Errors
    ///
    /// On failure the existing lists are kept untouched.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), ProfileError> {
        let addresses = self.gateway.list_addresses().await?;
        let payment_methods = self.gateway.list_payment_methods().await?;
        self.addresses = addresses;
        self.payment_methods = payment_methods;
        Ok(())
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// Saved addresses.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// The default address, pre-selected in checkout forms.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }

    /// Add an address. Confirmed policy: the backend assigns the id and
    /// its copy is what lands in the list and is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; local state is untouched.
    #[instrument(skip(self, input))]
    pub async fn add_address(&mut self, input: &AddressInput) -> Result<Address, ProfileError> {
        let created = self.gateway.create_address(input).await?;
        if created.is_default {
            for address in &mut self.addresses {
                address.is_default = false;
            }
        }
        self.addresses.push(created.clone());
        Ok(created)
    }

    /// Edit an address. Confirmed policy.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id; gateway failures leave local
    /// state untouched.
    #[instrument(skip(self, input), fields(address_id = %address_id))]
    pub async fn edit_address(
        &mut self,
        address_id: &AddressId,
        input: &AddressInput,
    ) -> Result<Address, ProfileError> {
        let position = self
            .addresses
            .iter()
            .position(|a| a.id == *address_id)
            .ok_or_else(|| ProfileError::NotFound(address_id.to_string()))?;

        let updated = self.gateway.update_address(address_id, input).await?;
        if updated.is_default {
            for address in &mut self.addresses {
                address.is_default = false;
            }
        }
        self.addresses[position] = updated.clone();
        Ok(updated)
    }

    /// Remove an address. The current default can only be removed when it
    /// is the last entry.
    ///
    /// # Errors
    ///
    /// `CannotRemoveDefault` is raised before any network call.
    #[instrument(skip(self), fields(address_id = %address_id))]
    pub async fn remove_address(&mut self, address_id: &AddressId) -> Result<(), ProfileError> {
        let address = self
            .addresses
            .iter()
            .find(|a| a.id == *address_id)
            .ok_or_else(|| ProfileError::NotFound(address_id.to_string()))?;
        if address.is_default && self.addresses.len() > 1 {
            return Err(ProfileError::CannotRemoveDefault);
        }

        self.gateway.delete_address(address_id).await?;
        self.addresses.retain(|a| a.id != *address_id);
        Ok(())
    }

    /// Flip the default address. Atomic from the caller's point of view:
    /// exactly one entry has the flag after this returns, even though the
    /// backend performs two writes underneath.
    ///
    /// Optimistic policy: local state flips first for instant feedback;
    /// a gateway failure restores the previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or the gateway error after
    /// rollback.
    #[instrument(skip(self), fields(address_id = %address_id))]
    pub async fn set_default_address(
        &mut self,
        address_id: &AddressId,
    ) -> Result<(), ProfileError> {
        if !self.addresses.iter().any(|a| a.id == *address_id) {
            return Err(ProfileError::NotFound(address_id.to_string()));
        }

        let snapshot = self.addresses.clone();
        for address in &mut self.addresses {
            address.is_default = address.id == *address_id;
        }

        if let Err(e) = self.gateway.set_default_address(address_id).await {
            self.addresses = snapshot;
            return Err(e.into());
        }
        Ok(())
    }

    // =========================================================================
    // Payment Methods
    // =========================================================================

    /// Stored payment methods.
    #[must_use]
    pub fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }

    /// The default payment method, pre-selected in checkout forms.
    #[must_use]
    pub fn default_payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|p| p.is_default)
    }

    /// Store a payment method. Confirmed policy: the backend's copy is
    /// what lands in the list and is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; local state is untouched.
    #[instrument(skip(self, input))]
    pub async fn add_payment_method(
        &mut self,
        input: &PaymentMethodInput,
    ) -> Result<PaymentMethod, ProfileError> {
        let created = self.gateway.create_payment_method(input).await?;
        if created.is_default {
            for method in &mut self.payment_methods {
                method.is_default = false;
            }
        }
        self.payment_methods.push(created.clone());
        Ok(created)
    }

    /// Edit a payment method. Confirmed policy.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id; gateway failures leave local
    /// state untouched.
    #[instrument(skip(self, input), fields(payment_method_id = %payment_method_id))]
    pub async fn edit_payment_method(
        &mut self,
        payment_method_id: &PaymentMethodId,
        input: &PaymentMethodInput,
    ) -> Result<PaymentMethod, ProfileError> {
        let position = self
            .payment_methods
            .iter()
            .position(|p| p.id == *payment_method_id)
            .ok_or_else(|| ProfileError::NotFound(payment_method_id.to_string()))?;

        let updated = self
            .gateway
            .update_payment_method(payment_method_id, input)
            .await?;
        if updated.is_default {
            for method in &mut self.payment_methods {
                method.is_default = false;
            }
        }
        self.payment_methods[position] = updated.clone();
        Ok(updated)
    }

    /// Remove a payment method, with the same default-protection rule as
    /// addresses.
    ///
    /// # Errors
    ///
    /// `CannotRemoveDefault` is raised before any network call.
    #[instrument(skip(self), fields(payment_method_id = %payment_method_id))]
    pub async fn remove_payment_method(
        &mut self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<(), ProfileError> {
        let method = self
            .payment_methods
            .iter()
            .find(|p| p.id == *payment_method_id)
            .ok_or_else(|| ProfileError::NotFound(payment_method_id.to_string()))?;
        if method.is_default && self.payment_methods.len() > 1 {
            return Err(ProfileError::CannotRemoveDefault);
        }

        self.gateway.delete_payment_method(payment_method_id).await?;
        self.payment_methods.retain(|p| p.id != *payment_method_id);
        Ok(())
    }

    /// Flip the default payment method. Same atomicity and rollback
    /// behavior as [`set_default_address`](Self::set_default_address).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or the gateway error after
    /// rollback.
    #[instrument(skip(self), fields(payment_method_id = %payment_method_id))]
    pub async fn set_default_payment_method(
        &mut self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<(), ProfileError> {
        if !self
            .payment_methods
            .iter()
            .any(|p| p.id == *payment_method_id)
        {
            return Err(ProfileError::NotFound(payment_method_id.to_string()));
        }

        let snapshot = self.payment_methods.clone();
        for method in &mut self.payment_methods {
            method.is_default = method.id == *payment_method_id;
        }

        if let Err(e) = self
            .gateway
            .set_default_payment_method(payment_method_id)
            .await
        {
            self.payment_methods = snapshot;
            return Err(e.into());
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn seed_addresses(&mut self, addresses: Vec<Address>) {
        self.addresses = addresses;
    }

    #[cfg(test)]
    pub(crate) fn seed_payment_methods(&mut self, methods: Vec<PaymentMethod>) {
        self.payment_methods = methods;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use gursha_core::{AddressLabel, PaymentKind};

    fn store() -> ProfileStore {
        let config = ClientConfig::for_base_url("http://localhost:1/api/v1").unwrap();
        ProfileStore::new(ApiGateway::new(&config))
    }

    fn address(id: &str, is_default: bool) -> Address {
        Address {
            id: AddressId::new(id),
            label: AddressLabel::Home,
            line: "Bole Road".to_string(),
            district: "Bole".to_string(),
            city: "Addis Ababa".to_string(),
            landmark: None,
            location: None,
            is_default,
        }
    }

    fn card(id: &str, is_default: bool) -> PaymentMethod {
        PaymentMethod {
            id: PaymentMethodId::new(id),
            kind: PaymentKind::Card {
                brand: "visa".to_string(),
                last4: "4242".to_string(),
                expiry_month: 12,
                expiry_year: 2027,
            },
            is_default,
        }
    }

    #[tokio::test]
    async fn test_remove_default_rejected_while_others_exist() {
        let mut store = store();
        store.seed_addresses(vec![address("a1", true), address("a2", false)]);

        // Fails fast: the bogus gateway address proves no request was made.
        let err = store.remove_address(&AddressId::new("a1")).await.unwrap_err();
        assert!(matches!(err, ProfileError::CannotRemoveDefault));
        assert_eq!(store.addresses().len(), 2);
    }

    #[tokio::test]
    async fn test_set_default_unknown_id() {
        let mut store = store();
        store.seed_addresses(vec![address("a1", true)]);
        assert!(matches!(
            store.set_default_address(&AddressId::new("nope")).await,
            Err(ProfileError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_set_default_rolls_back_on_gateway_failure() {
        let mut store = store();
        store.seed_addresses(vec![address("a1", true), address("a2", false)]);

        // The gateway is unreachable, so the optimistic flip must roll back.
        let result = store.set_default_address(&AddressId::new("a2")).await;
        assert!(result.is_err());
        assert!(store.addresses()[0].is_default);
        assert!(!store.addresses()[1].is_default);
    }

    #[tokio::test]
    async fn test_default_payment_method_rollback() {
        let mut store = store();
        store.seed_payment_methods(vec![card("p1", true), card("p2", false)]);

        let result = store
            .set_default_payment_method(&PaymentMethodId::new("p2"))
            .await;
        assert!(result.is_err());
        let defaults: Vec<_> = store
            .payment_methods()
            .iter()
            .filter(|p| p.is_default)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, PaymentMethodId::new("p1"));
    }

    #[test]
    fn test_default_accessors() {
        let mut store = store();
        store.seed_addresses(vec![address("a1", false), address("a2", true)]);
        assert_eq!(
            store.default_address().unwrap().id,
            AddressId::new("a2")
        );
        assert!(store.default_payment_method().is_none());
    }
}
