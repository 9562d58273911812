//! Customer account business logic

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    Customer, CustomerRole, DomainError, DomainResult, NewCustomer, ParkingStore, ProfileUpdate,
};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Service for registration, login checks and account maintenance.
pub struct CustomerService {
    store: Arc<dyn ParkingStore>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn ParkingStore>) -> Self {
        Self { store }
    }

    /// Register a new customer account with a bcrypt-hashed password.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        address: &str,
        postal_code: &str,
    ) -> DomainResult<Customer> {
        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Persistence(format!("password hashing failed: {}", e)))?;

        let customer = self
            .store
            .insert_customer(NewCustomer {
                email: email.to_string(),
                password_hash,
                name: name.to_string(),
                address: address.to_string(),
                postal_code: postal_code.to_string(),
                role: CustomerRole::Customer,
            })
            .await?;
        info!(customer_id = customer.id, email = %customer.email, "Customer registered");
        Ok(customer)
    }

    /// Verify credentials and return the account on success.
    pub async fn authenticate(&self, email: &str, password: &str) -> DomainResult<Customer> {
        let customer = self
            .store
            .find_customer_by_email(email)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("invalid credentials".to_string()))?;

        let valid = verify_password(password, &customer.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("invalid credentials".to_string()));
        }
        Ok(customer)
    }

    pub async fn get(&self, id: i32) -> DomainResult<Customer> {
        self.store
            .find_customer(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Customer",
                field: "id",
                value: id.to_string(),
            })
    }

    pub async fn list(&self) -> DomainResult<Vec<Customer>> {
        self.store.list_customers().await
    }

    pub async fn update_profile(
        &self,
        id: i32,
        update: ProfileUpdate,
    ) -> DomainResult<Customer> {
        self.store.update_customer_profile(id, update).await
    }

    /// Change the password after verifying the current one.
    pub async fn change_password(
        &self,
        id: i32,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let customer = self.get(id).await?;

        let valid = verify_password(current_password, &customer.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized(
                "current password is incorrect".to_string(),
            ));
        }

        let password_hash = hash_password(new_password)
            .map_err(|e| DomainError::Persistence(format!("password hashing failed: {}", e)))?;
        self.store.update_customer_password(id, &password_hash).await
    }

    /// Delete an account, freeing any spot it still occupies and
    /// removing its reservations.
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        self.store.delete_customer(id).await?;
        info!(customer_id = id, "Customer deleted");
        Ok(())
    }

    /// Seed the default admin account when no admin exists yet.
    pub async fn ensure_default_admin(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> DomainResult<()> {
        if self.store.count_admins().await? > 0 {
            return Ok(());
        }

        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Persistence(format!("password hashing failed: {}", e)))?;
        self.store
            .insert_customer(NewCustomer {
                email: email.to_string(),
                password_hash,
                name: name.to_string(),
                address: String::new(),
                postal_code: String::new(),
                role: CustomerRole::Admin,
            })
            .await?;
        info!(email, "Default admin created; change the password immediately");
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryParkingStore;

    fn service() -> CustomerService {
        CustomerService::new(Arc::new(InMemoryParkingStore::new()))
    }

    #[tokio::test]
    async fn register_and_authenticate() {
        let svc = service();
        let customer = svc
            .register("driver@example.com", "hunter22", "Asha", "2 Hill Rd", "560002")
            .await
            .unwrap();
        assert_eq!(customer.role, CustomerRole::Customer);

        let authed = svc
            .authenticate("driver@example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(authed.id, customer.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let svc = service();
        svc.register("driver@example.com", "pw123456", "Asha", "a", "1")
            .await
            .unwrap();
        let second = svc
            .register("driver@example.com", "pw123456", "Bilal", "b", "2")
            .await;
        assert!(matches!(second, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = service();
        svc.register("driver@example.com", "pw123456", "Asha", "a", "1")
            .await
            .unwrap();
        let result = svc.authenticate("driver@example.com", "wrong").await;
        assert!(matches!(result, Err(DomainError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn default_admin_is_seeded_once() {
        let svc = service();
        svc.ensure_default_admin("admin@parkhub.local", "admin123", "Administrator")
            .await
            .unwrap();
        svc.ensure_default_admin("admin@parkhub.local", "admin123", "Administrator")
            .await
            .unwrap();

        let admins: Vec<_> = svc
            .list()
            .await
            .unwrap()
            .into_iter()
            .filter(|c| c.is_admin())
            .collect();
        assert_eq!(admins.len(), 1);
    }

    #[tokio::test]
    async fn change_password_requires_current() {
        let svc = service();
        let customer = svc
            .register("driver@example.com", "oldpassword", "Asha", "a", "1")
            .await
            .unwrap();

        let bad = svc
            .change_password(customer.id, "not-the-password", "newpassword")
            .await;
        assert!(matches!(bad, Err(DomainError::Unauthorized(_))));

        svc.change_password(customer.id, "oldpassword", "newpassword")
            .await
            .unwrap();
        assert!(svc
            .authenticate("driver@example.com", "newpassword")
            .await
            .is_ok());
    }
}
