use crate::domain::model::{
    Amount, Company, CompanyId, Customer, CustomerId, StoreSnapshot, TaxIdKind,
};
use crate::domain::ports::{CompanyRepository, CustomerRepository};
use crate::utils::error::{LedgerError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    companies: HashMap<CompanyId, Company>,
    customers: HashMap<CustomerId, Customer>,
    company_by_cnpj: HashMap<String, CompanyId>,
    customer_by_cpf: HashMap<String, CustomerId>,
    // Foreign-key index: company -> its customers, in registration order.
    customers_by_company: HashMap<CompanyId, Vec<CustomerId>>,
}

impl Tables {
    fn add_company(&mut self, company: Company) -> Result<()> {
        if self.companies.contains_key(&company.id) {
            return Err(LedgerError::DuplicateId { id: company.id });
        }
        if self.company_by_cnpj.contains_key(&company.cnpj) {
            return Err(LedgerError::DuplicateTaxId {
                kind: TaxIdKind::Cnpj,
                value: company.cnpj,
            });
        }
        self.company_by_cnpj
            .insert(company.cnpj.clone(), company.id.clone());
        self.companies.insert(company.id.clone(), company);
        Ok(())
    }

    fn add_customer(&mut self, customer: Customer) -> Result<()> {
        if self.customers.contains_key(&customer.id) {
            return Err(LedgerError::DuplicateId { id: customer.id });
        }
        if self.customer_by_cpf.contains_key(&customer.cpf) {
            return Err(LedgerError::DuplicateTaxId {
                kind: TaxIdKind::Cpf,
                value: customer.cpf,
            });
        }
        if !self.companies.contains_key(&customer.company_id) {
            return Err(LedgerError::CompanyNotFound {
                id: customer.company_id,
            });
        }
        self.customer_by_cpf
            .insert(customer.cpf.clone(), customer.id.clone());
        self.customers_by_company
            .entry(customer.company_id.clone())
            .or_default()
            .push(customer.id.clone());
        self.customers.insert(customer.id.clone(), customer);
        Ok(())
    }

    fn remove_company(&mut self, id: &str) {
        if let Some(company) = self.companies.remove(id) {
            self.company_by_cnpj.remove(&company.cnpj);
        }
    }

    fn remove_customer(&mut self, id: &str) {
        if let Some(customer) = self.customers.remove(id) {
            self.customer_by_cpf.remove(&customer.cpf);
            if let Some(ids) = self.customers_by_company.get_mut(&customer.company_id) {
                ids.retain(|other| other != id);
            }
        }
    }
}

/// Process-local store guarded by a single read/write lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from a snapshot, re-checking uniqueness and foreign keys.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        let mut tables = Tables::default();
        for company in snapshot.companies {
            tables.add_company(company)?;
        }
        for customer in snapshot.customers {
            tables.add_customer(customer)?;
        }
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        let tables = self.tables.read().await;

        let mut companies: Vec<Company> = tables.companies.values().cloned().collect();
        companies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let mut customers: Vec<Customer> = tables.customers.values().cloned().collect();
        customers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        StoreSnapshot {
            companies,
            customers,
        }
    }

    /// Undoes a company insert whose effects could not be made durable.
    pub(crate) async fn discard_company(&self, id: &str) {
        self.tables.write().await.remove_company(id);
    }

    /// Undoes a customer insert whose effects could not be made durable.
    pub(crate) async fn discard_customer(&self, id: &str) {
        self.tables.write().await.remove_customer(id);
    }

    /// Puts back the balance and version a company had before a failed write.
    pub(crate) async fn restore_balance(&self, previous: &Company) {
        let mut tables = self.tables.write().await;
        if let Some(company) = tables.companies.get_mut(&previous.id) {
            company.balance = previous.balance;
            company.version = previous.version;
        }
    }
}

#[async_trait]
impl CompanyRepository for InMemoryStore {
    async fn insert_company(&self, company: Company) -> Result<Company> {
        let mut tables = self.tables.write().await;
        tables.add_company(company.clone())?;
        Ok(company)
    }

    async fn find_company(&self, id: &str) -> Result<Option<Company>> {
        Ok(self.tables.read().await.companies.get(id).cloned())
    }

    async fn find_company_by_cnpj(&self, cnpj: &str) -> Result<Option<Company>> {
        let tables = self.tables.read().await;
        Ok(tables
            .company_by_cnpj
            .get(cnpj)
            .and_then(|id| tables.companies.get(id))
            .cloned())
    }

    async fn update_balance(
        &self,
        id: &str,
        expected_version: u64,
        balance: Amount,
    ) -> Result<Company> {
        let mut tables = self.tables.write().await;
        let company = tables
            .companies
            .get_mut(id)
            .ok_or_else(|| LedgerError::CompanyNotFound { id: id.to_string() })?;

        if company.version != expected_version {
            return Err(LedgerError::VersionConflict {
                company_id: id.to_string(),
                expected: expected_version,
                found: company.version,
            });
        }

        company.balance = balance;
        company.version += 1;
        Ok(company.clone())
    }
}

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn insert_customer(&self, customer: Customer) -> Result<Customer> {
        let mut tables = self.tables.write().await;
        tables.add_customer(customer.clone())?;
        Ok(customer)
    }

    async fn find_customer(&self, id: &str) -> Result<Option<Customer>> {
        Ok(self.tables.read().await.customers.get(id).cloned())
    }

    async fn find_customer_by_cpf(&self, cpf: &str) -> Result<Option<Customer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .customer_by_cpf
            .get(cpf)
            .and_then(|id| tables.customers.get(id))
            .cloned())
    }

    async fn customers_of(&self, company_id: &str) -> Result<Vec<Customer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .customers_by_company
            .get(company_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| tables.customers.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn company(id: &str, cnpj: &str) -> Company {
        Company::new(id.to_string(), cnpj.to_string(), "Acme".to_string(), dec!(0.05))
    }

    fn customer(id: &str, cpf: &str, company_id: &str) -> Customer {
        Customer::new(
            id.to_string(),
            cpf.to_string(),
            "Maria".to_string(),
            company_id.to_string(),
        )
    }

    #[tokio::test]
    async fn test_unique_cnpj() {
        let store = InMemoryStore::new();
        store
            .insert_company(company("a", "12345678000195"))
            .await
            .unwrap();
        let err = store
            .insert_company(company("b", "12345678000195"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateTaxId { .. }));
        assert!(store.find_company("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_customer_foreign_key() {
        let store = InMemoryStore::new();
        let err = store
            .insert_customer(customer("x", "48247281856", "missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::CompanyNotFound { .. }));

        store
            .insert_company(company("a", "12345678000195"))
            .await
            .unwrap();
        store
            .insert_company(company("b", "11222333000181"))
            .await
            .unwrap();
        store
            .insert_customer(customer("x", "48247281856", "a"))
            .await
            .unwrap();
        store
            .insert_customer(customer("y", "52998224725", "b"))
            .await
            .unwrap();
        store
            .insert_customer(customer("z", "11144477735", "a"))
            .await
            .unwrap();

        let ids: Vec<String> = store
            .customers_of("a")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["x", "z"]);
        assert!(store.customers_of("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stale_version_rejected() {
        let store = InMemoryStore::new();
        store
            .insert_company(company("a", "12345678000195"))
            .await
            .unwrap();

        let updated = store.update_balance("a", 0, dec!(10)).await.unwrap();
        assert_eq!(updated.version, 1);

        let err = store.update_balance("a", 0, dec!(99)).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::VersionConflict {
                expected: 0,
                found: 1,
                ..
            }
        ));
        let stored = store.find_company("a").await.unwrap().unwrap();
        assert_eq!(stored.balance, dec!(10));
    }

    #[tokio::test]
    async fn test_snapshot_round_trip_keeps_indexes() {
        let store = InMemoryStore::new();
        store
            .insert_company(company("a", "12345678000195"))
            .await
            .unwrap();
        store
            .insert_customer(customer("x", "48247281856", "a"))
            .await
            .unwrap();

        let restored = InMemoryStore::from_snapshot(store.snapshot().await).unwrap();
        assert!(restored
            .find_company_by_cnpj("12345678000195")
            .await
            .unwrap()
            .is_some());
        assert_eq!(restored.customers_of("a").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_ids_rejected() {
        let store = InMemoryStore::new();
        store
            .insert_company(company("a", "12345678000195"))
            .await
            .unwrap();
        let err = store
            .insert_company(company("a", "11222333000181"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateId { ref id } if id == "a"));
        assert!(store
            .find_company_by_cnpj("11222333000181")
            .await
            .unwrap()
            .is_none());

        store
            .insert_customer(customer("x", "48247281856", "a"))
            .await
            .unwrap();
        let err = store
            .insert_customer(customer("x", "52998224725", "a"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateId { .. }));
        assert_eq!(store.customers_of("a").await.unwrap().len(), 1);
        let kept = store.find_customer("x").await.unwrap().unwrap();
        assert_eq!(kept.cpf, "48247281856");
    }

    #[test]
    fn test_snapshot_with_repeated_company_id_rejected() {
        let snapshot = StoreSnapshot {
            companies: vec![
                company("a", "12345678000195"),
                company("a", "11222333000181"),
            ],
            customers: vec![],
        };
        let err = InMemoryStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateId { .. }));
    }

    #[tokio::test]
    async fn test_discard_and_restore() {
        let store = InMemoryStore::new();
        store
            .insert_company(company("a", "12345678000195"))
            .await
            .unwrap();
        store
            .insert_customer(customer("x", "48247281856", "a"))
            .await
            .unwrap();

        let before = store.find_company("a").await.unwrap().unwrap();
        store.update_balance("a", 0, dec!(95)).await.unwrap();
        store.restore_balance(&before).await;
        let after = store.find_company("a").await.unwrap().unwrap();
        assert_eq!(after.balance, dec!(0));
        assert_eq!(after.version, 0);

        store.discard_customer("x").await;
        assert!(store.find_customer_by_cpf("48247281856").await.unwrap().is_none());
        assert!(store.customers_of("a").await.unwrap().is_empty());

        store.discard_company("a").await;
        assert!(store.find_company_by_cnpj("12345678000195").await.unwrap().is_none());
    }

    #[test]
    fn test_snapshot_with_dangling_customer_rejected() {
        let snapshot = StoreSnapshot {
            companies: vec![],
            customers: vec![customer("x", "48247281856", "gone")],
        };
        assert!(InMemoryStore::from_snapshot(snapshot).is_err());
    }
}
