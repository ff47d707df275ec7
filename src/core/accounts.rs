use crate::adapters::ids::UuidGenerator;
use crate::core::balance;
use crate::core::tax_id::digits_only;
use crate::core::{ConfigProvider, IdGenerator, LedgerStore};
use crate::domain::model::{
    Amount, Company, CompanyOverview, Customer, NewCompany, NewCustomer, TaxIdKind,
};
use crate::utils::error::{LedgerError, Result};
use crate::utils::validation::{
    validate_not_blank, validate_positive_amount, validate_range, Validate,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

impl Validate for NewCompany {
    fn validate(&self) -> Result<()> {
        validate_not_blank("cnpj", &self.cnpj)?;
        validate_not_blank("name", &self.name)
    }
}

impl Validate for NewCustomer {
    fn validate(&self) -> Result<()> {
        validate_not_blank("cpf", &self.cpf)?;
        validate_not_blank("name", &self.name)?;
        validate_not_blank("company_id", &self.company_id)
    }
}

#[derive(Debug, Clone, Copy)]
enum BalanceOp {
    Credit,
    Debit,
}

/// Registration, lookup and balance changes on top of a [`LedgerStore`].
///
/// Balance changes for one company are serialized in-process by a
/// per-company lock; the store's versioned write rejects anything that
/// slipped past it from another writer.
pub struct AccountService<S: LedgerStore, C: ConfigProvider> {
    store: S,
    config: C,
    ids: Arc<dyn IdGenerator>,
    balance_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S: LedgerStore, C: ConfigProvider> AccountService<S, C> {
    pub fn new(store: S, config: C) -> Self {
        Self::with_id_generator(store, config, Arc::new(UuidGenerator))
    }

    pub fn with_id_generator(store: S, config: C, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store,
            config,
            ids,
            balance_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn register_company(&self, request: NewCompany) -> Result<Company> {
        request.validate()?;

        let cnpj = TaxIdKind::Cnpj
            .normalize(&request.cnpj)
            .ok_or_else(|| LedgerError::InvalidTaxId {
                kind: TaxIdKind::Cnpj,
                value: request.cnpj.clone(),
            })?;

        let fee_rate = self.config.default_fee_rate();
        validate_range("default_fee_rate", fee_rate, Amount::ZERO, Amount::ONE)?;

        if self.store.find_company_by_cnpj(&cnpj).await?.is_some() {
            return Err(LedgerError::DuplicateTaxId {
                kind: TaxIdKind::Cnpj,
                value: cnpj,
            });
        }

        let company = Company::new(
            self.ids.next_id(),
            cnpj,
            request.name.trim().to_string(),
            fee_rate,
        );
        let company = self.store.insert_company(company).await?;

        tracing::info!(company_id = %company.id, cnpj = %company.cnpj, "registered company");
        Ok(company)
    }

    pub async fn register_customer(&self, request: NewCustomer) -> Result<Customer> {
        request.validate()?;

        let cpf = TaxIdKind::Cpf
            .normalize(&request.cpf)
            .ok_or_else(|| LedgerError::InvalidTaxId {
                kind: TaxIdKind::Cpf,
                value: request.cpf.clone(),
            })?;

        if self.store.find_customer_by_cpf(&cpf).await?.is_some() {
            return Err(LedgerError::DuplicateTaxId {
                kind: TaxIdKind::Cpf,
                value: cpf,
            });
        }

        let company_id = request.company_id.trim();
        if self.store.find_company(company_id).await?.is_none() {
            return Err(LedgerError::CompanyNotFound {
                id: company_id.to_string(),
            });
        }

        let customer = Customer::new(
            self.ids.next_id(),
            cpf,
            request.name.trim().to_string(),
            company_id.to_string(),
        );
        let customer = self.store.insert_customer(customer).await?;

        tracing::info!(
            customer_id = %customer.id,
            company_id = %customer.company_id,
            "registered customer"
        );
        Ok(customer)
    }

    pub async fn company(&self, id: &str) -> Result<Option<Company>> {
        tracing::debug!("Looking up company {}", id);
        self.store.find_company(id).await
    }

    pub async fn company_by_cnpj(&self, cnpj: &str) -> Result<Option<Company>> {
        self.store.find_company_by_cnpj(&digits_only(cnpj)).await
    }

    pub async fn customer(&self, id: &str) -> Result<Option<Customer>> {
        tracing::debug!("Looking up customer {}", id);
        self.store.find_customer(id).await
    }

    pub async fn customer_by_cpf(&self, cpf: &str) -> Result<Option<Customer>> {
        self.store.find_customer_by_cpf(&digits_only(cpf)).await
    }

    pub async fn customers_of(&self, company_id: &str) -> Result<Vec<Customer>> {
        self.require_company(company_id).await?;
        self.store.customers_of(company_id).await
    }

    pub async fn company_overview(&self, company_id: &str) -> Result<CompanyOverview> {
        let company = self.require_company(company_id).await?;
        let customers = self.store.customers_of(company_id).await?;
        Ok(CompanyOverview { company, customers })
    }

    /// Credits `amount` minus the company's service fee.
    pub async fn credit(&self, company_id: &str, amount: Amount) -> Result<Company> {
        self.apply(company_id, amount, BalanceOp::Credit).await
    }

    /// Debits `amount`; refuses to take the balance below zero.
    pub async fn debit(&self, company_id: &str, amount: Amount) -> Result<Company> {
        self.apply(company_id, amount, BalanceOp::Debit).await
    }

    async fn apply(&self, company_id: &str, amount: Amount, op: BalanceOp) -> Result<Company> {
        validate_positive_amount("amount", amount)?;
        // Unknown ids never get a lock entry.
        self.require_company(company_id).await?;

        let lock = self.balance_lock(company_id);
        let _guard = lock.lock().await;

        let company = self.require_company(company_id).await?;
        let updated = match op {
            BalanceOp::Credit => balance::credit(&company, amount),
            BalanceOp::Debit => balance::debit(&company, amount),
        };

        let updated = match updated {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!(company_id, %amount, ?op, "balance change rejected: {}", e);
                return Err(e);
            }
        };

        let saved = self
            .store
            .update_balance(&company.id, company.version, updated.balance)
            .await?;

        tracing::info!(
            company_id,
            ?op,
            %amount,
            previous = %company.balance,
            balance = %saved.balance,
            "balance updated"
        );
        Ok(saved)
    }

    async fn require_company(&self, company_id: &str) -> Result<Company> {
        self.store
            .find_company(company_id)
            .await?
            .ok_or_else(|| LedgerError::CompanyNotFound {
                id: company_id.to_string(),
            })
    }

    fn balance_lock(&self, company_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .balance_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Entries only the map still references are idle.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry(company_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    #[cfg(test)]
    fn lock_entries(&self) -> usize {
        self.balance_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
