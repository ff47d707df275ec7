use crate::domain::model::{Amount, Company, Customer};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Fails with `DuplicateTaxId` when the CNPJ is already taken.
    async fn insert_company(&self, company: Company) -> Result<Company>;
    async fn find_company(&self, id: &str) -> Result<Option<Company>>;
    async fn find_company_by_cnpj(&self, cnpj: &str) -> Result<Option<Company>>;
    /// Writes `balance` only if the stored version still equals `expected_version`.
    async fn update_balance(
        &self,
        id: &str,
        expected_version: u64,
        balance: Amount,
    ) -> Result<Company>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Fails with `DuplicateTaxId` when the CPF is already taken.
    async fn insert_customer(&self, customer: Customer) -> Result<Customer>;
    async fn find_customer(&self, id: &str) -> Result<Option<Customer>>;
    async fn find_customer_by_cpf(&self, cpf: &str) -> Result<Option<Customer>>;
    async fn customers_of(&self, company_id: &str) -> Result<Vec<Customer>>;
}

pub trait LedgerStore: CompanyRepository + CustomerRepository {}

impl<T: CompanyRepository + CustomerRepository> LedgerStore for T {}

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn default_fee_rate(&self) -> Amount;
}
