use crate::adapters::memory::InMemoryStore;
use crate::domain::model::{Amount, Company, Customer, StoreSnapshot};
use crate::domain::ports::{CompanyRepository, CustomerRepository};
use crate::utils::error::{LedgerError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// [`InMemoryStore`] mirrored to a JSON file after every successful write.
///
/// A mutation whose file write fails is undone in memory before the error is
/// returned, so memory never runs ahead of the file.
#[derive(Debug)]
pub struct JsonFileStore {
    inner: InMemoryStore,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Loads `path` if it exists; a missing file starts an empty store.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let inner = if tokio::fs::try_exists(&path).await? {
            let data = tokio::fs::read(&path).await?;
            let snapshot: StoreSnapshot = serde_json::from_slice(&data)?;
            tracing::debug!(
                "Loaded {} companies and {} customers from {}",
                snapshot.companies.len(),
                snapshot.customers.len(),
                path.display()
            );
            InMemoryStore::from_snapshot(snapshot)?
        } else {
            tracing::debug!("No store at {}, starting empty", path.display());
            InMemoryStore::new()
        };

        Ok(Self {
            inner,
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_file(&self) -> Result<()> {
        let snapshot = self.inner.snapshot().await;
        let data = serde_json::to_vec_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write-then-rename so a crash never leaves a half-written store.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CompanyRepository for JsonFileStore {
    async fn insert_company(&self, company: Company) -> Result<Company> {
        let _guard = self.write_lock.lock().await;
        let company = self.inner.insert_company(company).await?;

        if let Err(e) = self.write_file().await {
            tracing::warn!("Store write failed, discarding company {}: {}", company.id, e);
            self.inner.discard_company(&company.id).await;
            return Err(e);
        }
        Ok(company)
    }

    async fn find_company(&self, id: &str) -> Result<Option<Company>> {
        self.inner.find_company(id).await
    }

    async fn find_company_by_cnpj(&self, cnpj: &str) -> Result<Option<Company>> {
        self.inner.find_company_by_cnpj(cnpj).await
    }

    async fn update_balance(
        &self,
        id: &str,
        expected_version: u64,
        balance: Amount,
    ) -> Result<Company> {
        let _guard = self.write_lock.lock().await;
        let previous = self
            .inner
            .find_company(id)
            .await?
            .ok_or_else(|| LedgerError::CompanyNotFound { id: id.to_string() })?;
        let company = self
            .inner
            .update_balance(id, expected_version, balance)
            .await?;

        if let Err(e) = self.write_file().await {
            tracing::warn!(
                "Store write failed, restoring company {} to version {}: {}",
                id,
                previous.version,
                e
            );
            self.inner.restore_balance(&previous).await;
            return Err(e);
        }
        Ok(company)
    }
}

#[async_trait]
impl CustomerRepository for JsonFileStore {
    async fn insert_customer(&self, customer: Customer) -> Result<Customer> {
        let _guard = self.write_lock.lock().await;
        let customer = self.inner.insert_customer(customer).await?;

        if let Err(e) = self.write_file().await {
            tracing::warn!("Store write failed, discarding customer {}: {}", customer.id, e);
            self.inner.discard_customer(&customer.id).await;
            return Err(e);
        }
        Ok(customer)
    }

    async fn find_customer(&self, id: &str) -> Result<Option<Customer>> {
        self.inner.find_customer(id).await
    }

    async fn find_customer_by_cpf(&self, cpf: &str) -> Result<Option<Customer>> {
        self.inner.find_customer_by_cpf(cpf).await
    }

    async fn customers_of(&self, company_id: &str) -> Result<Vec<Customer>> {
        self.inner.customers_of(company_id).await
    }
}
