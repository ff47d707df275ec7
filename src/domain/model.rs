use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type CompanyId = String;
pub type CustomerId = String;

// Money and fee rates are decimals so that fee deductions stay exact.
pub type Amount = Decimal;

/// 5% service fee applied to credits when the configuration says nothing else.
pub const DEFAULT_FEE_RATE: Amount = Decimal::from_parts(5, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxIdKind {
    Cpf,
    Cnpj,
}

impl fmt::Display for TaxIdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxIdKind::Cpf => write!(f, "CPF"),
            TaxIdKind::Cnpj => write!(f, "CNPJ"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub cnpj: String,
    pub name: String,
    pub balance: Amount,
    pub fee_rate: Amount,
    /// Bumped by the store on every balance write.
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// A freshly registered company: zero balance, version 0.
    pub fn new(id: CompanyId, cnpj: String, name: String, fee_rate: Amount) -> Self {
        Self {
            id,
            cnpj,
            name,
            balance: Amount::ZERO,
            fee_rate,
            version: 0,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub cpf: String,
    pub name: String,
    pub company_id: CompanyId,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(id: CustomerId, cpf: String, name: String, company_id: CompanyId) -> Self {
        Self {
            id,
            cpf,
            name,
            company_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCompany {
    pub cnpj: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub cpf: String,
    pub name: String,
    pub company_id: CompanyId,
}

/// A company together with the customers that reference it.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyOverview {
    #[serde(flatten)]
    pub company: Company,
    pub customers: Vec<Customer>,
}

/// Serializable image of a whole store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub companies: Vec<Company>,
    pub customers: Vec<Customer>,
}
