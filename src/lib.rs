pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{InMemoryStore, JsonFileStore, UuidGenerator};
pub use config::toml_config::{LedgerConfig, LedgerSettings};
pub use crate::core::accounts::AccountService;
pub use crate::core::balance::{credit, debit};
pub use crate::core::{validate_cnpj, validate_cpf};
pub use domain::model::{Amount, Company, Customer, NewCompany, NewCustomer, TaxIdKind};
pub use utils::error::{LedgerError, Result};
