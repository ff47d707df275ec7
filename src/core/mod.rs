pub mod accounts;
pub mod balance;
pub mod cnpj;
pub mod cpf;
pub mod tax_id;

pub use crate::domain::model::{Amount, Company, Customer, TaxIdKind};
pub use crate::domain::ports::{
    CompanyRepository, ConfigProvider, CustomerRepository, IdGenerator, LedgerStore,
};
pub use crate::utils::error::Result;
pub use cnpj::validate_cnpj;
pub use cpf::validate_cpf;
