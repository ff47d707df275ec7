pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::Amount;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "small-ledger")]
#[command(about = "Register companies and customers and move company balances")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the JSON store path from the configuration
    #[arg(long)]
    pub store: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check a CPF (punctuation allowed)
    ValidateCpf { value: String },

    /// Check a CNPJ (punctuation allowed)
    ValidateCnpj { value: String },

    RegisterCompany {
        #[arg(long)]
        cnpj: String,
        #[arg(long)]
        name: String,
    },

    RegisterCustomer {
        #[arg(long)]
        cpf: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        company_id: String,
    },

    /// Credit a company, net of its service fee
    Credit {
        #[arg(long)]
        company_id: String,
        #[arg(long)]
        amount: Amount,
    },

    /// Debit a company; fails when the balance is too low
    Debit {
        #[arg(long)]
        company_id: String,
        #[arg(long)]
        amount: Amount,
    },

    /// Show a company and its customers
    ShowCompany { id: String },

    ShowCustomer { id: String },
}
