use clap::Parser;
use serde::Serialize;
use small_ledger::config::toml_config::StorageBackend;
use small_ledger::core::tax_id::digits_only;
use small_ledger::domain::ports::LedgerStore;
use small_ledger::utils::error::ErrorSeverity;
use small_ledger::utils::{logger, validation::Validate};
use small_ledger::{
    AccountService, CliConfig, Command, InMemoryStore, JsonFileStore, LedgerConfig, LedgerError,
    LedgerSettings, NewCompany, NewCustomer, TaxIdKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match &cli.config {
        Some(path) => match LedgerConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => LedgerConfig::default(),
    };

    // CLI overrides
    if let Some(store) = &cli.store {
        config.storage.backend = StorageBackend::Json;
        config.storage.path = store.clone();
    }

    logger::init_from_config(&config.logging, cli.verbose);

    tracing::info!("Starting small-ledger");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let settings = config.ledger.clone();
    let outcome = match config.storage.backend {
        StorageBackend::Json => match JsonFileStore::open(&config.storage.path).await {
            Ok(store) => {
                tracing::debug!("📁 Using store {}", store.path().display());
                run(AccountService::new(store, settings), cli.command).await
            }
            Err(e) => Err(e),
        },
        StorageBackend::Memory => {
            tracing::warn!("Memory backend selected, nothing is kept after exit");
            run(AccountService::new(InMemoryStore::new(), settings), cli.command).await
        }
    };

    match outcome {
        Ok(output) => println!("{}", output),
        Err(e) => exit_with(&e),
    }

    Ok(())
}

async fn run<S: LedgerStore>(
    service: AccountService<S, LedgerSettings>,
    command: Command,
) -> small_ledger::Result<String> {
    match command {
        Command::ValidateCpf { value } => check_tax_id(TaxIdKind::Cpf, &value),
        Command::ValidateCnpj { value } => check_tax_id(TaxIdKind::Cnpj, &value),
        Command::RegisterCompany { cnpj, name } => {
            to_json(&service.register_company(NewCompany { cnpj, name }).await?)
        }
        Command::RegisterCustomer {
            cpf,
            name,
            company_id,
        } => to_json(
            &service
                .register_customer(NewCustomer {
                    cpf,
                    name,
                    company_id,
                })
                .await?,
        ),
        Command::Credit { company_id, amount } => {
            to_json(&service.credit(&company_id, amount).await?)
        }
        Command::Debit { company_id, amount } => {
            to_json(&service.debit(&company_id, amount).await?)
        }
        Command::ShowCompany { id } => to_json(&service.company_overview(&id).await?),
        Command::ShowCustomer { id } => match service.customer(&id).await? {
            Some(customer) => to_json(&customer),
            None => Err(LedgerError::CustomerNotFound { id }),
        },
    }
}

fn check_tax_id(kind: TaxIdKind, value: &str) -> small_ledger::Result<String> {
    if kind.validate(value) {
        Ok(format!("✅ valid {}: {}", kind, digits_only(value)))
    } else {
        Err(LedgerError::InvalidTaxId {
            kind,
            value: value.to_string(),
        })
    }
}

fn to_json<T: Serialize>(value: &T) -> small_ledger::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn exit_with(e: &LedgerError) -> ! {
    tracing::error!(
        "❌ Operation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
