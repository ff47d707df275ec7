use anyhow::Result;
use rust_decimal_macros::dec;
use small_ledger::{AccountService, InMemoryStore, LedgerSettings, NewCompany};
use std::sync::Arc;

async fn funded_company(
    service: &AccountService<InMemoryStore, LedgerSettings>,
    cnpj: &str,
) -> Result<String> {
    let company = service
        .register_company(NewCompany {
            cnpj: cnpj.to_string(),
            name: "Acme".to_string(),
        })
        .await?;
    Ok(company.id)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_credits_lose_no_update() -> Result<()> {
    let service = Arc::new(AccountService::new(
        InMemoryStore::new(),
        LedgerSettings::default(),
    ));
    let company_id = funded_company(&service, "12345678000195").await?;

    let mut handles = Vec::new();
    for _ in 0..50 {
        let service = Arc::clone(&service);
        let company_id = company_id.clone();
        handles.push(tokio::spawn(async move {
            service.credit(&company_id, dec!(10)).await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let company = service.company(&company_id).await?.expect("company exists");
    // 50 credits of 10 net of 5%
    assert_eq!(company.balance, dec!(475));
    assert_eq!(company.version, 50);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_debits_never_overdraw() -> Result<()> {
    let service = Arc::new(AccountService::new(
        InMemoryStore::new(),
        LedgerSettings::default(),
    ));
    let company_id = funded_company(&service, "11222333000181").await?;
    service.credit(&company_id, dec!(100)).await?; // 95 available

    let mut handles = Vec::new();
    for _ in 0..20 {
        let service = Arc::clone(&service);
        let company_id = company_id.clone();
        handles.push(tokio::spawn(async move {
            service.debit(&company_id, dec!(10)).await
        }));
    }

    let mut succeeded = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => succeeded += 1,
            Err(e) if e.is_insufficient_balance() => rejected += 1,
            Err(e) => return Err(e.into()),
        }
    }

    assert_eq!(succeeded, 9);
    assert_eq!(rejected, 11);

    let company = service.company(&company_id).await?.expect("company exists");
    assert_eq!(company.balance, dec!(5));
    Ok(())
}
