use crate::domain::model::{Amount, Company};
use crate::utils::error::{LedgerError, Result};

/// What actually lands on the balance after the service fee is taken.
pub fn net_credit(amount: Amount, fee_rate: Amount) -> Option<Amount> {
    amount
        .checked_mul(fee_rate)
        .and_then(|fee| amount.checked_sub(fee))
}

/// Returns `company` with `amount` credited net of its fee rate.
/// Positivity of `amount` is checked by the caller.
pub fn credit(company: &Company, amount: Amount) -> Result<Company> {
    let balance = net_credit(amount, company.fee_rate)
        .and_then(|net| company.balance.checked_add(net))
        .ok_or_else(|| LedgerError::AmountOverflow {
            company_id: company.id.clone(),
        })?;

    Ok(Company {
        balance,
        ..company.clone()
    })
}

/// Returns `company` with `amount` debited. A debit that would leave the
/// balance negative fails with `InsufficientBalance`.
pub fn debit(company: &Company, amount: Amount) -> Result<Company> {
    let balance = company
        .balance
        .checked_sub(amount)
        .ok_or_else(|| LedgerError::AmountOverflow {
            company_id: company.id.clone(),
        })?;

    if balance < Amount::ZERO {
        return Err(LedgerError::InsufficientBalance {
            company_id: company.id.clone(),
            required: amount,
            available: company.balance,
        });
    }

    Ok(Company {
        balance,
        ..company.clone()
    })
}
