use candid::Nat;
use icrc_ledger_types::icrc3::transactions::{GetTransactionsRequest, GetTransactionsResponse};

use crate::ic::ledger::{self, canister_account};
use crate::token::Currency;

/// Verify that a deposit transaction exists on the ledger, pays the platform
/// account, and carries at least the claimed amount. The tx hash of a deposit
/// is the ledger block index.
pub async fn verify_deposit(currency: Currency, tx_hash: &str, expected_amount: f64) -> Result<(), String> {
    let block_index = tx_hash
        .parse::<u64>()
        .map_err(|_| format!("Invalid transaction hash {}", tx_hash))?;
    let ledger_principal = ledger::ledger_id(currency)?;

    let request = GetTransactionsRequest {
        start: Nat::from(block_index),
        length: Nat::from(1u64),
    };
    let response = ic_cdk::call::Call::unbounded_wait(ledger_principal, "get_transactions")
        .with_arg(request)
        .await
        .map_err(|e| format!("{:?}", e))?
        .candid::<(GetTransactionsResponse,)>()
        .map_err(|e| format!("{:?}", e))?
        .0;

    let transaction = response
        .transactions
        .first()
        .ok_or_else(|| format!("Transaction {} not found on {} ledger", tx_hash, currency))?;
    let transfer = transaction
        .transfer
        .as_ref()
        .ok_or_else(|| format!("Transaction {} is not a transfer", tx_hash))?;

    if transfer.to != canister_account() {
        return Err(format!("Transaction {} does not pay the platform account", tx_hash));
    }
    let expected = ledger::to_base_units(expected_amount, currency.decimals())?;
    if transfer.amount < expected {
        return Err(format!(
            "Transaction {} amount mismatch: expected {} but got {}",
            tx_hash, expected, transfer.amount
        ));
    }

    Ok(())
}
