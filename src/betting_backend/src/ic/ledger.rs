use candid::{Nat, Principal};
use icrc_ledger_types::icrc1::account::Account;
use icrc_ledger_types::icrc1::transfer::{TransferArg, TransferError};
use num_traits::cast::ToPrimitive;

use crate::stable_settings::settings_map;
use crate::token::Currency;

/// Subaccount holding treasury funds. Staking principal and rewards are paid
/// out of here with a two-step withdraw-then-send.
pub const TREASURY_SUBACCOUNT: [u8; 32] = [
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Ledger canister for a currency. Errors when the ledger has not been
/// configured yet so payouts fail loudly instead of burning into a void.
pub fn ledger_id(currency: Currency) -> Result<Principal, String> {
    let settings = settings_map::get();
    let ledger = match currency {
        Currency::SUI => settings.sui_ledger,
        Currency::SBETS => settings.sbets_ledger,
    };
    if ledger == Principal::anonymous() {
        return Err(format!("{} ledger is not configured", currency));
    }
    Ok(ledger)
}

/// Destination account for a wallet address string. Wallets are opaque
/// addresses at the platform layer; only here are they bound to a ledger
/// account.
pub fn wallet_account(wallet_address: &str) -> Result<Account, String> {
    let owner =
        Principal::from_text(wallet_address).map_err(|e| format!("Invalid wallet address {}: {}", wallet_address, e))?;
    Ok(Account { owner, subaccount: None })
}

pub fn canister_account() -> Account {
    Account {
        owner: ic_cdk::api::canister_self(),
        subaccount: None,
    }
}

pub fn treasury_account() -> Account {
    Account {
        owner: ic_cdk::api::canister_self(),
        subaccount: Some(TREASURY_SUBACCOUNT),
    }
}

/// Token units (f64) to ledger base units. Monetary values stay in token
/// units everywhere above this seam.
pub fn to_base_units(amount: f64, decimals: u8) -> Result<Nat, String> {
    if amount < 0.0 || !amount.is_finite() {
        return Err(format!("Invalid transfer amount {}", amount));
    }
    let scaled = amount * 10_f64.powi(decimals as i32);
    Ok(Nat::from(scaled.round() as u128))
}

pub fn from_base_units(amount: &Nat, decimals: u8) -> f64 {
    let raw = amount.0.to_f64().unwrap_or(0.0);
    raw / 10_f64.powi(decimals as i32)
}

async fn icrc1_transfer(ledger: Principal, args: TransferArg) -> Result<Nat, String> {
    match ic_cdk::call::Call::unbounded_wait(ledger, "icrc1_transfer")
        .with_arg(args)
        .await
        .map_err(|e| format!("{:?}", e))?
        .candid::<(Result<Nat, TransferError>,)>()
        .map_err(|e| format!("{:?}", e))?
        .0
    {
        Ok(block_id) => Ok(block_id),
        Err(e) => Err(format!("{:?}", e)),
    }
}

/// Send `amount` tokens from the canister's default account to a user wallet.
/// Returns the ledger block index which doubles as the settlement tx hash.
pub async fn transfer_to_wallet(currency: Currency, amount: f64, wallet_address: &str) -> Result<Nat, String> {
    // if amount = 0, return Ok(block_id = 0) to return success. Don't error as
    // callers treat Err as a failed payout needing retry
    if amount == 0.0 {
        return Ok(Nat::from(0u64));
    }
    let ledger = ledger_id(currency)?;
    let to = wallet_account(wallet_address)?;
    let args = TransferArg {
        from_subaccount: None,
        to,
        fee: None,
        created_at_time: None,
        memo: None,
        amount: to_base_units(amount, currency.decimals())?,
    };
    icrc1_transfer(ledger, args).await
}

/// Step one of the treasury payout path: move funds from the treasury
/// subaccount to the canister's sending account.
pub async fn withdraw_from_treasury(currency: Currency, amount: f64) -> Result<Nat, String> {
    if amount == 0.0 {
        return Ok(Nat::from(0u64));
    }
    let ledger = ledger_id(currency)?;
    let args = TransferArg {
        from_subaccount: Some(TREASURY_SUBACCOUNT),
        to: canister_account(),
        fee: None,
        created_at_time: None,
        memo: None,
        amount: to_base_units(amount, currency.decimals())?,
    };
    icrc1_transfer(ledger, args).await
}

pub async fn balance_of(currency: Currency, account: Account) -> Result<Nat, String> {
    let ledger = ledger_id(currency)?;
    Ok(ic_cdk::call::Call::unbounded_wait(ledger, "icrc1_balance_of")
        .with_arg(account)
        .await
        .map_err(|e| format!("{:?}", e))?
        .candid::<(Nat,)>()
        .map_err(|e| format!("{:?}", e))?
        .0)
}

/// Balance of a user wallet on the given ledger, in token units.
pub async fn wallet_balance(currency: Currency, wallet_address: &str) -> Result<f64, String> {
    let account = wallet_account(wallet_address)?;
    let balance = balance_of(currency, account).await?;
    Ok(from_base_units(&balance, currency.decimals()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_unit_round_trip() {
        let nat = to_base_units(1.5, 9).unwrap();
        assert_eq!(nat, Nat::from(1_500_000_000u64));
        assert!((from_base_units(&nat, 9) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_base_units_reject_negative() {
        assert!(to_base_units(-0.1, 9).is_err());
        assert!(to_base_units(f64::NAN, 9).is_err());
    }
}
