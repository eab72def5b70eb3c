use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::ic::ledger;
use crate::ic::network::ICNetwork;
use crate::ic::verify_transfer;
use crate::stable_deposit::deposit_map;
use crate::stable_deposit::stable_deposit::StableDeposit;
use crate::stable_user::user_map;
use crate::token::Currency;

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct BalanceReply {
    pub wallet_address: String,
    pub onchain_sui: f64,
    pub onchain_sbets: f64,
    pub platform_sui: f64,
    pub platform_sbets: f64,
    pub bonus_balance: f64,
    pub free_bet_balance: u64,
    pub loyalty_points: f64,
}

/// Combined on-chain + platform balance. Ledger read failures degrade to
/// zero rather than failing the listing.
pub async fn get_user_balance(wallet_address: &str) -> BalanceReply {
    let now = ICNetwork::get_time();
    let user = user_map::get_or_create(wallet_address, now);
    let onchain_sui = ledger::wallet_balance(Currency::SUI, wallet_address).await.unwrap_or(0.0);
    let onchain_sbets = ledger::wallet_balance(Currency::SBETS, wallet_address).await.unwrap_or(0.0);
    BalanceReply {
        wallet_address: user.wallet_address,
        onchain_sui,
        onchain_sbets,
        platform_sui: user.balance_sui,
        platform_sbets: user.balance_sbets,
        bonus_balance: user.bonus_balance,
        free_bet_balance: user.free_bet_balance,
        loyalty_points: user.loyalty_points,
    }
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct DepositArgs {
    pub wallet_address: String,
    pub amount: f64,
    pub currency: Currency,
    pub tx_hash: String,
    pub skip_verification: bool,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct DepositReply {
    pub wallet_address: String,
    pub amount: f64,
    pub currency: Currency,
    pub duplicate: bool,
}

/// Credit a verified on-chain deposit. A replayed tx hash credits nothing
/// and reports the duplicate.
pub async fn deposit(args: DepositArgs) -> Result<DepositReply, String> {
    let now = ICNetwork::get_time();
    let wallet = args.wallet_address.to_lowercase();
    if args.amount <= 0.0 || !args.amount.is_finite() {
        return Err("Amount must be positive".to_string());
    }
    if args.tx_hash.trim().is_empty() {
        return Err("Transaction hash is required".to_string());
    }
    if deposit_map::tx_hash_exists(&args.tx_hash) {
        return Ok(DepositReply {
            wallet_address: wallet,
            amount: 0.0,
            currency: args.currency,
            duplicate: true,
        });
    }

    if !args.skip_verification {
        verify_transfer::verify_deposit(args.currency, &args.tx_hash, args.amount)
            .await
            .map_err(|e| format!("Unconfirmed transaction: {}", e))?;
    }

    let record = StableDeposit {
        tx_hash: args.tx_hash.clone(),
        wallet_address: wallet.clone(),
        amount: args.amount,
        currency: args.currency,
        created_at: now,
    };
    if !deposit_map::insert_once(&record) {
        // raced with another deposit of the same tx between the check and here
        return Ok(DepositReply {
            wallet_address: wallet,
            amount: 0.0,
            currency: args.currency,
            duplicate: true,
        });
    }

    user_map::get_or_create(&wallet, now);
    user_map::add_platform_balance(&wallet, args.currency, args.amount)?;
    Ok(DepositReply {
        wallet_address: wallet,
        amount: args.amount,
        currency: args.currency,
        duplicate: false,
    })
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawArgs {
    pub wallet_address: String,
    pub amount: f64,
    pub currency: Currency,
    pub execute_onchain: bool,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawReply {
    pub status: String, // "completed" | "pending"
    pub amount: f64,
    pub currency: Currency,
    pub tx_hash: Option<String>,
}

/// Debit the platform balance. With `execute_onchain` the funds leave
/// immediately; otherwise the withdrawal queues for manual processing. A
/// failed transfer restores the balance.
pub async fn withdraw(args: WithdrawArgs) -> Result<WithdrawReply, String> {
    let wallet = args.wallet_address.to_lowercase();
    if args.amount <= 0.0 || !args.amount.is_finite() {
        return Err("Amount must be positive".to_string());
    }
    user_map::deduct_platform_balance(&wallet, args.currency, args.amount)?;

    if !args.execute_onchain {
        return Ok(WithdrawReply {
            status: "pending".to_string(),
            amount: args.amount,
            currency: args.currency,
            tx_hash: None,
        });
    }

    match ledger::transfer_to_wallet(args.currency, args.amount, &wallet).await {
        Ok(block_id) => Ok(WithdrawReply {
            status: "completed".to_string(),
            amount: args.amount,
            currency: args.currency,
            tx_hash: Some(block_id.to_string()),
        }),
        Err(e) => {
            // restore the debit so the user keeps their funds
            user_map::add_platform_balance(&wallet, args.currency, args.amount)?;
            Err(format!("Withdrawal failed: {}", e))
        }
    }
}
