use std::time::Duration;

use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::helpers::time_helpers::week_start;
use crate::ic::delay::sleep;
use crate::ic::ledger;
use crate::ic::network::ICNetwork;
use crate::stable_revenue::revenue_claim_map;
use crate::stable_revenue::stable_revenue_claim::StableRevenueClaim;
use crate::stable_settings::settings_map;
use crate::token::Currency;

use super::holders;
use super::revenue::weekly_revenue;

const PAYOUT_GAP_SECS: u64 = 2;

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct ClaimableReply {
    pub wallet_address: String,
    pub week_start: u64,
    pub holder_balance: f64,
    pub share_percentage: f64,
    pub claimable_sui: f64,
    pub claimable_sbets: f64,
    pub already_claimed: bool,
}

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct ClaimReply {
    pub wallet_address: String,
    pub week_start: u64,
    pub claimed_sui: f64,
    pub claimed_sbets: f64,
    pub sui_tx_hash: Option<String>,
    pub sbets_tx_hash: Option<String>,
    pub duplicate: bool,
}

struct ClaimComputation {
    week: u64,
    balance: f64,
    ratio: f64,
    claim_sui: f64,
    claim_sbets: f64,
}

async fn compute_claim(wallet: &str) -> ClaimComputation {
    let now = ICNetwork::get_time();
    let settings = settings_map::get();
    let week = week_start(now);

    let totals = weekly_revenue(now);
    let pool_sui = totals.sui * settings.revenue_share_holders;
    let pool_sbets = totals.sbets * settings.revenue_share_holders;

    let snapshot = holders::get_holders().await;
    let balance = holders::holder_balance(&snapshot, wallet);
    let circulating = holders::circulating(&snapshot);
    let ratio = if circulating > 0.0 { (balance / circulating).min(1.0) } else { 0.0 };

    ClaimComputation {
        week,
        balance,
        ratio,
        claim_sui: pool_sui * ratio,
        claim_sbets: pool_sbets * ratio,
    }
}

pub async fn get_claimable(wallet_address: &str) -> ClaimableReply {
    let wallet = wallet_address.to_lowercase();
    let computation = compute_claim(&wallet).await;
    let already_claimed = revenue_claim_map::get(&wallet, computation.week).is_some();
    ClaimableReply {
        wallet_address: wallet,
        week_start: computation.week,
        holder_balance: computation.balance,
        share_percentage: computation.ratio * 100.0,
        claimable_sui: computation.claim_sui,
        claimable_sbets: computation.claim_sbets,
        already_claimed,
    }
}

/// Claim this week's holder share. One claim row per (wallet, week); a
/// replay returns the stored tx hashes instead of paying again. The row is
/// inserted before the payouts so a trap mid-payout can never double-pay.
pub async fn claim_revenue(wallet_address: &str) -> Result<ClaimReply, String> {
    let wallet = wallet_address.to_lowercase();
    let now = ICNetwork::get_time();
    let settings = settings_map::get();

    let week = week_start(now);
    if let Some(existing) = revenue_claim_map::get(&wallet, week) {
        return Ok(replay_reply(&existing));
    }

    let computation = compute_claim(&wallet).await;
    if computation.claim_sui < settings.min_claim_sui && computation.claim_sbets < settings.min_claim_sbets {
        return Err("amount too small".to_string());
    }

    let claim = StableRevenueClaim {
        wallet_address: wallet.clone(),
        week_start: computation.week,
        holder_balance: computation.balance,
        share_percentage: computation.ratio * 100.0,
        claimed_sui: computation.claim_sui,
        claimed_sbets: computation.claim_sbets,
        sui_tx_hash: None,
        sbets_tx_hash: None,
        claimed_at: now,
    };
    if let Err(existing) = revenue_claim_map::insert_once(&claim) {
        // a concurrent claim for the same week beat this one
        return Ok(replay_reply(&existing));
    }

    // two independent payouts; partial success keeps the best-known hashes
    let mut sui_tx = None;
    let mut sbets_tx = None;
    if computation.claim_sui >= settings.min_claim_sui {
        match ledger::transfer_to_wallet(Currency::SUI, computation.claim_sui, &wallet).await {
            Ok(block_id) => sui_tx = Some(block_id.to_string()),
            Err(e) => ICNetwork::error_log(&format!("Revenue claim SUI payout to {} failed: {}", wallet, e)),
        }
        sleep(Duration::from_secs(PAYOUT_GAP_SECS)).await;
    }
    if computation.claim_sbets >= settings.min_claim_sbets {
        match ledger::transfer_to_wallet(Currency::SBETS, computation.claim_sbets, &wallet).await {
            Ok(block_id) => sbets_tx = Some(block_id.to_string()),
            Err(e) => ICNetwork::error_log(&format!("Revenue claim SBETS payout to {} failed: {}", wallet, e)),
        }
    }
    revenue_claim_map::set_tx_hashes(&wallet, computation.week, sui_tx.clone(), sbets_tx.clone());

    Ok(ClaimReply {
        wallet_address: wallet,
        week_start: computation.week,
        claimed_sui: computation.claim_sui,
        claimed_sbets: computation.claim_sbets,
        sui_tx_hash: sui_tx,
        sbets_tx_hash: sbets_tx,
        duplicate: false,
    })
}

fn replay_reply(existing: &StableRevenueClaim) -> ClaimReply {
    ClaimReply {
        wallet_address: existing.wallet_address.clone(),
        week_start: existing.week_start,
        claimed_sui: existing.claimed_sui,
        claimed_sbets: existing.claimed_sbets,
        sui_tx_hash: existing.sui_tx_hash.clone(),
        sbets_tx_hash: existing.sbets_tx_hash.clone(),
        duplicate: true,
    }
}
