use crate::ic::ledger;
use crate::ic::network::ICNetwork;
use crate::stable_bet::bet_map;
use crate::stable_bet::stable_bet::BetStatus;
use crate::stable_settings::settings_map;
use crate::stable_user::user_map;

/// Admin/oracle-signed settlement of a single bet. Same conditional
/// transition and credit-reversion rules as the worker; a terminal bet is
/// refused rather than silently skipped.
pub async fn settle_bet(bet_id: &str, outcome: &str) -> Result<String, String> {
    let bet = bet_map::get_by_bet_id(bet_id).ok_or_else(|| format!("Bet {} not found", bet_id))?;
    if bet.status.is_terminal() || bet.status == BetStatus::Won {
        return Err("already settled".to_string());
    }

    let new_status = match outcome.to_lowercase().as_str() {
        "won" => BetStatus::Won,
        "lost" => BetStatus::Lost,
        "void" => BetStatus::Void,
        other => return Err(format!("Unknown outcome {}", other)),
    };

    let ts = ICNetwork::get_time();
    if !bet_map::update_status(bet_id, &[BetStatus::Pending, BetStatus::Confirmed], new_status, ts) {
        return Err("already settled".to_string());
    }

    if new_status != BetStatus::Won {
        return Ok(new_status.to_string());
    }

    let settings = settings_map::get();
    let gross = bet.potential_payout;
    let profit = (gross - bet.stake).max(0.0);
    let net = gross - profit * settings.platform_fee_rate;
    if let Err(e) = user_map::add_platform_balance(&bet.wallet_address, bet.currency, net) {
        bet_map::revert_status(bet_id, bet.status);
        return Err(format!("settlement reverted: {}", e));
    }

    if bet.tx_hash.is_some() && settings.payouts_onchain {
        match ledger::transfer_to_wallet(bet.currency, net, &bet.wallet_address).await {
            Ok(block_id) => {
                if bet_map::update_status(bet_id, &[BetStatus::Won], BetStatus::PaidOut, ICNetwork::get_time()) {
                    bet_map::set_settlement_tx_hash(bet_id, &block_id.to_string());
                }
                return Ok(BetStatus::PaidOut.to_string());
            }
            Err(e) => {
                // stays won for a later retry
                ICNetwork::error_log(&format!("On-chain payout for bet {} failed: {}", bet_id, e));
            }
        }
    }
    Ok(BetStatus::Won.to_string())
}
