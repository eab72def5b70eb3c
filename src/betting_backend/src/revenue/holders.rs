use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use candid::CandidType;
use ic_cdk::management_canister::{http_request, HttpMethod, HttpRequestArgs};
use serde::{Deserialize, Serialize};

use crate::helpers::time_helpers::NANOS_PER_MINUTE;
use crate::ic::delay::sleep;
use crate::ic::ledger;
use crate::ic::network::ICNetwork;
use crate::stable_settings::settings_map;
use crate::stable_user::user_map;
use crate::token::Currency;

const CACHE_TTL_NS: u64 = 5 * NANOS_PER_MINUTE;
const MAX_PAGES: u32 = 20;
const MAX_HOLDERS: usize = 1_000;
const PAGE_DELAY_MS: u64 = 1_500;

#[derive(CandidType, Debug, Clone, Serialize, Deserialize)]
pub struct Holder {
    pub wallet_address: String,
    pub balance: f64, // SBETS
    pub percentage: f64,
}

#[derive(Debug, Clone, Default)]
struct HoldersCache {
    holders: Vec<Holder>,
    fetched_at: u64,
}

thread_local! {
    static HOLDERS_CACHE: Rc<RefCell<HoldersCache>> = Rc::new(RefCell::default());
}

#[derive(Debug, Deserialize)]
struct HoldersPage {
    holders: Vec<HolderEntry>,
}

#[derive(Debug, Deserialize)]
struct HolderEntry {
    address: String,
    balance: f64,
}

/// Token holders snapshot, 5-minute cached. Upstream API first, paged with a
/// rate-limit delay; repository wallets plus per-wallet ledger balances as
/// fallback. Platform wallets never count as holders.
pub async fn get_holders() -> Vec<Holder> {
    let now = ICNetwork::get_time();
    let cached = HOLDERS_CACHE.with(|c| c.borrow().clone());
    if !cached.holders.is_empty() && now.saturating_sub(cached.fetched_at) < CACHE_TTL_NS {
        return cached.holders;
    }

    let holders = match fetch_holders_upstream().await {
        Ok(holders) if !holders.is_empty() => holders,
        Ok(_) | Err(_) => fetch_holders_fallback().await,
    };
    let holders = with_percentages(holders);

    HOLDERS_CACHE.with(|c| {
        *c.borrow_mut() = HoldersCache {
            holders: holders.clone(),
            fetched_at: now,
        };
    });
    holders
}

async fn fetch_holders_upstream() -> Result<Vec<Holder>, String> {
    let settings = settings_map::get();
    if settings.holders_api_url.is_empty() {
        return Err("Holders API is not configured".to_string());
    }

    let mut holders: Vec<Holder> = Vec::new();
    for page in 1..=MAX_PAGES {
        if page > 1 {
            // upstream rate limit
            sleep(Duration::from_millis(PAGE_DELAY_MS)).await;
        }
        let args = HttpRequestArgs {
            url: format!("{}/holders?page={}", settings.holders_api_url, page),
            method: HttpMethod::GET,
            headers: Vec::new(),
            body: None,
            max_response_bytes: Some(500_000),
            transform: None,
        };
        let response = http_request(&args).await.map_err(|e| format!("{:?}", e))?;
        let parsed: HoldersPage =
            serde_json::from_slice(&response.body).map_err(|e| format!("Holders parse error: {}", e))?;
        if parsed.holders.is_empty() {
            break;
        }
        for entry in parsed.holders {
            let wallet = entry.address.to_lowercase();
            if settings.platform_wallets.iter().any(|w| w.to_lowercase() == wallet) {
                continue;
            }
            holders.push(Holder {
                wallet_address: wallet,
                balance: entry.balance,
                percentage: 0.0,
            });
            if holders.len() >= MAX_HOLDERS {
                return Ok(holders);
            }
        }
    }
    Ok(holders)
}

/// Enumerate known wallets and read their balances on-chain. Slow, but only
/// runs when the upstream API is down.
async fn fetch_holders_fallback() -> Vec<Holder> {
    let settings = settings_map::get();
    let mut holders = Vec::new();
    for wallet in user_map::all_wallets() {
        if settings.platform_wallets.iter().any(|w| w.to_lowercase() == wallet) {
            continue;
        }
        match ledger::wallet_balance(Currency::SBETS, &wallet).await {
            Ok(balance) if balance > 0.0 => holders.push(Holder {
                wallet_address: wallet,
                balance,
                percentage: 0.0,
            }),
            Ok(_) => {}
            Err(e) => ICNetwork::error_log(&format!("Holder balance read failed for {}: {}", wallet, e)),
        }
        if holders.len() >= MAX_HOLDERS {
            break;
        }
    }
    holders
}

fn with_percentages(mut holders: Vec<Holder>) -> Vec<Holder> {
    let total: f64 = holders.iter().map(|h| h.balance).sum();
    if total > 0.0 {
        for holder in holders.iter_mut() {
            holder.percentage = holder.balance / total * 100.0;
        }
    }
    holders
}

/// Circulating supply as the holders snapshot sees it.
pub fn circulating(holders: &[Holder]) -> f64 {
    holders.iter().map(|h| h.balance).sum()
}

pub fn holder_balance(holders: &[Holder], wallet_address: &str) -> f64 {
    let wallet = wallet_address.to_lowercase();
    holders
        .iter()
        .find(|h| h.wallet_address == wallet)
        .map(|h| h.balance)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages() {
        let holders = with_percentages(vec![
            Holder {
                wallet_address: "0xa".to_string(),
                balance: 750.0,
                percentage: 0.0,
            },
            Holder {
                wallet_address: "0xb".to_string(),
                balance: 250.0,
                percentage: 0.0,
            },
        ]);
        assert!((holders[0].percentage - 75.0).abs() < 1e-9);
        assert!((holders[1].percentage - 25.0).abs() < 1e-9);
        assert_eq!(circulating(&holders), 1_000.0);
        assert_eq!(holder_balance(&holders, "0xB"), 250.0);
        assert_eq!(holder_balance(&holders, "0xc"), 0.0);
    }
}
