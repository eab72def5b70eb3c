use crate::stable_memory::REFERRAL_MAP;

use super::stable_referral::{ReferralStatus, StableReferral, StableReferralId};

pub fn get_by_referred(referred_wallet: &str) -> Option<StableReferral> {
    let key = StableReferralId(referred_wallet.to_lowercase());
    REFERRAL_MAP.with(|m| m.borrow().get(&key))
}

pub fn insert(referral: &StableReferral) -> Result<(), String> {
    let key = StableReferralId(referral.referred_wallet.to_lowercase());
    REFERRAL_MAP.with(|m| {
        let mut map = m.borrow_mut();
        if map.contains_key(&key) {
            return Err(format!("Wallet {} already referred", referral.referred_wallet));
        }
        map.insert(key, referral.clone());
        Ok(())
    })
}

/// Flip a pending referral to rewarded. Returns the referrer wallet exactly
/// once; a second call sees `Rewarded` and gets None, so the bonus cannot be
/// credited twice.
pub fn mark_rewarded(referred_wallet: &str, ts: u64) -> Option<String> {
    let key = StableReferralId(referred_wallet.to_lowercase());
    REFERRAL_MAP.with(|m| {
        let mut map = m.borrow_mut();
        match map.get(&key) {
            Some(mut referral) => {
                if referral.status != ReferralStatus::Pending {
                    return None;
                }
                referral.status = ReferralStatus::Rewarded;
                referral.rewarded_at = Some(ts);
                let referrer = referral.referrer_wallet.clone();
                map.insert(key, referral);
                Some(referrer)
            }
            None => None,
        }
    })
}
