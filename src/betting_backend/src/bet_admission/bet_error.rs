use thiserror::Error;

/// Admission rejections. The display form is the stable error code callers
/// match on; codes never change even when messages around them do.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetError {
    // input validation
    #[error("MISSING_EVENT_ID")]
    MissingEventId,
    #[error("INVALID_EVENT")]
    InvalidEvent,
    #[error("INVALID_TEAMS")]
    InvalidTeams,
    #[error("INVALID_ODDS")]
    InvalidOdds,
    #[error("INVALID_STAKE")]
    InvalidStake,
    #[error("INVALID_PARLAY_EVENT")]
    InvalidParlayEvent,
    #[error("DUPLICATE_EVENT_IN_PARLAY")]
    DuplicateEventInParlay,
    #[error("MAX_STAKE_EXCEEDED")]
    MaxStakeExceeded,
    #[error("SUI_BETTING_PAUSED")]
    SuiBettingPaused,
    #[error("FREE_BET_ALREADY_USED")]
    FreeBetAlreadyUsed,
    #[error("INSUFFICIENT_BALANCE")]
    InsufficientBalance,

    // policy / anti-exploit
    #[error("WALLET_BLOCKED")]
    WalletBlocked,
    #[error("RATE_LIMIT_EXCEEDED")]
    RateLimitExceeded,
    #[error("BET_COOLDOWN")]
    BetCooldown,
    #[error("EVENT_BET_LIMIT")]
    EventBetLimit,
    #[error("DUPLICATE_BET")]
    DuplicateBet,
    #[error("DUPLICATE_TRANSACTION")]
    DuplicateTransaction,
    #[error("SUSPICIOUS_ODDS_DETECTED")]
    SuspiciousOdds,

    // event freshness, all fail-closed
    #[error("EVENT_NOT_FOUND")]
    EventNotFound,
    #[error("STALE_EVENT_DATA")]
    StaleEventData,
    #[error("EVENT_STATUS_UNCERTAIN")]
    EventStatusUncertain,
    #[error("UNVERIFIABLE_MATCH_TIME")]
    UnverifiableMatchTime,
    #[error("MATCH_CUTOFF")]
    MatchCutoff,
    #[error("MATCH_STARTED")]
    MatchStarted,
    #[error("MARKET_CLOSED_LIVE")]
    MarketClosedLive,
    #[error("MARKET_CLOSED_HALF_TIME")]
    MarketClosedHalfTime,

    // limits
    #[error("SELF_EXCLUDED")]
    SelfExcluded,
    #[error("DAILY_LIMIT_EXCEEDED")]
    DailyLimitExceeded,
    #[error("WEEKLY_LIMIT_EXCEEDED")]
    WeeklyLimitExceeded,
    #[error("MONTHLY_LIMIT_EXCEEDED")]
    MonthlyLimitExceeded,
}

impl BetError {
    pub fn code(&self) -> String {
        self.to_string()
    }
}
