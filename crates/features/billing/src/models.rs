use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Subscription tiers and their location allowances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Starter,
    Growth,
    Chain,
}

impl Plan {
    /// Maximum restaurant locations; `None` is unlimited.
    #[must_use]
    pub const fn location_limit(self) -> Option<u32> {
        match self {
            Self::Starter => Some(1),
            Self::Growth => Some(5),
            Self::Chain => None,
        }
    }

    #[must_use]
    pub const fn allows_locations(self, locations: u32) -> bool {
        match self.location_limit() {
            Some(limit) => locations <= limit,
            None => true,
        }
    }

    /// Maps a Stripe price lookup key to a plan. Unrecognized keys land on
    /// the smallest tier rather than the largest.
    #[must_use]
    pub fn from_price_key(key: &str) -> Self {
        match key {
            "chain" => Self::Chain,
            "growth" => Self::Growth,
            _ => Self::Starter,
        }
    }
}

/// Local view of a Stripe subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Inactive,
}

impl SubscriptionStatus {
    /// Collapses Stripe's status vocabulary. Trials count as active.
    #[must_use]
    pub fn from_stripe(status: &str) -> Self {
        match status {
            "active" | "trialing" => Self::Active,
            "past_due" => Self::PastDue,
            _ => Self::Inactive,
        }
    }
}

/// Cached subscription state, one row per restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub restaurant: String,
    pub customer_id: String,
    pub status: SubscriptionStatus,
    pub plan: Plan,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantQuery {
    pub restaurant: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub restaurant: String,
    /// Billing email used when a Stripe customer must be created.
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trialing_counts_as_active() {
        assert_eq!(SubscriptionStatus::from_stripe("active"), SubscriptionStatus::Active);
        assert_eq!(SubscriptionStatus::from_stripe("trialing"), SubscriptionStatus::Active);
        assert_eq!(SubscriptionStatus::from_stripe("past_due"), SubscriptionStatus::PastDue);
        assert_eq!(SubscriptionStatus::from_stripe("canceled"), SubscriptionStatus::Inactive);
        assert_eq!(SubscriptionStatus::from_stripe("incomplete"), SubscriptionStatus::Inactive);
    }

    #[test]
    fn plan_limits() {
        assert!(Plan::Starter.allows_locations(1));
        assert!(!Plan::Starter.allows_locations(2));
        assert!(Plan::Growth.allows_locations(5));
        assert!(!Plan::Growth.allows_locations(6));
        assert!(Plan::Chain.allows_locations(250));
    }

    #[test]
    fn unknown_price_keys_default_to_starter() {
        assert_eq!(Plan::from_price_key("growth"), Plan::Growth);
        assert_eq!(Plan::from_price_key("chain"), Plan::Chain);
        assert_eq!(Plan::from_price_key("enterprise-2019"), Plan::Starter);
    }
}
