//! Stripe subscription lookup and the local cache.

use crate::models::{Plan, Subscription, SubscriptionStatus};
use brigade_connect::RestClient;
use brigade_database::Database;
use brigade_kernel::envelope::ApiError;
use serde::Deserialize;
use tracing::info;

const SUBSCRIPTION_FIELDS: &str = "restaurant, customer_id, status, plan";

// --- Stripe wire shapes (the fields we read) ---

#[derive(Debug, Deserialize)]
struct StripeCustomer {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripeList<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct StripeSubscription {
    status: String,
    items: StripeList<StripeItem>,
}

#[derive(Debug, Deserialize)]
struct StripeItem {
    price: StripePrice,
}

#[derive(Debug, Deserialize)]
struct StripePrice {
    #[serde(default)]
    lookup_key: Option<String>,
    #[serde(default)]
    nickname: Option<String>,
}

impl StripeSubscription {
    fn plan(&self) -> Plan {
        self.items
            .data
            .first()
            .and_then(|item| item.price.lookup_key.as_deref().or(item.price.nickname.as_deref()))
            .map_or(Plan::Starter, Plan::from_price_key)
    }
}

/// Reads the cached subscription row, if any.
///
/// # Errors
/// Database failures only.
pub async fn cached_subscription(
    db: &Database,
    restaurant: &str,
) -> Result<Option<Subscription>, ApiError> {
    let row: Option<Subscription> = db
        .query(format!(
            "SELECT {SUBSCRIPTION_FIELDS} FROM ONLY type::thing('subscription', $restaurant)"
        ))
        .bind(("restaurant", restaurant.to_owned()))
        .await?
        .take(0)?;

    Ok(row)
}

/// Upserts the cache row, keyed by restaurant so each restaurant holds
/// exactly one subscription.
///
/// # Errors
/// Database failures only.
pub async fn store_subscription(db: &Database, sub: &Subscription) -> Result<(), ApiError> {
    db.query(
        "UPSERT type::thing('subscription', $restaurant) SET restaurant = $restaurant, \
         customer_id = $customer_id, status = $status, plan = $plan",
    )
    .bind(("restaurant", sub.restaurant.clone()))
    .bind(("customer_id", sub.customer_id.clone()))
    .bind(("status", sub.status))
    .bind(("plan", sub.plan))
    .await?
    .check()?;

    Ok(())
}

/// Refreshes the cache from Stripe: reuse the known customer or create one,
/// then pull the newest subscription and collapse its status and plan.
///
/// # Errors
/// [`ApiError::Validation`] when a customer must be created without a billing
/// email, [`ApiError::Vendor`] on Stripe failures.
pub async fn sync(
    db: &Database,
    stripe: &RestClient,
    restaurant: &str,
    email: Option<&str>,
) -> Result<Subscription, ApiError> {
    let customer_id = match cached_subscription(db, restaurant).await? {
        Some(existing) => existing.customer_id,
        None => {
            let Some(email) = email else {
                return Err(ApiError::Validation(
                    "a billing email is required to create the Stripe customer".to_owned(),
                ));
            };
            let customer: StripeCustomer = stripe
                .post_form("/customers", &[("email", email), ("metadata[restaurant]", restaurant)])
                .await?;
            info!(%restaurant, customer = %customer.id, "Stripe customer created");
            customer.id
        },
    };

    let subs: StripeList<StripeSubscription> = stripe
        .get_json(&format!("/subscriptions?customer={customer_id}&status=all&limit=1"))
        .await?;

    let (status, plan) = subs.data.first().map_or((SubscriptionStatus::Inactive, Plan::Starter), |sub| {
        (SubscriptionStatus::from_stripe(&sub.status), sub.plan())
    });

    let sub = Subscription { restaurant: restaurant.to_owned(), customer_id, status, plan };
    store_subscription(db, &sub).await?;

    info!(%restaurant, ?status, ?plan, "Subscription synced");
    Ok(sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plan_prefers_lookup_key_over_nickname() {
        let sub: StripeSubscription = serde_json::from_value(json!({
            "status": "active",
            "items": { "data": [ { "price": { "lookup_key": "growth", "nickname": "chain" } } ] }
        }))
        .expect("decode");
        assert_eq!(sub.plan(), Plan::Growth);
    }

    #[test]
    fn plan_falls_back_to_nickname_then_starter() {
        let sub: StripeSubscription = serde_json::from_value(json!({
            "status": "trialing",
            "items": { "data": [ { "price": { "nickname": "chain" } } ] }
        }))
        .expect("decode");
        assert_eq!(sub.plan(), Plan::Chain);

        let bare: StripeSubscription = serde_json::from_value(json!({
            "status": "trialing",
            "items": { "data": [] }
        }))
        .expect("decode");
        assert_eq!(bare.plan(), Plan::Starter);
    }
}
