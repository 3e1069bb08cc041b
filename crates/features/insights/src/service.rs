//! Digest generation, storage and dispatch.

use crate::client::{ChatClient, InferenceClient};
use crate::models::{EmailReport, Insight};
use crate::prompt::pnl_prompt;
use brigade_connect::{BackoffPolicy, ConnectError, RestClient, retry_with_backoff};
use brigade_database::Database;
use brigade_kernel::envelope::ApiError;
use brigade_kernel::safe_nanoid;
use chrono::{NaiveDate, Utc};
use serde_json::{Value, json};
use tracing::{info, warn};

const INSIGHT_FIELDS: &str =
    "record::id(id) AS id, restaurant, period_from, period_to, body, model, created_at";

/// Resend client plus the configured sender address.
#[derive(Debug, Clone)]
pub struct Mailer {
    pub client: RestClient,
    pub from: String,
}

/// Generates a digest for the period: P&L aggregation, prompt, OpenRouter
/// with backoff, HuggingFace once on exhaustion, then store.
///
/// # Errors
/// [`ApiError::Vendor`] when no model is configured or every model fails;
/// validation and database errors pass through from the P&L aggregation.
pub async fn generate(
    db: &Database,
    openrouter: Option<&ChatClient>,
    huggingface: Option<&InferenceClient>,
    restaurant: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Insight, ApiError> {
    let report = brigade_ledger::service::pnl(db, restaurant, from, to).await?;
    let prompt = pnl_prompt(&report);

    let (body, model) = complete(openrouter, huggingface, &prompt).await?;
    let insight = Insight {
        id: safe_nanoid!(),
        restaurant: restaurant.to_owned(),
        period_from: from,
        period_to: to,
        body,
        model,
        created_at: Utc::now(),
    };

    db.query(
        "CREATE type::thing('insight', $id) SET restaurant = $restaurant, \
         period_from = $period_from, period_to = $period_to, body = $body, \
         model = $model, created_at = $created_at",
    )
    .bind(("id", insight.id.clone()))
    .bind(("restaurant", insight.restaurant.clone()))
    .bind(("period_from", insight.period_from))
    .bind(("period_to", insight.period_to))
    .bind(("body", insight.body.clone()))
    .bind(("model", insight.model.clone()))
    .bind(("created_at", insight.created_at))
    .await?
    .check()?;

    info!(%restaurant, %from, %to, model = %insight.model, "Insight stored");
    Ok(insight)
}

async fn complete(
    openrouter: Option<&ChatClient>,
    huggingface: Option<&InferenceClient>,
    prompt: &str,
) -> Result<(String, String), ApiError> {
    if let Some(chat) = openrouter {
        let result = retry_with_backoff(
            BackoffPolicy::default(),
            || chat.complete(prompt),
            ConnectError::is_retryable,
        )
        .await;

        match result {
            Ok(body) => return Ok((body, chat.model.clone())),
            Err(err) => {
                if huggingface.is_none() {
                    return Err(err.into());
                }
                warn!(error = %err, "OpenRouter exhausted, falling back to HuggingFace");
            },
        }
    }

    let Some(inference) = huggingface else {
        return Err(ConnectError::InvalidConfiguration(
            "no AI model endpoint is configured".to_owned(),
        )
        .into());
    };

    let body = inference.complete(prompt).await?;
    Ok((body, inference.model.clone()))
}

/// Stored digests for one restaurant, newest first.
///
/// # Errors
/// Database failures only.
pub async fn list(db: &Database, restaurant: &str) -> Result<Vec<Insight>, ApiError> {
    let insights: Vec<Insight> = db
        .query(format!(
            "SELECT {INSIGHT_FIELDS} FROM insight WHERE restaurant = $restaurant \
             ORDER BY created_at DESC"
        ))
        .bind(("restaurant", restaurant.to_owned()))
        .await?
        .take(0)?;

    Ok(insights)
}

/// Looks up one stored digest, or the newest when `id` is `None`.
///
/// # Errors
/// [`ApiError::NotFound`] when nothing matches.
pub async fn find(
    db: &Database,
    restaurant: &str,
    id: Option<&str>,
) -> Result<Insight, ApiError> {
    let insight: Option<Insight> = match id {
        Some(id) => {
            db.query(format!(
                "SELECT {INSIGHT_FIELDS} FROM insight \
                 WHERE record::id(id) = $id AND restaurant = $restaurant LIMIT 1"
            ))
            .bind(("id", id.to_owned()))
            .bind(("restaurant", restaurant.to_owned()))
            .await?
            .take(0)?
        },
        None => list(db, restaurant).await?.into_iter().next(),
    };

    insight.ok_or_else(|| ApiError::NotFound(format!("no insight on file for {restaurant}")))
}

/// Sends a stored digest as plain text via Resend.
///
/// # Errors
/// [`ApiError::NotFound`] when the digest does not exist,
/// [`ApiError::Vendor`] when Resend rejects the email.
pub async fn email(
    db: &Database,
    mailer: &Mailer,
    restaurant: &str,
    to: &str,
    insight_id: Option<&str>,
) -> Result<EmailReport, ApiError> {
    let insight = find(db, restaurant, insight_id).await?;

    let body = json!({
        "from": mailer.from,
        "to": [to],
        "subject": format!("P&L digest {} to {}", insight.period_from, insight.period_to),
        "text": insight.body,
    });
    let _: Value = mailer.client.post_json("/emails", &body).await?;

    info!(%restaurant, %to, insight = %insight.id, "Insight emailed");
    Ok(EmailReport { insight: insight.id, to: to.to_owned() })
}
