use crate::error::IdentityError;
use crate::extract::AuthUser;
use brigade_database::Database;
use brigade_database::surrealdb::types::SurrealValue;
use brigade_domain::role::Role;
use brigade_kernel::envelope::ApiError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One row of the `member` join table: a user's role at one restaurant.
#[derive(Debug, Clone, Serialize, Deserialize, SurrealValue)]
#[serde(rename_all = "camelCase")]
#[surreal(crate = "brigade_database::surrealdb::types")]
pub struct Member {
    pub user: String,
    pub restaurant: String,
    pub role: Role,
}

/// Authorizes the caller at `restaurant`, requiring at least `required`.
///
/// The lookup runs on the caller's scoped session, so the `member` table's
/// row-level permissions do the filtering; a missing row and a foreign row
/// are indistinguishable.
///
/// # Errors
/// * [`ApiError::Forbidden`] when no membership grants the required role.
/// * [`ApiError::Database`] when the lookup itself fails.
pub async fn require_role(
    db: &Database,
    user: &AuthUser,
    restaurant: &str,
    required: Role,
) -> Result<Member, ApiError> {
    let session = db.scoped_session(&user.id).await?;

    let member: Option<Member> = session
        .query(
            "SELECT record::id(user) AS user, restaurant, role FROM member \
             WHERE restaurant = $restaurant LIMIT 1",
        )
        .bind(("restaurant", restaurant.to_owned()))
        .await?
        .take(0)?;

    let member = member.ok_or_else(|| {
        debug!(user = %user.id, %restaurant, "No membership found");
        ApiError::from(IdentityError::Privilege {
            required: required.as_str(),
            restaurant: restaurant.to_owned(),
        })
    })?;

    if !member.role.grants(required) {
        return Err(IdentityError::Privilege {
            required: required.as_str(),
            restaurant: restaurant.to_owned(),
        }
        .into());
    }

    Ok(member)
}
