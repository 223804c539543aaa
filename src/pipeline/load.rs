// Loader stage: resolve the userId path parameter to a stored record

use crate::error::ApiError;
use crate::models::user::{User, UserId};
use crate::store::UserStore;

/// Resolve the `userId` parameter into a User. The identifier is parsed
/// strictly before the store is consulted, so malformed ids turn into a
/// validation error without any lookup; a well-formed id with no record
/// behind it is a terminal 404.
pub async fn load_user(store: &dyn UserStore, raw: Option<&str>) -> Result<User, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::internal("route is missing its userId parameter"))?;
    let id = UserId::parse_str(raw)?;
    let user = store.get(id).await?;
    Ok(user)
}
