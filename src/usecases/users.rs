use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::models::users::User;
use tracing::info;

#[cfg(not(test))]
const PASSWORD_HASH_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const PASSWORD_HASH_COST: u32 = 4;

pub async fn create<C: Context>(
    ctx: &C,
    name: &str,
    email: &str,
    password: String,
) -> ServiceResult<User> {
    match ctx.users().fetch_one_by_email(email).await {
        Ok(Some(_)) => return Err(AppError::UsersEmailTaken),
        Ok(None) => {}
        Err(e) => return unexpected(e),
    }

    let password_hash =
        tokio::task::spawn_blocking(move || bcrypt::hash(password, PASSWORD_HASH_COST)).await??;
    match ctx.users().create(name, email, &password_hash).await {
        Ok(user) => {
            info!(user_id = user.id, "Operator account created");
            Ok(User::from(user))
        }
        Err(e) => unexpected(e),
    }
}
