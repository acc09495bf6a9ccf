use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::entities::sessions::{CreateSessionArgs, Session};
use crate::models::users::LoginArgs;
use tracing::info;
use uuid::Uuid;

fn required(field: Option<String>) -> ServiceResult<String> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::SessionsMissingCredentials),
    }
}

pub async fn create<C: Context>(ctx: &C, args: LoginArgs) -> ServiceResult<Session> {
    let email = required(args.email)?;
    let password = required(args.password)?;

    let user = match ctx.users().fetch_one_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(AppError::SessionsInvalidCredentials),
        Err(e) => return unexpected(e),
    };

    let password_hash = user.password_hash.clone();
    let verified =
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash)).await??;
    if !verified {
        return Err(AppError::SessionsInvalidCredentials);
    }

    let args = CreateSessionArgs {
        user_id: user.id,
        name: user.name,
        email: user.email,
    };
    match ctx.sessions().create(args).await {
        Ok(session) => {
            info!(user_id = session.user_id, "Operator logged in");
            Ok(session)
        }
        Err(e) => unexpected(e),
    }
}

pub async fn fetch_one<C: Context>(ctx: &C, session_id: Uuid) -> ServiceResult<Session> {
    match ctx.sessions().fetch_one(session_id).await {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(AppError::Unauthorized),
        Err(e) => unexpected(e),
    }
}

pub async fn delete<C: Context>(ctx: &C, session_id: Uuid) -> ServiceResult<()> {
    match ctx.sessions().delete(session_id).await {
        Ok(()) => {
            info!(%session_id, "Operator logged out");
            Ok(())
        }
        Err(e) => unexpected(e),
    }
}
