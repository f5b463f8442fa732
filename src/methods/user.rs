use crate::POOL;
use crate::methods::tokens::wrap_json_reply_with_token;
use crate::model::{PublishAccessToken, User, UserRole};
use diesel::prelude::*;
use tokio::task;
use warp::Rejection;
use warp::http::StatusCode;

pub async fn get_user_by_id(_user_id: &i32) -> QueryResult<User> {
    let uid = *_user_id;
    let mut pool = POOL.get().unwrap();
    task::spawn_blocking(move || {
        use crate::schema::users::dsl::*;
        users.filter(id.eq(&uid)).get_result::<User>(&mut pool)
    })
    .await
    .unwrap()
}

pub fn user_is_manager(user: &User) -> bool {
    user.role == UserRole::Manager
}

pub fn user_not_manager_wrapped_return(
    token_data: PublishAccessToken,
) -> Result<(warp::reply::Response,), Rejection> {
    let error_msg = serde_json::json!({"error": "You do not have manager privileges"});
    Ok::<_, Rejection>((wrap_json_reply_with_token(
        token_data,
        warp::reply::with_status(warp::reply::json(&error_msg), StatusCode::FORBIDDEN),
    ),))
}
