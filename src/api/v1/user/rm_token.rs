use crate::methods;
use warp::http::{Method, StatusCode};
use warp::{Filter, Reply};

// Logout: burns the presented token without issuing a replacement.
pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("rm-token")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::header::<String>("auth"))
        .and_then(async move |method: Method, auth: String| {
            if method != Method::POST {
                return methods::standard_replies::method_not_allowed_response();
            }
            let Some(access_token) = methods::tokens::parse_auth_header(&auth) else {
                return methods::tokens::token_invalid_warp_return(&auth);
            };
            let if_token_valid =
                methods::tokens::verify_user_token(&access_token.user_id, &access_token.token)
                    .await;
            return match if_token_valid {
                Err(methods::tokens::TokenError::NotHex(_)) => {
                    methods::tokens::token_not_hex_warp_return(&access_token.token)
                }
                Err(_) => methods::standard_replies::internal_server_error_response(
                    String::from("user/rm-token: token verification failed"),
                ),
                Ok(token_is_valid) => {
                    if !token_is_valid {
                        return methods::tokens::token_invalid_warp_return(&access_token.token);
                    }
                    let binary_token = hex::decode(&access_token.token).unwrap_or_default();
                    methods::tokens::rm_token_by_binary(binary_token).await;
                    if let Ok(user) = methods::user::get_user_by_id(&access_token.user_id).await {
                        methods::audit::record_action(&user.username, "user.logout", None).await;
                    }
                    let msg = serde_json::json!({"logged_out": true});
                    methods::standard_replies::response_with_obj(msg, StatusCode::OK)
                }
            };
        })
}
