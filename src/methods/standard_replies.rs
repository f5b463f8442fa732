use crate::helper_model::ErrorResponse;
use crate::methods::tokens::wrap_json_reply_with_token;
use crate::model::PublishAccessToken;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

pub fn bad_request(err_msg: &str) -> Result<(warp::reply::Response,), Rejection> {
    let msg = ErrorResponse {
        title: String::from("Bad Request"),
        message: err_msg.to_string(),
    };
    Ok::<_, Rejection>((warp::reply::with_status(
        warp::reply::json(&msg),
        StatusCode::BAD_REQUEST,
    )
    .into_response(),))
}

pub fn bad_request_wrapped(
    token_data: PublishAccessToken,
    err_msg: &str,
) -> Result<(warp::reply::Response,), Rejection> {
    let msg = ErrorResponse {
        title: String::from("Bad Request"),
        message: err_msg.to_string(),
    };
    Ok((wrap_json_reply_with_token(
        token_data,
        warp::reply::with_status(warp::reply::json(&msg), StatusCode::BAD_REQUEST),
    ),))
}

pub fn internal_server_error_response(msg: String) -> Result<(warp::reply::Response,), Rejection> {
    log::error!("{}", msg);
    let msg = ErrorResponse {
        title: String::from("Internal Server Error"),
        message: String::from("Please try again later."),
    };
    Ok::<_, Rejection>((warp::reply::with_status(
        warp::reply::json(&msg),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .into_response(),))
}

pub fn method_not_allowed_response() -> Result<(warp::reply::Response,), Rejection> {
    let msg = ErrorResponse {
        title: String::from("Method Not Allowed"),
        message: String::from("This operation does not accept the request method used."),
    };
    Ok((warp::reply::with_status(
        warp::reply::json(&msg),
        StatusCode::METHOD_NOT_ALLOWED,
    )
    .into_response(),))
}

pub fn not_found_wrapped(
    token_data: PublishAccessToken,
    err_msg: &str,
) -> Result<(warp::reply::Response,), Rejection> {
    let msg = ErrorResponse {
        title: String::from("Not Found"),
        message: err_msg.to_string(),
    };
    Ok((wrap_json_reply_with_token(
        token_data,
        warp::reply::with_status(warp::reply::json(&msg), StatusCode::NOT_FOUND),
    ),))
}

pub fn conflict_wrapped(
    token_data: PublishAccessToken,
    err_msg: &str,
) -> Result<(warp::reply::Response,), Rejection> {
    let msg = ErrorResponse {
        title: String::from("Conflict"),
        message: err_msg.to_string(),
    };
    Ok((wrap_json_reply_with_token(
        token_data,
        warp::reply::with_status(warp::reply::json(&msg), StatusCode::CONFLICT),
    ),))
}

pub fn forbidden_wrapped(
    token_data: PublishAccessToken,
    err_msg: &str,
) -> Result<(warp::reply::Response,), Rejection> {
    let msg = ErrorResponse {
        title: String::from("Not Allowed"),
        message: err_msg.to_string(),
    };
    Ok((wrap_json_reply_with_token(
        token_data,
        warp::reply::with_status(warp::reply::json(&msg), StatusCode::FORBIDDEN),
    ),))
}

pub fn response_with_obj<T>(
    obj: T,
    status_code: StatusCode,
) -> Result<(warp::reply::Response,), Rejection>
where
    T: serde::Serialize,
{
    Ok((warp::reply::with_status(warp::reply::json(&obj), status_code).into_response(),))
}

pub fn response_with_obj_wrapped<T>(
    token_data: PublishAccessToken,
    obj: T,
    status_code: StatusCode,
) -> Result<(warp::reply::Response,), Rejection>
where
    T: serde::Serialize,
{
    Ok((wrap_json_reply_with_token(
        token_data,
        warp::reply::with_status(warp::reply::json(&obj), status_code),
    ),))
}
