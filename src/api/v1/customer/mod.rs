mod delete;
mod get;
mod list;
mod new;

use warp::Filter;

pub fn api_v1_customer()
-> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("customer")
        .and(new::main().or(list::main()).or(get::main()).or(delete::main()))
        .and(warp::path::end())
}
