mod get;
mod set;

use warp::Filter;

pub fn api_v1_setting()
-> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("setting")
        .and(get::main().or(set::main()))
        .and(warp::path::end())
}
