mod list;

use warp::Filter;

pub fn api_v1_log() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("log").and(list::main()).and(warp::path::end())
}
