mod cancel;
mod complete;
mod list;
mod new;
mod pickup;

use warp::Filter;

pub fn api_v1_reservation()
-> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("reservation")
        .and(
            new::main()
                .or(pickup::main())
                .or(complete::main())
                .or(cancel::main())
                .or(list::main()),
        )
        .and(warp::path::end())
}
