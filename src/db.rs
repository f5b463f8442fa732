use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use diesel::r2d2::Pool;
use dotenv::dotenv;
use std::env;

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

pub fn get_connection_pool() -> SqlitePool {
    dotenv().ok();
    // A plain file path next to the binary keeps the desk install zero-config.
    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| String::from("cardesk.db"));
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .build(manager)
        .expect("Could not build connection pool")
}
