use crate::{POOL, methods};
use chrono::{NaiveTime, Utc};
use diesel::prelude::*;
use std::time::Duration;

pub async fn nightly_task() {
    loop {
        let now = Utc::now();
        let midnight = now
            .date_naive()
            .succ_opt()
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        let duration_until_midnight = (midnight - now.naive_utc())
            .to_std()
            .unwrap_or_else(|_| Duration::from_secs(1));

        tokio::time::sleep(duration_until_midnight).await;

        log::info!("running daily tasks");

        // A failed checkout skips tonight's run; the loop must outlive it.
        let mut pool = match POOL.get() {
            Ok(conn) => conn,
            Err(err) => {
                log::error!("daily tasks skipped, no database connection: {}", err);
                continue;
            }
        };
        run_daily_maintenance(&mut pool);

        log::info!("daily tasks completed");
    }
}

fn run_daily_maintenance(conn: &mut SqliteConnection) {
    let now = Utc::now();
    // Delete expired tokens
    use crate::schema::access_tokens::dsl as at_q;
    let purged = diesel::delete(at_q::access_tokens.filter(at_q::exp.lt(now))).execute(conn);
    match purged {
        Ok(count) => log::info!("purged {} expired access tokens", count),
        Err(err) => log::error!("failed to purge expired access tokens: {}", err),
    }

    // Vehicles reserved for a start date that has now arrived
    match methods::reservation::promote_due_upcoming(conn) {
        Ok(count) => log::info!("promoted {} upcoming vehicles to booked", count),
        Err(err) => log::error!("failed to promote upcoming vehicles: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap;
    use crate::model::{AccessToken, NewAccessToken};
    use crate::schema::access_tokens;
    use chrono::Duration;

    #[test]
    fn maintenance_purges_only_expired_tokens() {
        let mut conn = bootstrap::test_connection();
        diesel::insert_into(access_tokens::table)
            .values(&vec![
                NewAccessToken {
                    user_id: 1,
                    token: vec![1u8; 32],
                    exp: Utc::now() - Duration::hours(1),
                },
                NewAccessToken {
                    user_id: 1,
                    token: vec![2u8; 32],
                    exp: Utc::now() + Duration::hours(1),
                },
            ])
            .execute(&mut conn)
            .unwrap();

        run_daily_maintenance(&mut conn);

        let remaining: Vec<AccessToken> = access_tokens::table.load(&mut conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].token, vec![2u8; 32]);
    }
}
