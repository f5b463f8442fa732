use crate::POOL;
use crate::model::NewActionLog;
use chrono::Utc;
use diesel::prelude::*;
use tokio::task::spawn_blocking;

pub fn append(conn: &mut SqliteConnection, entry: &NewActionLog) -> QueryResult<usize> {
    use crate::schema::action_logs::dsl::*;
    diesel::insert_into(action_logs).values(entry).execute(conn)
}

/// Append a row to the action log. Best effort: a failed write is logged and
/// swallowed so it can never fail the request that triggered it.
pub async fn record_action(by_username: &str, action_name: &str, detail_text: Option<String>) {
    let entry = NewActionLog {
        username: by_username.to_string(),
        action: action_name.to_string(),
        detail: detail_text,
        created_at: Utc::now(),
    };
    let mut pool = match POOL.get() {
        Ok(conn) => conn,
        Err(e) => {
            log::warn!("action log skipped, no database connection: {:?}", e);
            return;
        }
    };
    let insert_result = spawn_blocking(move || append(&mut pool, &entry)).await;
    match insert_result {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => log::warn!("action log write failed: {:?}", e),
        Err(e) => log::warn!("action log task failed: {:?}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap;
    use crate::model::ActionLog;

    #[test]
    fn feedback_entries_land_in_the_action_log() {
        let mut conn = bootstrap::test_connection();
        let entry = NewActionLog {
            username: String::from("manager"),
            action: String::from("feedback.create"),
            detail: Some(String::from("customer_name=John Doe")),
            created_at: Utc::now(),
        };
        append(&mut conn, &entry).unwrap();

        use crate::schema::action_logs::dsl::*;
        let rows: Vec<ActionLog> = action_logs.load(&mut conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].username, "manager");
        assert_eq!(rows[0].action, "feedback.create");
        assert_eq!(rows[0].detail.as_deref(), Some("customer_name=John Doe"));
    }
}
