use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

use crate::db_types::OrderId;

/// Generates a fresh payment gateway order id. The millisecond timestamp keeps ids sortable; the random suffix
/// keeps two checkouts in the same millisecond from colliding.
pub fn new_order_id() -> OrderId {
    let suffix: String = rand::thread_rng().sample_iter(&Alphanumeric).take(8).map(char::from).collect();
    OrderId(format!("ORDER-{}-{suffix}", Utc::now().timestamp_millis()))
}
