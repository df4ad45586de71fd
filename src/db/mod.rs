pub mod execute;
pub mod introspect;

use crate::config::DatabaseConfig;
use sqlx::Connection;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};

/// Opens a fresh connection. Every database touch in a request (one for
/// introspection, one for execution) uses its own short-lived connection;
/// there is no pool and no transaction spanning the two.
pub(crate) async fn connect(config: &DatabaseConfig) -> Result<MySqlConnection, sqlx::Error> {
    let options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.username)
        .password(&config.password)
        .database(&config.database);

    MySqlConnection::connect_with(&options).await
}
