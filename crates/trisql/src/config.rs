//! Connection configuration.
//!
//! A session is configured with a driver tag and a flat key/value map.
//! Everything is validated here, before any connection attempt.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use trisql_core::Dialect;
use url::Url;

use crate::error::{Error, Result};

/// Host, credentials and database for a server-based dialect.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port; the driver default when unset.
    pub port: Option<u16>,
    /// Database (schema) name.
    pub database: String,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Validated connection settings for one of the supported dialects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionConfig {
    /// SQLite file, or `:memory:`.
    Sqlite {
        /// File path or `:memory:`.
        database: String,
    },
    /// MySQL server.
    MySql(ServerConfig),
    /// PostgreSQL server.
    Postgres(ServerConfig),
}

impl ConnectionConfig {
    /// Builds a configuration from a driver tag and its parameters.
    ///
    /// SQLite requires `database`. MySQL and PostgreSQL require `host`,
    /// `database`, `user` and `password`, and accept an optional `port`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`] for an unknown driver tag,
    /// [`Error::MissingConfigKey`] for an absent parameter and
    /// [`Error::InvalidConfigValue`] for a port that is not a `u16`.
    pub fn from_params(tag: &str, params: &BTreeMap<String, String>) -> Result<Self> {
        let dialect: Dialect = tag.parse()?;
        let required = |key: &'static str| {
            params.get(key).cloned().ok_or_else(|| Error::MissingConfigKey {
                driver: dialect.name().to_string(),
                key,
            })
        };

        match dialect {
            Dialect::Sqlite => Ok(Self::Sqlite {
                database: required("database")?,
            }),
            Dialect::MySql | Dialect::Postgres => {
                let host = required("host")?;
                let database = required("database")?;
                let user = required("user")?;
                let password = required("password")?;
                let port = params
                    .get("port")
                    .map(|value| {
                        value.trim().parse::<u16>().map_err(|_| Error::InvalidConfigValue {
                            key: String::from("port"),
                            value: value.clone(),
                        })
                    })
                    .transpose()?;

                let server = ServerConfig {
                    host,
                    port,
                    database,
                    user,
                    password,
                };
                Ok(if dialect == Dialect::MySql {
                    Self::MySql(server)
                } else {
                    Self::Postgres(server)
                })
            }
        }
    }

    /// Builds a configuration from a JSON object holding a `driver` key and
    /// the driver's parameters. Numbers and booleans are accepted as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for malformed JSON,
    /// [`Error::InvalidConfigValue`] for nested values, and any error from
    /// [`ConnectionConfig::from_params`].
    pub fn from_json(text: &str) -> Result<Self> {
        let object: serde_json::Map<String, Value> = serde_json::from_str(text)?;

        let mut params = BTreeMap::new();
        for (key, value) in object {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(Error::InvalidConfigValue {
                        key,
                        value: other.to_string(),
                    });
                }
            };
            params.insert(key, value);
        }

        let tag = params.remove("driver").ok_or_else(|| Error::MissingConfigKey {
            driver: String::from("configuration"),
            key: "driver",
        })?;
        Self::from_params(&tag, &params)
    }

    /// Returns the dialect this configuration connects to.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        match self {
            Self::Sqlite { .. } => Dialect::Sqlite,
            Self::MySql(_) => Dialect::MySql,
            Self::Postgres(_) => Dialect::Postgres,
        }
    }

    /// Renders the `sqlx` connection URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfigValue`] if the host cannot form a URL.
    pub fn connection_url(&self) -> Result<String> {
        match self {
            Self::Sqlite { database } if database == ":memory:" => {
                Ok(String::from("sqlite::memory:"))
            }
            Self::Sqlite { database } => Ok(format!("sqlite://{database}?mode=rwc")),
            Self::MySql(server) => server_url("mysql", server, Some("charset=utf8mb4"), true),
            Self::Postgres(server) => server_url("postgres", server, None, true),
        }
    }

    /// Renders the connection URL with the password replaced, for logs and
    /// error messages.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let rendered = match self {
            Self::Sqlite { .. } => self.connection_url(),
            Self::MySql(server) => server_url("mysql", server, Some("charset=utf8mb4"), false),
            Self::Postgres(server) => server_url("postgres", server, None, false),
        };
        rendered.unwrap_or_else(|_| format!("{}://<invalid>", self.dialect()))
    }
}

fn server_url(
    scheme: &str,
    server: &ServerConfig,
    query: Option<&str>,
    with_password: bool,
) -> Result<String> {
    let invalid = |key: &str, value: &str| Error::InvalidConfigValue {
        key: key.to_string(),
        value: value.to_string(),
    };

    let mut url = Url::parse(&format!("{scheme}://{}", server.host))
        .map_err(|_| invalid("host", &server.host))?;
    url.set_port(server.port)
        .map_err(|()| invalid("port", &format!("{:?}", server.port)))?;
    url.set_username(&server.user)
        .map_err(|()| invalid("user", &server.user))?;
    let password = if with_password { server.password.as_str() } else { "***" };
    url.set_password(Some(password))
        .map_err(|()| invalid("password", "***"))?;
    url.set_path(&format!("/{}", server.database));
    url.set_query(query);

    Ok(url.into())
}
