use std::time::Duration;

use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;

use super::var;

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct Config {
    host: String,
    port: u16,
    user: String,
    password: String,
    db: String,
    pool_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 5432,
            user: String::from("postgres"),
            password: String::from("postgres"),
            db: String::from("messenger"),
            pool_size: 10,
        }
    }
}

impl Config {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        db: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            db: db.into(),
            ..Self::default()
        }
    }

    pub fn env() -> super::Result<Self> {
        let host = var("PG_HOST")?;
        let port = var("PG_PORT")?.parse()?;
        let user = var("PG_USER")?;
        let password = var("PG_PASSWORD")?;
        let db = var("PG_DB")?;
        let pool_size = match std::env::var("PG_POOL_SIZE") {
            Ok(size) => size.parse()?,
            Err(_) => Self::default().pool_size,
        };

        Ok(Self {
            host,
            port,
            user,
            password,
            db,
            pool_size,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.db
        )
    }

    pub fn connect(&self) -> super::Result<Pool> {
        let manager = ConnectionManager::<PgConnection>::new(self.url());
        let pool = r2d2::Pool::builder()
            .max_size(self.pool_size)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        Ok(pool)
    }
}
