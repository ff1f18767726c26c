use std::env;
use std::fs::File;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderValue;
use dotenv::dotenv;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, TermLogger, TerminalMode, WriteLogger};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

pub mod db;
pub mod idp;
#[cfg(test)]
pub mod memory;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Env {
    Local,
    Dev,
    Stage,
    Production,
}

impl FromStr for Env {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(Self::Local),
            "dev" => Ok(Self::Dev),
            "stg" => Ok(Self::Stage),
            "prod" => Ok(Self::Production),
            _ => Err(Error::InvalidEnv(s.to_owned())),
        }
    }
}

impl Env {
    pub fn addr(&self) -> SocketAddr {
        match self {
            Self::Local => SocketAddr::from(([127, 0, 0, 1], 8000)),
            Self::Dev | Self::Stage | Self::Production => SocketAddr::from(([0, 0, 0, 0], 8000)),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub env: Env,
    pub service_name: String,
    pub log_level: LevelFilter,
    allow_origin: Vec<HeaderValue>,

    pub db: db::Config,
    pub idp: idp::Config,
}

impl Config {
    pub fn env() -> Result<Self> {
        dotenv().ok();

        let env = env::var("ENV")
            .map(|e| Env::from_str(&e))
            .unwrap_or(Ok(Env::Local))?;

        let log_level = env::var("RUST_LOG")
            .ok()
            .and_then(|l| LevelFilter::from_str(&l).ok())
            .unwrap_or(LevelFilter::Info);

        let allow_origin = match env {
            Env::Local | Env::Dev => vec![],
            Env::Stage | Env::Production => var("ALLOW_ORIGIN")?
                .split(',')
                .map(HeaderValue::from_str)
                .collect::<std::result::Result<Vec<_>, _>>()?,
        };

        Ok(Self {
            env,
            service_name: env::var("SERVICE_NAME").unwrap_or("thread_messenger".into()),
            log_level,
            allow_origin,
            db: db::Config::env().unwrap_or_default(),
            idp: idp::Config::env()?,
        })
    }

    pub fn init_logger(&self) -> Result<()> {
        let log_file = File::create(format!("{}.log", self.service_name))?;

        CombinedLogger::init(vec![
            TermLogger::new(
                self.log_level,
                simplelog::Config::default(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            ),
            WriteLogger::new(self.log_level, simplelog::Config::default(), log_file),
        ])?;

        Ok(())
    }

    pub fn cors(&self) -> CorsLayer {
        let origin = match self.env {
            Env::Local | Env::Dev => AllowOrigin::any(),
            Env::Stage | Env::Production => AllowOrigin::list(self.allow_origin.clone()),
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(AllowMethods::any())
            .allow_headers(AllowHeaders::any())
    }
}

pub(crate) fn var(key: &'static str) -> Result<String> {
    env::var(key).map_err(|_| Error::MissingVar(key))
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0} must be set")]
    MissingVar(&'static str),
    #[error("invalid environment: {0}")]
    InvalidEnv(String),

    #[error(transparent)]
    _ParseInt(#[from] std::num::ParseIntError),
    #[error(transparent)]
    _InvalidHeader(#[from] axum::http::header::InvalidHeaderValue),
    #[error(transparent)]
    _R2d2(#[from] r2d2::Error),
    #[error(transparent)]
    _Io(#[from] std::io::Error),
    #[error(transparent)]
    _Logger(#[from] log::SetLoggerError),
}
