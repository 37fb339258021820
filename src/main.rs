//! application entry point

use crate::server::model::config::ServerConfig;
use log::{error, info, warn};
use std::env;
use std::path::Path;
use std::str::FromStr;
use derive_more::Display;

mod server;

const DOTENV_PATH: &str = ".env.dev";

#[actix_web::main()]
async fn main() -> std::io::Result<()> {
    // bootstrap
    // a. env
    let env = env::var("APP_ENV")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(Env::Dev); // default dev env if absent

    let dotenv_loaded = match env {
        Env::Prod | Env::Stg => true, // injected by the deployment
        Env::Dev => dotenvy::from_path(Path::new(DOTENV_PATH)).is_ok(),
    };

    // b. logging
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    if !dotenv_loaded {
        warn!("{} not found, using process env and defaults", DOTENV_PATH);
    }

    // c. run app
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration, aborting: {:#}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    info!("App is starting in env={}", env);

    server::run(config).await
}

#[derive(Debug, Display)]
#[non_exhaustive]
enum Env {
    Dev,
    Stg,
    Prod,
}

impl FromStr for Env {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "stg" => Ok(Self::Stg),
            "prod" => Ok(Self::Prod),
            s => Err(format!("Invalid Env: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parsing() {
        assert!(matches!("prod".parse::<Env>(), Ok(Env::Prod)));
        assert!(matches!("stg".parse::<Env>(), Ok(Env::Stg)));
        assert_eq!("qa".parse::<Env>().unwrap_err(), "Invalid Env: qa");
    }
}
