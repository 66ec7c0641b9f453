use crate::{config, database, dispatch, web};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("database error: {0}")]
    Database(#[from] database::Error),
    #[error("dispatcher error: {0}")]
    Dispatch(#[from] dispatch::DispatchError),
    #[error("web error: {0}")]
    Web(#[from] web::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
