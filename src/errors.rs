use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error("Failed loading configuration: {0}")]
    Config(#[from] envy::Error),

    #[error("Database not ready after {attempts} probe attempts")]
    NotReady { attempts: u32 },
}
