use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::path::expand_tilde;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let db_path = Path::new(&cfg.database);
        if !db_path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Database not found: {}", db_path.display()),
            )
            .into());
        }

        let pool = DbPool::from_config(cfg)?;
        let conn = pool.lease()?;
        BackupLogic::backup(&conn, db_path, &expand_tilde(file), *compress, *force)?;
    }

    Ok(())
}
