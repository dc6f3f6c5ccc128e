use crate::cli::parser::Commands;
use crate::config::{self, Config};
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::server::{self, state::AppState};
use tracing::{info, warn};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { bind, port } = cmd {
        let mut cfg = cfg.clone();
        if let Some(bind) = bind {
            cfg.bind_address = bind.clone();
        }
        if let Some(port) = port {
            cfg.port = *port;
        }
        if cfg.auth.secret.is_empty() {
            warn!("No session secret configured, tokens will not survive a restart (run `communityboard init`)");
            cfg.auth.secret = config::generate_secret();
        }

        let pool = DbPool::from_config(&cfg)?;
        let applied = pool.with_conn(|conn| run_pending_migrations(conn))?;
        if !applied.is_empty() {
            info!(count = applied.len(), "applied pending migrations");
        }

        let state = AppState::new(pool, cfg);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(server::serve(state))?;
    }

    Ok(())
}
