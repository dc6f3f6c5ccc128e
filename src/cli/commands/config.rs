use crate::cli::parser::Commands;
use crate::config::{Config, check};
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        // ---- PRINT CONFIG ----
        if *print_config {
            let mut shown = cfg.clone();
            if !shown.auth.secret.is_empty() {
                shown.auth.secret = "********".to_string();
            }
            println!("📄 Current configuration:\n");
            println!("{}", serde_yaml::to_string(&shown)?);
        }

        // ---- CHECK / MIGRATE ----
        if *check || *migrate {
            if !path.exists() {
                warning(format!(
                    "Configuration file not found: {} (run `communityboard init`)",
                    path.display()
                ));
                return Ok(());
            }

            let missing = if *migrate {
                check::fill_missing(&path)?
            } else {
                check::missing_keys(&path)?
            };

            if missing.is_empty() {
                success("Configuration file is complete");
            } else {
                let verb = if *migrate { "Added" } else { "Missing" };
                for key in &missing {
                    info(format!("{verb} field: {key}"));
                }
            }
        }

        // ---- EDIT CONFIG ----
        if *edit_config {
            let default_editor = std::env::var("EDITOR")
                .or_else(|_| std::env::var("VISUAL"))
                .unwrap_or_else(|_| {
                    if cfg!(target_os = "windows") {
                        "notepad".to_string()
                    } else {
                        "nano".to_string()
                    }
                });

            let editor_to_use = editor.clone().unwrap_or_else(|| default_editor.clone());

            match Command::new(&editor_to_use).arg(&path).status() {
                Ok(s) if s.success() => {
                    success(format!(
                        "Configuration file edited successfully using '{}'",
                        editor_to_use
                    ));
                }
                Ok(_) | Err(_) => {
                    warning(format!(
                        "Editor '{}' not available, falling back to '{}'",
                        editor_to_use, default_editor
                    ));

                    match Command::new(&default_editor).arg(&path).status() {
                        Ok(s) if s.success() => {
                            success(format!(
                                "Configuration file edited successfully using fallback '{}'",
                                default_editor
                            ));
                        }
                        Ok(_) | Err(_) => {
                            crate::ui::messages::error(format!(
                                "Failed to edit configuration file using fallback '{}'",
                                default_editor
                            ));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
