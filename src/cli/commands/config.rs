//! Config command - show or initialize configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::RootEnvResult;
use crate::ui::{self, UiContext};

/// Execute the config command
pub async fn execute(args: ConfigArgs, manager: &ConfigManager, config: &Config) -> RootEnvResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force, yes }) => init_config(manager, force, yes).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> RootEnvResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool, yes: bool) -> RootEnvResult<()> {
    let ctx = UiContext::detect().with_auto_yes(yes);
    let path = manager.path();

    if path.exists() && !force {
        let message = format!("Overwrite existing config at {}?", path.display());
        if !ui::confirm(&ctx, &message, false).await? {
            ui::step_warn_hint(
                &ctx,
                &format!("Config already exists at {}", path.display()),
                "Use --force to overwrite",
            );
            return Ok(());
        }
    }

    manager.save(&Config::default()).await?;

    ui::step_ok_detail(
        &ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_args(force: bool) -> ConfigArgs {
        ConfigArgs {
            action: Some(ConfigAction::Init { force, yes: false }),
        }
    }

    #[tokio::test]
    async fn init_writes_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("rootenv").join("config.toml"));

        execute(init_args(false), &manager, &Config::default())
            .await
            .unwrap();

        let loaded = manager.load().await.unwrap();
        assert_eq!(loaded.shell.su_binary, "su");
    }

    #[tokio::test]
    async fn init_keeps_existing_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[shell]\nsu_binary = \"/system/xbin/su\"\n").unwrap();
        let manager = ConfigManager::with_path(path);

        execute(init_args(false), &manager, &Config::default())
            .await
            .unwrap();
        assert_eq!(manager.load().await.unwrap().shell.su_binary, "/system/xbin/su");

        execute(init_args(true), &manager, &Config::default())
            .await
            .unwrap();
        assert_eq!(manager.load().await.unwrap().shell.su_binary, "su");
    }
}
