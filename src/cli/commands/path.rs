//! Path command - print the runtime path or a path derived from it

use crate::cli::args::PathArgs;
use crate::config::Config;
use crate::error::{RootEnvError, RootEnvResult};
use crate::resolver::{Resolution, RootEnvironment};
use tracing::debug;

/// Execute the path command
pub async fn execute(args: PathArgs, config: &Config) -> RootEnvResult<()> {
    let env = RootEnvironment::from_config(config).await;

    match env.resolve(args.force).await {
        Resolution::Resolved(path) => debug!("Runtime path resolved: {}", path),
        Resolution::Failed(code) => {
            return Err(RootEnvError::User(format!(
                "Runtime path not resolved: {} (code {})",
                code,
                code.code()
            )));
        }
    }

    let path = if args.mirror {
        env.peek_mirror_path()
    } else if args.modules {
        env.peek_modules_path()
    } else {
        env.peek_path()
    };

    let path = path.ok_or_else(|| {
        RootEnvError::Internal("Resolved path missing from cache".to_string())
    })?;
    println!("{}", path);

    Ok(())
}
