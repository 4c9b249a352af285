//! Status command - resolve the environment and report on it

use crate::cli::args::{OutputFormat, StatusArgs};
use crate::config::Config;
use crate::error::RootEnvResult;
use crate::resolver::{
    EnvironmentIssue, FailureCode, Resolution, RootEnvironment, WRITABLE_MODULES_DIR,
};
use crate::ui::{self, TaskSpinner, UiContext};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything known about the environment after one resolution
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub path: Option<String>,
    pub mirror_path: Option<String>,
    pub modules_path: Option<String>,
    pub writable_modules_path: &'static str,
    pub version_code: i64,
    pub has_ramdisk: bool,
    pub is_alternate_variant: bool,
    pub framework_installed: bool,
    pub has_gotten_root_access: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub failure: Option<FailureCode>,
    pub failure_code: Option<i32>,
    pub issue: Option<EnvironmentIssue>,
}

impl StatusReport {
    pub fn collect(env: &RootEnvironment, resolution: &Resolution) -> Self {
        let snapshot = env.snapshot();
        let failure = resolution.failure();
        Self {
            mirror_path: snapshot.mirror_path(),
            modules_path: snapshot.modules_path(),
            path: snapshot.path,
            writable_modules_path: WRITABLE_MODULES_DIR,
            version_code: snapshot.version_code,
            has_ramdisk: snapshot.has_ramdisk,
            is_alternate_variant: snapshot.is_alternate_variant,
            framework_installed: env.framework_installed(),
            has_gotten_root_access: env.has_gotten_root_access(),
            resolved_at: snapshot.resolved_at,
            failure,
            failure_code: failure.map(FailureCode::code),
            issue: env.error_signal(),
        }
    }
}

/// Execute the status command
pub async fn execute(args: StatusArgs, config: &Config) -> RootEnvResult<()> {
    let env = RootEnvironment::from_config(config).await;

    if args.format == OutputFormat::Json {
        let resolution = env.resolve(args.force).await;
        let report = StatusReport::collect(&env, &resolution);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let ctx = UiContext::detect();
    ui::intro(&ctx, "Root Environment");

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Resolving runtime path...");
    let resolution = env.resolve(args.force).await;
    match &resolution {
        Resolution::Resolved(path) => spinner.stop(&format!("Runtime path: {}", path)),
        Resolution::Failed(code) => spinner.stop_warn(&format!("Resolution failed: {}", code)),
    }

    let report = StatusReport::collect(&env, &resolution);
    print_report(&ctx, &report);

    match report.issue {
        None => ui::outro_success(&ctx, "Root environment ready"),
        Some(issue) => {
            ui::step_warn_hint(&ctx, issue.message(), issue_hint(issue));
            ui::outro_warn(&ctx, "Root environment not usable");
        }
    }

    Ok(())
}

fn print_report(ctx: &UiContext, report: &StatusReport) {
    let unknown = "-".to_string();

    ui::section(ctx, "Paths");
    ui::key_value_status(
        ctx,
        "Runtime path",
        report.path.as_ref().unwrap_or(&unknown),
        report.path.is_some(),
    );
    ui::key_value(ctx, "Mirror (read only)", report.mirror_path.as_ref().unwrap_or(&unknown));
    ui::key_value(ctx, "Loaded modules", report.modules_path.as_ref().unwrap_or(&unknown));
    ui::key_value(ctx, "Writable modules", report.writable_modules_path);

    ui::section(ctx, "Framework");
    ui::key_value_status(
        ctx,
        "Installed",
        yes_no(report.framework_installed),
        report.framework_installed,
    );
    ui::key_value(ctx, "Version code", &report.version_code.to_string());
    ui::key_value(
        ctx,
        "Variant",
        if report.is_alternate_variant { "ksu" } else { "magisk" },
    );
    ui::key_value(ctx, "Boots from ramdisk", yes_no(report.has_ramdisk));
    ui::key_value_status(
        ctx,
        "Root access",
        yes_no(report.has_gotten_root_access),
        report.has_gotten_root_access,
    );

    if let Some(at) = report.resolved_at {
        ui::remark(ctx, &format!("Probed at {}", at.to_rfc3339()));
    }
    if let (Some(failure), Some(code)) = (report.failure, report.failure_code) {
        ui::remark(ctx, &format!("Failure code {} ({})", code, failure));
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn issue_hint(issue: EnvironmentIssue) -> &'static str {
    match issue {
        EnvironmentIssue::NoFramework => "Install Magisk or KernelSU",
        EnvironmentIssue::RootDenied => "Grant root access in your root manager",
        EnvironmentIssue::NoRoot => "Open your root manager and retry with --force",
    }
}
