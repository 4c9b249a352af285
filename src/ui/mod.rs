//! UI module for consistent CLI output
//!
//! Uses `cliclack` for spinners and prompts with automatic fallback to
//! plain output in CI/non-interactive environments.
//!
//! # Example
//!
//! ```rust,ignore
//! use rootenv::ui::{self, UiContext, TaskSpinner};
//!
//! let ctx = UiContext::detect();
//!
//! ui::intro(&ctx, "Root Environment");
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Resolving runtime path...");
//! // ... resolve ...
//! spinner.stop("Runtime path: /debug_ramdisk");
//!
//! ui::key_value(&ctx, "Version code", "27000");
//! ui::step_warn_hint(&ctx, "Root access was denied", "Grant root in your root manager");
//! ```

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_status, outro_success, outro_warn, remark, section,
    step_ok_detail, step_warn_hint,
};
pub use progress::TaskSpinner;
pub use prompts::confirm;
pub use theme::{init_theme, RootEnvTheme};
