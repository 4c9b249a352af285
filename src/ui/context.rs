//! Interactive vs scripted environment detection

use std::io::IsTerminal;

/// Environment variable forcing plain output
pub const PLAIN_OUTPUT_ENV: &str = "ROOTENV_PLAIN";

/// Decides how output is rendered and whether prompts may block
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
    /// `--yes` was passed
    auto_yes: bool,
}

impl UiContext {
    pub fn detect() -> Self {
        Self {
            interactive: Self::detect_interactive(),
            auto_yes: false,
        }
    }

    /// Plain output, prompts answer with their default
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            auto_yes: false,
        }
    }

    pub fn with_auto_yes(mut self, yes: bool) -> Self {
        self.auto_yes = yes;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn auto_yes(&self) -> bool {
        self.auto_yes
    }

    /// Spinners and cliclack framing
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    fn detect_interactive() -> bool {
        if !std::io::stdout().is_terminal() || !std::io::stdin().is_terminal() {
            return false;
        }

        // adb shell sessions and CI runners both set at least one of these
        let plain_vars = [PLAIN_OUTPUT_ENV, "CI", "GITHUB_ACTIONS", "GITLAB_CI", "TF_BUILD"];
        !plain_vars.iter().any(|var| std::env::var_os(var).is_some())
    }
}
