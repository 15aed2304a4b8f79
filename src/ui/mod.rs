//! Terminal output for the CLI
//!
//! Uses `cliclack` framing and spinners on a terminal, falling back to
//! plain `[OK]`/`[WARN]` lines in CI and pipes.

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_success, outro_warn, remark, source_label, step_info, step_ok,
    step_ok_detail, step_warn, step_warn_hint,
};
pub use progress::{FetchProgress, TaskSpinner};
pub use prompts::confirm;
