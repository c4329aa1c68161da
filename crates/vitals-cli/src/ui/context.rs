//! Terminal detection for the vitals commands.
//!
//! Most invocations are headless: SwiftBar runs `vitals widget`, launchd or
//! cron runs `vitals sync` and `vitals summary`. Only an interactive shell
//! gets colour, spinners and prompts.

use std::io::IsTerminal;

use super::mode::OutputMode;

const FALLBACK_WIDTH: usize = 80;

/// How the current process should render.
#[derive(Debug, Clone)]
pub struct UiContext {
    pub is_tty: bool,
    pub color: bool,
    pub unicode: bool,
    /// Columns available to tables.
    pub width: usize,
    pub mode: OutputMode,
}

/// The environment facts the context is derived from.
#[derive(Debug, Default)]
struct Surroundings {
    stdout_tty: bool,
    dumb_term: bool,
    no_color: bool,
    under_swiftbar: bool,
    columns: Option<usize>,
}

impl Surroundings {
    fn probe() -> Self {
        let stdout_tty = std::io::stdout().is_terminal();
        Self {
            stdout_tty,
            dumb_term: std::env::var("TERM").is_ok_and(|t| t == "dumb"),
            no_color: std::env::var_os("NO_COLOR").is_some(),
            under_swiftbar: std::env::var_os("SWIFTBAR").is_some(),
            columns: columns_env().or_else(|| stdout_tty.then(tty_columns).flatten()),
        }
    }
}

impl UiContext {
    /// Build the context from the process environment and the global
    /// `--json`, `--no-color` and `--ascii` flags.
    pub fn from_env(json: bool, no_color: bool, ascii: bool) -> Self {
        Self::from_surroundings(&Surroundings::probe(), json, no_color, ascii)
    }

    fn from_surroundings(env: &Surroundings, json: bool, no_color: bool, ascii: bool) -> Self {
        // SwiftBar plugins get a pipe; treat them as a dumb terminal even if
        // the parent shell exported a TERM.
        let plain_only = env.dumb_term || env.under_swiftbar;
        let is_tty = env.stdout_tty && !env.under_swiftbar;

        Self {
            is_tty,
            color: is_tty && !plain_only && !no_color && !env.no_color,
            unicode: !ascii,
            width: env.columns.unwrap_or(FALLBACK_WIDTH),
            mode: OutputMode::resolve(json, is_tty, plain_only),
        }
    }

    /// Prompts need a terminal on both ends.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && std::io::stdin().is_terminal()
    }

    pub fn allows_animation(&self) -> bool {
        self.is_tty && self.mode.is_pretty()
    }
}

fn columns_env() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.trim().parse::<usize>().ok())
        .filter(|&c| c > 0)
}

#[cfg(unix)]
fn tty_columns() -> Option<usize> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    // SAFETY: TIOCGWINSZ fills the winsize it is given and nothing else.
    let ptr: *mut libc::winsize = &mut size;
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, ptr) };
    (rc == 0 && size.ws_col > 0).then_some(usize::from(size.ws_col))
}

#[cfg(not(unix))]
fn tty_columns() -> Option<usize> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal() -> Surroundings {
        Surroundings {
            stdout_tty: true,
            columns: Some(120),
            ..Surroundings::default()
        }
    }

    #[test]
    fn test_terminal_gets_pretty_colour() {
        let ctx = UiContext::from_surroundings(&terminal(), false, false, false);
        assert_eq!(ctx.mode, OutputMode::Pretty);
        assert!(ctx.color);
        assert_eq!(ctx.width, 120);
        assert!(ctx.allows_animation());
    }

    #[test]
    fn test_swiftbar_is_plain_and_still() {
        let env = Surroundings {
            under_swiftbar: true,
            ..terminal()
        };
        let ctx = UiContext::from_surroundings(&env, false, false, false);
        assert_eq!(ctx.mode, OutputMode::Plain);
        assert!(!ctx.color);
        assert!(!ctx.allows_animation());
    }

    #[test]
    fn test_pipe_without_columns_uses_fallback_width() {
        let ctx = UiContext::from_surroundings(&Surroundings::default(), false, false, false);
        assert_eq!(ctx.mode, OutputMode::Plain);
        assert_eq!(ctx.width, FALLBACK_WIDTH);
    }

    #[test]
    fn test_flags_override_terminal() {
        let ctx = UiContext::from_surroundings(&terminal(), true, true, true);
        assert_eq!(ctx.mode, OutputMode::Json);
        assert!(!ctx.color);
        assert!(!ctx.unicode);

        let env = Surroundings {
            no_color: true,
            ..terminal()
        };
        assert!(!UiContext::from_surroundings(&env, false, false, false).color);
    }
}
