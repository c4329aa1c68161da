//! Shell-outs to the desktop: menu bar refresh and notifications.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

use crate::config::{home_dir, RefreshMethod, WidgetSection};

/// Ask the menu bar host to re-run the widget.
///
/// Returns whether any refresh mechanism succeeded.
pub fn refresh_widget(widget: &WidgetSection) -> anyhow::Result<bool> {
    let plugin = plugin_path(&widget.plugin_name)?;
    let refreshed = match widget.refresh_method {
        RefreshMethod::UrlScheme => {
            let url = format!("swiftbar://refreshplugin?name={}", widget.plugin_name);
            run_quietly("open", &["-g", &url]) || touch_if_exists(&plugin)
        }
        RefreshMethod::Touch => touch_if_exists(&plugin),
        RefreshMethod::Restart => {
            // killall fails when the app is not running; relaunch regardless.
            run_quietly("killall", &["SwiftBar"]);
            run_quietly("open", &["-a", "SwiftBar"])
        }
    };
    tracing::debug!(method = ?widget.refresh_method, refreshed, "widget refresh");
    Ok(refreshed)
}

/// Where SwiftBar keeps its plugin scripts.
pub fn plugin_path(plugin_name: &str) -> anyhow::Result<PathBuf> {
    Ok(home_dir()?
        .join("Library")
        .join("Application Support")
        .join("SwiftBar")
        .join("Plugins")
        .join(plugin_name))
}

fn touch_if_exists(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    let touched = std::fs::File::options()
        .append(true)
        .open(path)
        .and_then(|file| file.set_modified(SystemTime::now()));
    match touched {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to touch plugin");
            false
        }
    }
}

fn run_quietly(program: &str, args: &[&str]) -> bool {
    match Command::new(program).args(args).output() {
        Ok(output) => output.status.success(),
        Err(err) => {
            tracing::debug!(program, error = %err, "command unavailable");
            false
        }
    }
}

/// Escape text for an AppleScript string literal.
pub fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// AppleScript for `display notification`.
pub fn notification_script(title: &str, subtitle: Option<&str>, message: &str, sound: &str) -> String {
    let mut script = format!(
        "display notification \"{}\" with title \"{}\"",
        escape_applescript(message),
        escape_applescript(title)
    );
    if let Some(subtitle) = subtitle {
        script.push_str(&format!(" subtitle \"{}\"", escape_applescript(subtitle)));
    }
    script.push_str(&format!(" sound name \"{}\"", escape_applescript(sound)));
    script
}

/// Post a desktop notification. Off macOS the message is only logged.
pub fn send_notification(
    title: &str,
    subtitle: Option<&str>,
    message: &str,
    sound: &str,
) -> anyhow::Result<()> {
    if cfg!(target_os = "macos") {
        let script = notification_script(title, subtitle, message, sound);
        let output = Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output()
            .map_err(|e| anyhow::anyhow!("Failed to run osascript: {}", e))?;
        if !output.status.success() {
            return Err(anyhow::anyhow!(
                "osascript failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
    } else {
        tracing::info!(title, subtitle, message, "notification (not delivered on this platform)");
    }
    Ok(())
}
