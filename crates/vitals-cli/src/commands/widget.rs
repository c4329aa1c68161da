use chrono::Local;

use crate::app::AppContext;
use crate::views::widget::{render_error, Dashboard, WidgetRenderer};

/// Plugin output always goes to stdout; failures render as an error item.
pub fn handle_widget(ctx: &AppContext) -> anyhow::Result<()> {
    match render(ctx) {
        Ok(text) => println!("{}", text),
        Err(err) => {
            tracing::warn!(error = %err, "widget render failed");
            println!("{}", render_error(&err));
        }
    }
    Ok(())
}

fn render(ctx: &AppContext) -> anyhow::Result<String> {
    let dashboard = Dashboard::collect(ctx.store()?, Local::now())?;
    let exe = std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "vitals".to_string());
    Ok(WidgetRenderer::new(&ctx.config().widget, &exe).render(&dashboard))
}
