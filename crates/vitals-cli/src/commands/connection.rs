use vitals_core::HealthClient;

use crate::app::AppContext;
use crate::ui::Spinner;

pub fn handle_test(ctx: &AppContext) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let client = ctx.client()?;
    let spinner = Spinner::start(&ui_ctx, "Connecting");
    match client.full_name() {
        Ok(name) => {
            spinner.finish(&format!("Connected as: {}", name));
            Ok(())
        }
        Err(err) => {
            spinner.finish_err("Connection failed");
            Err(err.into())
        }
    }
}
