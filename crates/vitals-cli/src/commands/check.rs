use vitals_core::store::FileStatus;

use crate::app::AppContext;
use crate::cli::CheckArgs;
use crate::errors::CliError;
use crate::ui::{header, print, simple_table};

use super::print_json;

pub fn handle_check(ctx: &AppContext, args: &CheckArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let store = ctx.store()?;
    let checks = store.check();
    let failed = checks.iter().filter(|c| c.is_failed()).count();

    if ui_ctx.mode.is_json() {
        print_json(&checks)?;
    } else {
        print(
            &ui_ctx,
            &header(&ui_ctx, "check", Some(&store.data_dir().display().to_string())),
        );
        let rows: Vec<Vec<String>> = checks
            .iter()
            .map(|c| {
                let (status, detail) = match &c.status {
                    FileStatus::Missing => ("missing".to_string(), String::new()),
                    FileStatus::Ok { records, undated } => (
                        "ok".to_string(),
                        if *undated > 0 {
                            format!("{} records, {} undated", records, undated)
                        } else {
                            format!("{} records", records)
                        },
                    ),
                    FileStatus::Failed { error } => ("failed".to_string(), error.clone()),
                };
                vec![c.file.to_string(), status, detail]
            })
            .collect();
        print(&ui_ctx, &simple_table(&ui_ctx, &["File", "Status", "Detail"], &rows));
    }

    if failed > 0 {
        return Err(CliError::DataCorrupt {
            message: format!("{} data file(s) could not be read", failed),
            hint: "Hint: Re-run `vitals export` to rebuild the data files.".to_string(),
        }
        .into());
    }
    Ok(())
}
