//! Uninstall command implementation
//!
//! Delegates to `officetpl_install` for the removal steps.

use crate::{elapsed_ms, OpsCtx};
use officetpl_errors::Error;
use officetpl_events::{AppEvent, EventEmitter, UninstallEvent};
use officetpl_install::{resolve_payload_dir, UninstallEngine};
use officetpl_platform::{close_office_apps, open_template_folders};
use officetpl_types::{DestinationSet, UninstallReport};
use std::path::Path;
use std::time::Instant;

/// Remove a payload's templates and their recent-templates entries
///
/// # Errors
///
/// Returns an error only when the payload folder cannot be determined.
pub fn uninstall(ctx: &OpsCtx, payload: Option<&Path>) -> Result<UninstallReport, Error> {
    let start = Instant::now();
    ctx.emit_operation_started("uninstall");

    if ctx.config.general.close_apps {
        close_office_apps(ctx);
    }

    let paths = ctx.resolve_paths();
    let working_dir = payload.unwrap_or(ctx.working_dir.as_path());
    let payload_dir = resolve_payload_dir(working_dir, &paths.appdata, ctx)?;
    ctx.emit(AppEvent::Uninstall(UninstallEvent::Started {
        payload_dir: payload_dir.clone(),
    }));

    let destinations = DestinationSet::from_paths(&paths);
    let mut engine = UninstallEngine::new(&destinations, ctx.registry.as_ref(), ctx);
    let flags = engine.determine_open_flags(&payload_dir);
    engine.log_folder_contents(&paths);

    engine.remove_normal_templates();
    engine.remove_installed_templates();
    engine.delete_custom_copies(&payload_dir);
    engine.clear_mru_entries_for_payload(&payload_dir);
    // Office may have rewritten Normal.dotm while closing
    engine.remove_normal_templates();

    let mut report = engine.into_report(payload_dir, flags);
    if ctx.config.general.open_folders {
        open_template_folders(&paths, &report.flags, ctx);
    }

    report.duration_ms = elapsed_ms(start);
    ctx.emit_operation_completed("uninstall", report.is_clean());
    Ok(report)
}
