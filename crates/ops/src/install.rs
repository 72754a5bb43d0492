//! Install command implementation
//!
//! Resolves folders and payload, then delegates the copying to
//! `officetpl_install` and handles the Office processes around it.

use crate::{elapsed_ms, OpsCtx};
use officetpl_author::AuthorValidator;
use officetpl_errors::Error;
use officetpl_events::{AppEvent, EventEmitter, InstallEvent};
use officetpl_install::{resolve_payload_dir, InstallEngine};
use officetpl_platform::{close_office_apps, launch_office_apps, open_template_folders};
use officetpl_types::{DestinationSet, InstallReport};
use std::path::Path;
use std::time::{Duration, Instant};

/// Install the templates of a payload folder
///
/// `payload` overrides the folder the run was started from.
///
/// # Errors
///
/// Returns an error only when the payload folder cannot be determined; in
/// that case nothing has been touched. Per-file problems are reported in
/// the returned counters.
pub fn install(ctx: &OpsCtx, payload: Option<&Path>) -> Result<InstallReport, Error> {
    let start = Instant::now();
    ctx.emit_operation_started("install");

    let paths = ctx.resolve_paths();
    let working_dir = payload.unwrap_or(ctx.working_dir.as_path());
    let payload_dir = resolve_payload_dir(working_dir, &paths.appdata, ctx)?;
    ctx.emit(AppEvent::Install(InstallEvent::Started {
        payload_dir: payload_dir.clone(),
    }));

    let general = &ctx.config.general;
    if general.close_apps {
        close_office_apps(ctx);
    }

    let destinations = DestinationSet::from_paths(&paths);
    let validator = AuthorValidator::new(
        ctx.config.allowed_authors(),
        ctx.config.authors.validation_enabled,
    );
    let mut engine = InstallEngine::new(&destinations, &validator, ctx.registry.as_ref(), ctx);
    engine.install_base_templates(&payload_dir);
    engine.copy_custom_templates(&payload_dir);
    let mut report = engine.into_report(payload_dir);

    if general.open_folders {
        open_template_folders(&paths, &report.flags, ctx);
    }
    if general.launch_apps {
        if report.flags.open_document_theme && general.document_theme_delay_secs > 0 {
            ctx.emit(AppEvent::Install(InstallEvent::ThemeDelay {
                seconds: general.document_theme_delay_secs,
            }));
            std::thread::sleep(Duration::from_secs(general.document_theme_delay_secs));
        }
        launch_office_apps(&report.flags, ctx);
    }

    report.duration_ms = elapsed_ms(start);
    ctx.emit_operation_completed("install", report.errors() == 0);
    Ok(report)
}
