//! Small operations implemented directly in ops

use crate::OpsCtx;
use officetpl_author::AuthorValidator;
use officetpl_types::{AuthorCheckResult, ResolvedPaths};
use std::path::Path;

/// Check the author of a template file, or report on every template in a folder
#[must_use]
pub fn check_author(ctx: &OpsCtx, target: &Path) -> AuthorCheckResult {
    let validator = AuthorValidator::new(
        ctx.config.allowed_authors(),
        ctx.config.authors.validation_enabled,
    );
    validator.check(target, ctx)
}

/// Resolve and report the Office template folders
#[must_use]
pub fn paths(ctx: &OpsCtx) -> ResolvedPaths {
    ctx.resolve_paths()
}
