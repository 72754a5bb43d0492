//! Output rendering and formatting

use crate::cli::Commands;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use officetpl_ops::OperationResult;
use officetpl_types::{
    AuthorCheckResult, AuthorFinding, ColorChoice, InstallReport, ResolvedPaths, UninstallReport,
};
use std::io;

const INSTALL_INTRO: &str =
    "Installing custom templates and applying them as the new Microsoft Office defaults...";
const UNINSTALL_INTRO: &str =
    "Removing custom templates and restoring the Microsoft Office default settings...";

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Design mode shows per-run detail tables
    design_mode: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, design_mode: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            design_mode,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Print the line announcing a long-running command
    pub fn render_intro(&self, command: &Commands) {
        if self.json_output || self.design_mode {
            return;
        }
        match command {
            Commands::Install { .. } => println!("{INSTALL_INTRO}"),
            Commands::Uninstall { .. } => println!("{UNINSTALL_INTRO}"),
            Commands::CheckAuthor { .. } | Commands::Paths => {}
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            self.render_json(result)
        } else {
            self.render_text(result);
            Ok(())
        }
    }

    /// Render as JSON
    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    fn render_text(&self, result: &OperationResult) {
        match result {
            OperationResult::InstallReport(report) => self.render_install_report(report),
            OperationResult::UninstallReport(report) => self.render_uninstall_report(report),
            OperationResult::AuthorCheck(check) => self.render_author_check(check),
            OperationResult::Paths(paths) => self.render_paths(paths),
        }
    }

    fn render_install_report(&self, report: &InstallReport) {
        if self.design_mode {
            let mut table = self.table(&["Installed", "Destination"]);
            for path in &report.copied {
                table.add_row(vec![Cell::new("copied"), Cell::new(path.display())]);
            }
            for path in &report.blocked_files {
                table.add_row(vec![
                    Cell::new("blocked").fg(Color::Yellow),
                    Cell::new(path.display()),
                ]);
            }
            println!("{table}");
            println!(
                "files={} errors={} blocked={} ({} ms)",
                report.files(),
                report.errors(),
                report.blocked(),
                report.duration_ms
            );
        }
        self.render_ready();
    }

    fn render_uninstall_report(&self, report: &UninstallReport) {
        if self.design_mode {
            let mut table = self.table(&["Status", "Path"]);
            for path in &report.removed {
                table.add_row(vec![Cell::new("removed"), Cell::new(path.display())]);
            }
            for path in &report.failures {
                table.add_row(vec![
                    Cell::new("remaining").fg(Color::Red),
                    Cell::new(path.display()),
                ]);
            }
            println!("{table}");
            println!(
                "removed={} failures={} mru_cleared={} ({} ms)",
                report.removed.len(),
                report.failures.len(),
                report.mru_cleared,
                report.duration_ms
            );
        }
        if !report.is_clean() {
            let warning = self.style(Style::new().yellow());
            println!(
                "{}",
                warning.apply_to(format!(
                    "{} file(s) could not be removed. Close Office and run the uninstaller again.",
                    report.failures.len()
                ))
            );
        }
        self.render_ready();
    }

    fn render_author_check(&self, check: &AuthorCheckResult) {
        if self.design_mode {
            if !check.findings().is_empty() {
                let mut table = self.table(&["File", "Author"]);
                for finding in check.findings() {
                    let author = match finding {
                        AuthorFinding::Author { author, .. } => author.clone(),
                        AuthorFinding::Empty { .. } => "(empty)".to_string(),
                        AuthorFinding::Skipped { .. } => "(theme, skipped)".to_string(),
                        AuthorFinding::Unreadable { reason, .. } => format!("(unreadable: {reason})"),
                    };
                    table.add_row(vec![Cell::new(finding.file()), Cell::new(author)]);
                }
                println!("{table}");
            }
            eprintln!("{}", check.message());
        }
        println!("{}", check.as_cli_output());
    }

    fn render_paths(&self, paths: &ResolvedPaths) {
        let mut table = self.table(&["Folder", "Path", "Exists"]);
        table.add_row(vec![
            Cell::new("APPDATA"),
            Cell::new(paths.appdata.display()),
            exists_cell(paths.appdata.is_dir()),
        ]);
        table.add_row(vec![
            Cell::new("DOCUMENTS"),
            Cell::new(paths.documents.display()),
            exists_cell(paths.documents.is_dir()),
        ]);
        for (label, path) in paths.template_folders() {
            table.add_row(vec![
                Cell::new(label),
                Cell::new(path.display()),
                exists_cell(path.is_dir()),
            ]);
        }
        println!("{table}");
    }

    fn render_ready(&self) {
        let ready = self.style(Style::new().green());
        println!("{}", ready.apply_to("Ready"));
    }

    fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if !self.colors_enabled() {
            table.force_no_tty();
        }
        table.set_header(
            headers
                .iter()
                .map(|header| Cell::new(header).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
        table
    }

    fn style(&self, style: Style) -> Style {
        if self.colors_enabled() {
            style.force_styling(true)
        } else {
            Style::new()
        }
    }

    fn colors_enabled(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

fn exists_cell(exists: bool) -> Cell {
    if exists {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no")
    }
}
