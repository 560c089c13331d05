//! Output formatting for CLI

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use owo_colors::OwoColorize;
use serde::Serialize;
use solid_clientid::{ResultDescription, RuleMetadata, Status, ValidationResult};

/// Format and display output based on format preference
pub struct Formatter {
    format: OutputFormat,
    colored: bool,
}

/// One rule of the catalog as rendered by `rules --format json`.
#[derive(Debug, Serialize)]
struct RuleEntry<'a> {
    #[serde(flatten)]
    rule: &'a RuleMetadata,
    results: &'a [ResultDescription],
}

impl Formatter {
    #[must_use]
    pub fn new(format: OutputFormat, colored: bool) -> Self {
        Self { format, colored }
    }

    /// Display any serializable value as JSON
    pub fn display<T: Serialize + ?Sized>(&self, value: &T) -> CliResult<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Display validation findings
    pub fn display_results(&self, subject: &str, results: &[ValidationResult]) -> CliResult<()> {
        match self.format {
            OutputFormat::Json => self.display(results),
            OutputFormat::Human => {
                self.print_header(&format!("Validation of {subject}"));
                if results.is_empty() {
                    self.print_info("No findings");
                    return Ok(());
                }

                let mut table = self.table();
                table.set_header(vec!["Status", "Rule", "Title", "Fields", "Description"]);
                for result in results {
                    table.add_row(vec![
                        self.status_cell(result.status()),
                        Cell::new(&result.rule.name),
                        Cell::new(result.title()),
                        Cell::new(format_fields(result)),
                        Cell::new(&result.result.description),
                    ]);
                }
                println!("{table}");
                self.print_footer(&summary(results));
                Ok(())
            }
        }
    }

    /// Display the rule catalog with the findings each rule can produce
    pub fn display_rules(&self, rules: &[(&RuleMetadata, &'static [ResultDescription])]) -> CliResult<()> {
        match self.format {
            OutputFormat::Json => {
                let entries: Vec<_> = rules
                    .iter()
                    .map(|(rule, results)| RuleEntry { rule, results })
                    .collect();
                self.display(&entries)
            }
            OutputFormat::Human => {
                for (rule, results) in rules {
                    self.print_header(&format!("{} ({})", rule.name, rule.category));
                    println!("{}", rule.description);

                    let mut table = self.table();
                    table.set_header(vec!["Status", "Title", "Description"]);
                    for result in *results {
                        table.add_row(vec![
                            self.status_cell(result.status),
                            Cell::new(result.title),
                            Cell::new(result.description),
                        ]);
                    }
                    println!("{table}");
                }
                self.print_footer(&format!("Total: {} rules", rules.len()));
                Ok(())
            }
        }
    }

    /// Display error with suggestions
    pub fn display_error(&self, error: &CliError) {
        if self.colored {
            eprintln!("{}: {}", "Error".bright_red().bold(), error);

            let suggestions = error.suggestions();
            if !suggestions.is_empty() {
                eprintln!("\n{}", "Suggestions:".bright_yellow().bold());
                for suggestion in suggestions {
                    eprintln!("  {} {}", "•".bright_blue(), suggestion);
                }
            }
        } else {
            eprintln!("Error: {error}");

            let suggestions = error.suggestions();
            if !suggestions.is_empty() {
                eprintln!("\nSuggestions:");
                for suggestion in suggestions {
                    eprintln!("  • {suggestion}");
                }
            }
        }
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).apply_modifier(UTF8_ROUND_CORNERS);
        if !self.colored {
            table.force_no_tty();
        }
        table
    }

    fn status_cell(&self, status: Status) -> Cell {
        let cell = Cell::new(status.as_str());
        match status {
            Status::Error => cell.fg(Color::Red),
            Status::Warning => cell.fg(Color::Yellow),
            Status::Info => cell.fg(Color::Blue),
            Status::Success => cell.fg(Color::Green),
        }
    }

    fn print_header(&self, text: &str) {
        if self.colored {
            println!("\n{}", text.bright_cyan().bold());
            println!("{}", "=".repeat(text.len()).bright_cyan());
        } else {
            println!("\n{text}");
            println!("{}", "=".repeat(text.len()));
        }
    }

    fn print_footer(&self, text: &str) {
        if self.colored {
            println!("\n{}", text.bright_black());
        } else {
            println!("\n{text}");
        }
    }

    fn print_info(&self, text: &str) {
        if self.colored {
            println!("{}", text.bright_blue());
        } else {
            println!("{text}");
        }
    }
}

/// `name = value` per affected field, one per line.
fn format_fields(result: &ValidationResult) -> String {
    result
        .affected_fields()
        .iter()
        .map(|field| match &field.field_value {
            serde_json::Value::String(value) => format!("{} = {}", field.field_name, value),
            value => format!("{} = {}", field.field_name, value),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Count findings per status, most severe first.
pub fn summary(results: &[ValidationResult]) -> String {
    let count = |status: Status| results.iter().filter(|r| r.status() == status).count();
    format!(
        "{} errors, {} warnings, {} info, {} passed",
        count(Status::Error),
        count(Status::Warning),
        count(Status::Info),
        count(Status::Success)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use solid_clientid::{RuleResult, ValidationResult};

    static RULE: RuleMetadata = RuleMetadata::local("validScope", "scope check");

    fn finding(status: Status) -> ValidationResult {
        ValidationResult::new(
            RuleResult::new(status, "title", "description").with_field("scope", "openid"),
            RULE.clone(),
        )
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            finding(Status::Error),
            finding(Status::Error),
            finding(Status::Warning),
            finding(Status::Success),
        ];
        assert_eq!(summary(&results), "2 errors, 1 warnings, 0 info, 1 passed");
    }

    #[test]
    fn test_fields_render_unquoted_strings() {
        let result = ValidationResult::new(
            RuleResult::new(Status::Error, "t", "d")
                .with_field("redirect_uris[0]", "https://a.example/cb")
                .with_field("default_max_age", 5),
            RULE.clone(),
        );
        assert_eq!(
            format_fields(&result),
            "redirect_uris[0] = https://a.example/cb\ndefault_max_age = 5"
        );
    }
}
