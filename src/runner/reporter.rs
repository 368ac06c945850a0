use crate::history::HistoryEntry;
use crate::runner::types::{RunSummary, entry_passed};
use crate::utils::{ResponseFormat, ResponseFormatter};
use colored::Colorize;

pub struct TestReporter {
    verbose: bool,
    formatter: ResponseFormatter,
}

impl TestReporter {
    pub fn new(verbose: bool) -> Self {
        let format = if verbose {
            ResponseFormat::Verbose
        } else {
            ResponseFormat::Compact
        };

        Self {
            verbose,
            formatter: ResponseFormatter::new(format),
        }
    }

    /// 打印单个请求的结果
    pub fn print_entry(&self, number: usize, entry: &HistoryEntry) {
        let passed = entry_passed(entry);
        let symbol = if passed { "✓".green() } else { "✗".red() };

        let name_part = if entry.request.name.is_empty() {
            String::new()
        } else {
            format!(" {} -", entry.request.name)
        };

        println!(
            " {} [{}]{} {} {} ({}ms)",
            symbol,
            number,
            name_part,
            entry.request.method.as_str().cyan(),
            entry.request.url,
            entry.response.elapsed_ms
        );

        // verbose 模式或未通过时显示响应详情
        if self.verbose || !passed {
            for line in self.formatter.format(&entry.response).lines() {
                println!("   {}", line);
            }
            println!();
        }

        if !entry.assertion_results.is_empty() {
            println!(
                "   Assertions: {}",
                entry.assertion_summary().to_string().bold()
            );
            for result in &entry.assertion_results {
                if result.passed {
                    println!("     {} {}: {}", "✓".green(), result.kind, result.expected);
                } else {
                    println!("     {} {}: {}", "✗".red(), result.kind, result.expected);
                    println!("       {}", format!("actual: {}", result.actual).red());
                }
            }
            println!();
        }
    }

    /// 打印运行开始
    pub fn print_header(&self, collection: &str, total: usize) {
        println!(
            "\nRunning {} requests from {}...\n",
            total,
            collection.bold()
        );
    }

    /// 打印运行摘要
    pub fn print_summary(&self, summary: &RunSummary) {
        println!("\n{}", "━".repeat(50));
        println!("{}", "Summary".bold());
        println!("{}", "━".repeat(50));

        if summary.failed == 0 {
            println!(
                "  {}: {} passed, {} total",
                "Requests".bold(),
                summary.passed.to_string().green(),
                summary.total
            );
        } else {
            println!(
                "  {}: {} passed, {} failed ({} errors), {} total",
                "Requests".bold(),
                summary.passed.to_string().green(),
                summary.failed.to_string().red(),
                summary.errors,
                summary.total
            );
        }

        if summary.total_assertions > 0 {
            if summary.failed_assertions == 0 {
                println!(
                    "  {}: {} passed, {} total",
                    "Assertions".bold(),
                    summary.passed_assertions.to_string().green(),
                    summary.total_assertions
                );
            } else {
                println!(
                    "  {}: {} passed, {} failed, {} total",
                    "Assertions".bold(),
                    summary.passed_assertions.to_string().green(),
                    summary.failed_assertions.to_string().red(),
                    summary.total_assertions
                );
            }
        }

        println!(
            "  {}: {:.3}s",
            "Duration".bold(),
            summary.total_elapsed_ms / 1000.0
        );
        println!();
    }
}

impl Default for TestReporter {
    fn default() -> Self {
        Self::new(false)
    }
}
