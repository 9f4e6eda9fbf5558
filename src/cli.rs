// File: src/cli.rs
//! Shared command-line interface logic, like printing help and sniffing the
//! import format.
use crate::document::Document;
use crate::error::Result;
use crate::xer::{XerOptions, parse_xer};

pub fn print_help(binary_name: &str) {
    println!(
        "p6health v{} - DCMA 14-point schedule health assessment for Primavera P6 exports",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} <schedule.xer|schedule.xml> [OPTIONS]", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -p, --project <id>      Project to assess. Omit to list projects.");
    println!("    -s, --settings <file>   TOML settings file with per-check options.");
    println!("    --json                  Emit the full report as JSON.");
    println!("    -v, --verbose           Debug logging.");
    println!("    -h, --help              Show this help message.");
    println!();
    println!("EXAMPLES:");
    println!(
        "    {} schedule.xer                     List projects in the export",
        binary_name
    );
    println!(
        "    {} schedule.xer --project 395       Run all 14 checks",
        binary_name
    );
    println!(
        "    {} schedule.xml -p 395 --json       Machine-readable report",
        binary_name
    );
}

/// Parses the raw import text, deciding between the XER grammar and P6 XML
/// by content, not file extension (real-world files are misnamed often
/// enough that the extension cannot be trusted).
pub fn parse_import(text: &str) -> Result<Document> {
    let head = text.trim_start();
    if head.starts_with('<') {
        crate::p6xml::parse_p6xml(text)
    } else {
        parse_xer(text, &XerOptions::default())
    }
}
