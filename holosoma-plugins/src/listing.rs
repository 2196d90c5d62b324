//! Entry point listing for `holosoma-plugins list`.
//!
//! Listing reads manifests directly instead of building registries, so groups
//! no factory knows about are shown as well.

use anyhow::Result;
use holosoma_runtime::ManifestSource;
use serde::Serialize;
use std::fmt::Write;

/// One row of the listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ListedEntryPoint {
    pub group: String,
    pub name: String,
    pub package: String,
    pub version: String,
    pub reference: String,
}

/// Collect every entry point in `source`, sorted by group then name.
pub fn collect(source: &dyn ManifestSource, group: Option<&str>) -> Result<Vec<ListedEntryPoint>> {
    let mut rows = Vec::new();

    for package in source.packages()? {
        for advertised in package.manifest.groups() {
            if group.is_some_and(|g| g != advertised) {
                continue;
            }

            for (name, reference) in package.manifest.entries(advertised) {
                rows.push(ListedEntryPoint {
                    group: advertised.to_string(),
                    name: name.to_string(),
                    package: package.name().to_string(),
                    version: package.version().to_string(),
                    reference: reference.to_string(),
                });
            }
        }
    }

    rows.sort();
    Ok(rows)
}

/// Render rows as an aligned plain-text table.
pub fn render_table(rows: &[ListedEntryPoint]) -> String {
    if rows.is_empty() {
        return "No entry points found\n".to_string();
    }

    let group_w = column_width(rows.iter().map(|r| r.group.as_str()), "GROUP");
    let name_w = column_width(rows.iter().map(|r| r.name.as_str()), "NAME");
    let package_w = column_width(rows.iter().map(|r| r.package.as_str()), "PACKAGE");

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<group_w$}  {:<name_w$}  {:<package_w$}  REFERENCE",
        "GROUP", "NAME", "PACKAGE"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<group_w$}  {:<name_w$}  {:<package_w$}  {}",
            row.group, row.name, row.package, row.reference
        );
    }
    out
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values.map(str::len).max().unwrap_or(0).max(header.len())
}

/// Render rows as pretty-printed JSON.
pub fn render_json(rows: &[ListedEntryPoint]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}
