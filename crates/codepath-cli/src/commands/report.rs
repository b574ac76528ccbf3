use std::path::Path;

use anyhow::Result;

use reporting::json::{load_report, render_json};

pub fn execute(input: &Path, json: bool) -> Result<()> {
    let report = load_report(input)?;

    if json {
        println!("{}", render_json(&report)?);
    } else {
        println!("{}", report.human_summary());
    }
    Ok(())
}
