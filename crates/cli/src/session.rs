//! Line-oriented interactive mode: one paragraph per line, one response
//! per paragraph. An empty line or end of input ends the session.

use crate::output;
use anyhow::Result;
use std::io::{BufRead, Write};
use textmatch_core::checker::Checker;

pub async fn run<R: BufRead, W: Write>(
    checker: &Checker,
    input: R,
    out: &mut W,
    json: bool,
) -> Result<u64> {
    let mut served = 0u64;
    for line in input.lines() {
        let paragraph = line?;
        if paragraph.is_empty() {
            break;
        }
        let results = checker.check(&paragraph).await?;
        if json {
            writeln!(out, "{}", output::to_json(&results)?)?;
        } else {
            writeln!(out, "{}", output::render_text(&results))?;
        }
        served += 1;
    }
    Ok(served)
}
