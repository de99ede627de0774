use anyhow::Result;

use crate::context::AppContext;
use crate::output::print_json;

pub(crate) fn run_config(ctx: &AppContext) -> Result<()> {
    if ctx.json {
        print_json(&ctx.cfg)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&ctx.cfg)?);
    }
    Ok(())
}
