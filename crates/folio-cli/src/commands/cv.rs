use anyhow::Result;
use folio_core::{ConsoleEvent, EventKind, Language};
use folio_errors::errors;
use folio_ui::{Downloader, FileDownloader};
use serde_json::json;

use crate::CvArgs;
use crate::context::AppContext;
use crate::output::print_json;

pub(crate) fn run_cv(ctx: &AppContext, args: CvArgs) -> Result<()> {
    let language = match args.language.as_deref() {
        Some(raw) => Language::parse(raw).ok_or_else(|| errors::unknown_language(raw).into_error())?,
        None => ctx.language(),
    };
    let mut downloader = FileDownloader::from_config(&ctx.cfg.cv, ctx.workspace());
    if let Some(dest) = args.dest {
        downloader = downloader.with_dest_dir(dest);
    }

    let path = match downloader.save(language) {
        Ok(path) => path,
        Err(err) => {
            ctx.record(&ConsoleEvent::new(
                EventKind::CvFailed,
                json!({ "error": format!("{err:#}") }),
            ));
            return Err(err);
        }
    };
    ctx.record(&ConsoleEvent::new(
        EventKind::CvDownloaded,
        json!({ "path": path.display().to_string() }),
    ));

    if ctx.json {
        print_json(&json!({
            "language": language,
            "path": path.display().to_string(),
        }))?;
    } else {
        let t = ctx.translator();
        println!("{} {}", t.t("cv.downloaded"), path.display());
    }
    Ok(())
}
