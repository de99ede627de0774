use anyhow::Result;
use folio_core::{
    ConsoleEvent, EventKind, Page, Portfolio, ProjectCategory, SeoMetadata, render_page,
};
use folio_errors::errors;
use serde_json::json;

use crate::context::AppContext;
use crate::output::{print_json, print_lines};
use crate::{PageArgs, SeoArgs};

fn parse_page(name: &str) -> Result<Page> {
    Page::parse(name).ok_or_else(|| errors::unknown_page(name).into_error())
}

pub(crate) fn run_page(ctx: &AppContext, args: PageArgs) -> Result<()> {
    let page = parse_page(&args.name)?;
    let filter = match args.category.as_deref() {
        Some(raw) => Some(
            ProjectCategory::parse(raw).ok_or_else(|| errors::unknown_category(raw).into_error())?,
        ),
        None => None,
    };
    let portfolio = Portfolio::embedded()?;
    let lines = render_page(page, &portfolio, &ctx.translator(), filter);
    ctx.record(&ConsoleEvent::new(
        EventKind::PageViewed,
        json!({ "page": page.path() }),
    ));

    if ctx.json {
        print_json(&json!({
            "page": page,
            "path": page.path(),
            "category": filter,
            "lines": lines,
        }))?;
    } else {
        let texts: Vec<&str> = lines.iter().map(|line| line.text.as_str()).collect();
        print_lines(&texts);
    }
    Ok(())
}

pub(crate) fn run_seo(ctx: &AppContext, args: SeoArgs) -> Result<()> {
    let pages = match args.page.as_deref() {
        Some(name) => vec![parse_page(name)?],
        None => Page::ALL.to_vec(),
    };
    let metadata: Vec<SeoMetadata> = pages
        .iter()
        .map(|page| SeoMetadata::for_page(&ctx.cfg.site, *page))
        .collect();

    if ctx.json {
        if let [single] = metadata.as_slice() {
            print_json(single)?;
        } else {
            print_json(&metadata)?;
        }
        return Ok(());
    }

    for meta in &metadata {
        println!("<title>{}</title>", meta.title);
        println!("<link rel=\"canonical\" href=\"{}\" />", meta.canonical_url);
        for tag in &meta.meta {
            println!(
                "<meta {}=\"{}\" content=\"{}\" />",
                tag.attribute, tag.key, tag.content
            );
        }
        println!("<script type=\"application/ld+json\">");
        println!("{}", serde_json::to_string_pretty(&meta.structured_data)?);
        println!("</script>");
        println!();
    }
    Ok(())
}
