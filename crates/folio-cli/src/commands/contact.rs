use anyhow::{Result, anyhow};
use folio_core::{ConsoleEvent, EventKind};
use folio_errors::errors;
use folio_ui::{ContactDraft, ContactForm, SubmitResult};
use serde_json::json;
use std::time::{Duration, Instant};

use crate::ContactArgs;
use crate::context::AppContext;
use crate::output::print_json;

pub(crate) fn run_contact(ctx: &AppContext, args: ContactArgs) -> Result<()> {
    let t = ctx.translator();
    let mut form = ContactForm::new(&ctx.cfg.contact);
    form.draft = ContactDraft {
        name: args.name,
        email: args.email,
        company: args.company,
        position: args.position,
        message: args.message,
        honeypot: args.website,
    };

    match form.submit(Instant::now()) {
        SubmitResult::Rejected(field_errors) => {
            let messages = field_errors
                .iter()
                .map(|e| t.t(e.key).to_string())
                .collect();
            return Err(errors::contact_rejected(messages).into_error());
        }
        SubmitResult::Dropped => {
            if ctx.json {
                print_json(&json!({ "submitted": false }))?;
            }
            return Ok(());
        }
        SubmitResult::Busy | SubmitResult::Submitting => {}
    }

    if !ctx.json {
        println!("{}", t.t("contact.sending"));
    }
    std::thread::sleep(Duration::from_millis(ctx.cfg.contact.submit_delay_ms));
    let draft = form
        .poll(Instant::now())
        .ok_or_else(|| anyhow!("contact submission did not complete"))?;
    ctx.record(&ConsoleEvent::new(
        EventKind::ContactSubmitted,
        serde_json::to_value(&draft)?,
    ));

    if ctx.json {
        print_json(&json!({ "submitted": true, "draft": draft }))?;
    } else {
        println!("{}", t.t("contact.success"));
    }
    Ok(())
}
