use crate::infra::{load_catalog, parse_page_type, InMemoryPageRepository};
use chrono::Utc;
use clap::Args;
use lead_pages::config::PagesConfig;
use lead_pages::error::AppError;
use lead_pages::workflows::catalog::InMemoryCatalog;
use lead_pages::workflows::publishing::{
    PageId, PagePublishingService, Party, ServiceSubmitter,
};
use lead_pages::workflows::wizard::{
    fields, CompletedOutput, CreatorIdentity, CreatorRole, FieldKind, PageType, PartyProfile,
    SessionError, WizardContext, WizardSchema, WizardSession,
};
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_TOKEN: &str = "demo-token";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Catalog CSV (kind,id,name,email,phone,license,photo_url,company). Defaults to built-in entries.
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Base URL that demo pages are published under.
    #[arg(long, default_value = "http://127.0.0.1:3000/p")]
    pub(crate) base_url: String,
    /// Print the generated calendar and contact card bodies.
    #[arg(long)]
    pub(crate) show_downloads: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SchemaArgs {
    /// Wizard to describe, e.g. open_house or mortgage-calculator
    #[arg(value_parser = parse_page_type)]
    pub(crate) page_type: PageType,
    /// Emit the schema as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_schema(args: SchemaArgs) -> Result<(), AppError> {
    let schema = WizardSchema::for_page(args.page_type);

    if args.json {
        let body = serde_json::to_string_pretty(&schema).map_err(std::io::Error::from)?;
        println!("{body}");
        return Ok(());
    }

    println!("{} ({} steps)", schema.title, schema.total_steps());
    for (index, step) in schema.steps.iter().enumerate() {
        let mut extras = Vec::new();
        if step.partner_step {
            extras.push("partner picker".to_string());
        }
        if let Some(kind) = step.resource {
            extras.push(format!("requires {}", kind.slug()));
        }
        let extras = if extras.is_empty() {
            String::new()
        } else {
            format!(" [{}]", extras.join(", "))
        };
        println!("  {}. {}{extras}", index + 1, step.title);

        for field in &step.fields {
            let marker = if field.required { "*" } else { " " };
            println!(
                "     {marker} {:<22} {}",
                field.key,
                describe_kind(&field.kind)
            );
        }
    }
    Ok(())
}

fn describe_kind(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Choice(options) => format!("one of {}", options.join(" | ")),
        other => format!("{other:?}").to_ascii_lowercase(),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        catalog_csv,
        base_url,
        show_downloads,
    } = args;

    let pages = PagesConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        submit_token: Some(DEMO_TOKEN.to_string()),
        catalog_csv,
    };
    let catalog = load_catalog(&pages)?;
    let service = PagePublishingService::new(
        Arc::new(InMemoryPageRepository::default()),
        pages.publishing_settings(),
    );

    println!("Lead pages demo");

    let identity = CreatorIdentity::new("demo-lo", ["loan_officer"]);
    let submitter = ServiceSubmitter::new(&service, identity, Some(DEMO_TOKEN.to_string()));

    let page_id = run_open_house(&catalog, &submitter, &pages.base_url)?;
    if let Some(page_id) = page_id {
        print_downloads(&service, &page_id, show_downloads)?;
    }

    run_calculator_embed(&submitter, &pages.base_url)?;
    Ok(())
}

fn demo_context(base_url: &str) -> WizardContext {
    WizardContext {
        creator_role: CreatorRole::LoanOfficer,
        creator: PartyProfile {
            name: "Morgan Ellis".to_string(),
            email: Some("morgan.ellis@example.com".to_string()),
            phone: Some("(515) 555-0142".to_string()),
            license: Some("1456789".to_string()),
            photo_url: None,
            company: Some("Prairie Home Lending".to_string()),
        },
        preferred_partner: None,
        preferred_resource: None,
        embed_base_url: base_url.to_string(),
    }
}

fn advance(session: &mut WizardSession) -> Result<(), AppError> {
    let title = session
        .current_template()
        .map(|step| step.title)
        .unwrap_or_default();
    session.next().map_err(SessionError::from)?;
    println!(
        "  completed '{title}' -> step {} of {} ({}%)",
        session.current_step() + 1,
        session.total_steps(),
        session.progress_percent()
    );
    Ok(())
}

fn run_open_house(
    catalog: &InMemoryCatalog,
    submitter: &ServiceSubmitter<'_, InMemoryPageRepository>,
    base_url: &str,
) -> Result<Option<PageId>, AppError> {
    println!("\nOpen house wizard");
    let mut session = WizardSession::new(PageType::OpenHouse, demo_context(base_url));

    session.load_partners(catalog, None)?;
    let partner = session
        .partner_candidates()
        .first()
        .map(|entry| (entry.id.clone(), entry.profile.name.clone()));
    match partner {
        Some((id, name)) => {
            session.set(fields::PAGE_MODE, fields::MODE_CO_BRANDED);
            session.select_partner(&id)?;
            println!("  co-branding with {name}");
        }
        None => {
            session.set(fields::PAGE_MODE, fields::MODE_SOLO);
            println!("  no realtors in the catalog; publishing solo");
        }
    }
    advance(&mut session)?;

    session.set(fields::PROPERTY_ADDRESS, "1200 Grand Ave, Des Moines, IA");
    session.set(fields::PROPERTY_PRICE, "425000");
    session.set(fields::BEDROOMS, "4");
    advance(&mut session)?;

    session.set(fields::EVENT_DATE, "2026-11-07");
    session.set(fields::START_TIME, "13:00");
    session.set(fields::END_TIME, "15:30");
    advance(&mut session)?;

    session.set(fields::HEADLINE, "Tour 1200 Grand this Saturday");
    session.set(
        fields::DESCRIPTION,
        "Meet the listing agent and get pre-qualified on the spot.",
    );
    session.load_resources(catalog, None)?;
    let form = session
        .resource_candidates()
        .first()
        .map(|entry| entry.id.clone());
    let Some(form) = form else {
        println!("  no sign-in forms in the catalog; skipping publish");
        return Ok(None);
    };
    session.select_resource(&form)?;

    let output = session.submit(submitter)?;
    println!("  published: {}", output.clipboard_text());
    match output {
        CompletedOutput::Published(link) => Ok(Some(PageId(link.id.clone()))),
        CompletedOutput::EmbedCode { .. } => Ok(None),
    }
}

fn print_downloads(
    service: &PagePublishingService<InMemoryPageRepository>,
    page_id: &PageId,
    show_bodies: bool,
) -> Result<(), AppError> {
    let page = service.get(page_id)?;
    let ics = service.calendar(page_id, Utc::now())?;
    println!("  calendar: /api/v1/pages/{page_id}/event.ics ({} bytes)", ics.len());
    if show_bodies {
        println!("{ics}");
    }

    let mut parties = vec![Party::Primary];
    if page.is_co_branded() {
        parties.push(Party::Partner);
    }
    for party in parties {
        let (file_name, card) = service.contact_card(page_id, party)?;
        println!("  {} card: {file_name}", party.prefix());
        if show_bodies {
            println!("{card}");
        }
    }
    Ok(())
}

fn run_calculator_embed(
    submitter: &ServiceSubmitter<'_, InMemoryPageRepository>,
    base_url: &str,
) -> Result<(), AppError> {
    println!("\nMortgage calculator wizard");
    let mut session = WizardSession::new(PageType::MortgageCalculator, demo_context(base_url));

    session.set(fields::PAGE_MODE, fields::MODE_SOLO);
    advance(&mut session)?;
    session.set(fields::HEADLINE, "What will my payment be?");
    session.set(fields::BRAND_COLOR, "#2a9d8f");
    session.set(fields::DEFAULT_HOME_PRICE, "350000");
    session.set(fields::DEFAULT_RATE, "6.25");
    advance(&mut session)?;
    session.set(fields::OUTPUT_TYPE, fields::OUTPUT_EMBED_CODE);

    let output = session.submit(submitter)?;
    println!("  embed code (nothing was published):\n{}", output.clipboard_text());
    Ok(())
}
