use crate::infra::{demo_agents, demo_listings, InMemoryRemoteStore};
use chrono::Local;
use clap::Args;
use estate_console::catalog::{CatalogService, DerivedStats, ListingId};
use estate_console::chat::ChatSession;
use estate_console::config::Capabilities;
use estate_console::error::AppError;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the scripted chat portion of the demo output.
    #[arg(long)]
    pub(crate) skip_chat: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryRemoteStore::seeded(demo_listings(), demo_agents()));
    let mut catalog = CatalogService::new(store, Capabilities::permissive());
    catalog.refresh()?;

    println!("Estate console demo");
    print_stats("Initial catalog", &catalog.stats());
    print_tables(&catalog);

    let cozy = ListingId("1".to_string());
    let changed = catalog.delist(&cozy)?;
    println!("\nDelisted listing {cozy} (changed: {changed})");
    print_stats("After delist", &catalog.stats());

    let changed = catalog.delist(&cozy)?;
    println!("Delisted listing {cozy} again (changed: {changed}, idempotent)");

    let changed = catalog.relist(&cozy)?;
    println!("Relisted listing {cozy} (changed: {changed})");
    print_stats("After relist", &catalog.stats());

    if !args.skip_chat {
        print_chat(&catalog);
    }

    Ok(())
}

fn print_stats(label: &str, stats: &DerivedStats) {
    println!("\n{label}");
    println!(
        "  total {} | active {} (${:.0}) | inactive {} (${:.0})",
        stats.total_count,
        stats.active_count,
        stats.active_value_sum,
        stats.inactive_count,
        stats.inactive_value_sum,
    );
}

fn print_tables(catalog: &CatalogService<InMemoryRemoteStore>) {
    println!("\nActive properties");
    for listing in catalog.active_listings() {
        println!("  {} - {} (${:.0})", listing.id, listing.title, listing.price);
    }
    println!("Inactive properties");
    for listing in catalog.inactive_listings() {
        println!("  {} - {} (${:.0})", listing.id, listing.title, listing.price);
    }
}

fn print_chat(catalog: &CatalogService<InMemoryRemoteStore>) {
    let mut session = ChatSession::scripted("Demo", "admin@estate-console.local", "james@lillardco.com");
    let _ = session.send("Sounds good, talk soon!", Local::now());

    let partner = session
        .partner(catalog.agents())
        .map(|agent| agent.display_name())
        .unwrap_or_else(|| "Agent".to_string());

    println!("\nChat with {partner}");
    for message in session.messages() {
        println!("  [{}] {}: {}", message.timestamp, message.sender_name, message.body);
    }
}
