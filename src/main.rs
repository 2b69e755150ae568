//! Commodity Clearing - demo binary
//!
//! Runs two clearing cycles for a small uranium market and prints what was
//! dispatched. Set `RUST_LOG=commodity_clearing=debug` to watch matching.

use commodity_clearing::types::quantity::{from_fixed_trimmed, units};
use commodity_clearing::{ClearingConfig, Market, Message, Resource, Transaction};
use tracing_subscriber::EnvFilter;

const MARKET_ID: u64 = 100;

fn natu(quantity: u64) -> Resource {
    Resource::new("kg", "natu", quantity)
}

fn print_cycle(market: &Market<Vec<Message>>, sent: &[Message]) {
    println!("{}", market);
    for message in sent {
        let tx = &message.transaction;
        println!(
            "  order: {} from supplier {} to requester {}",
            tx.resource,
            message.recipient,
            tx.requester.unwrap_or_default()
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("===========================================");
    println!("  Commodity Clearing - uranium market");
    println!("===========================================");
    println!();

    let config = ClearingConfig::new("uranium").with_market_id(MARKET_ID);
    let mut market = match Market::new(config, Vec::<Message>::new()) {
        Ok(market) => market,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    // Cycle 1: one mine, two reactors. The larger request is cleared first
    // and the split remainder fills the smaller one.
    market.accept(Message::new(1, MARKET_ID, Transaction::offer("uranium", 1, natu(units(20)))));
    market.accept(Message::new(2, MARKET_ID, Transaction::request("uranium", 2, natu(units(15)))));
    market.accept(Message::new(3, MARKET_ID, Transaction::request("uranium", 3, natu(units(5)))));

    let result = market.resolve();
    let sent = std::mem::take(market.downstream_mut());
    print_cycle(&market, &sent);
    println!(
        "  cleared {}/{} requests, {} dispatched, root {}",
        result.receipt.requests_satisfied,
        result.receipt.requests_processed,
        from_fixed_trimmed(result.receipt.quantity_dispatched),
        result.receipt.state_root_hex()
    );
    println!();

    // Cycle 2: enriched material nobody offers. The request is rolled back
    // and the natural uranium offer waits for the next cycle.
    market.accept(Message::new(1, MARKET_ID, Transaction::offer("uranium", 1, natu(units(8)))));
    market.accept(Message::new(
        4,
        MARKET_ID,
        Transaction::request("uranium", 4, Resource::new("kg", "leu", units(8))),
    ));

    let result = market.resolve();
    let sent = std::mem::take(market.downstream_mut());
    print_cycle(&market, &sent);
    println!(
        "  cleared {}/{} requests, {} offered quantity still pooled",
        result.receipt.requests_satisfied,
        result.receipt.requests_processed,
        from_fixed_trimmed(market.registry().offered_quantity())
    );
}
