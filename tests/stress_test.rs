//! Stress tests for the clearing engine.
//!
//! These tests verify, over large seeded populations:
//! 1. Determinism: same seed, same dispatched orders, same state roots
//! 2. Conservation: every committed request is filled exactly
//! 3. No offer is consumed twice
//! 4. Offered quantity is never created or lost
//! 5. Rejected requests leave the offer pool exactly as it was
//!
//! ## Running Stress Tests
//!
//! ```bash
//! # Run all stress tests (release mode recommended)
//! cargo test --release --test stress_test -- --nocapture
//!
//! # Run specific test
//! cargo test --release --test stress_test stress_many_cycles -- --nocapture
//! ```

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use commodity_clearing::engine::{MatchingEngine, OrderLedger};
use commodity_clearing::types::quantity::{from_fixed_trimmed, units};
use commodity_clearing::{
    ClearingConfig, Market, Message, Resource, Transaction, TransactionRegistry,
};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Resolution cycles per stress run
const CYCLES: usize = 200;

/// Offers submitted per cycle
const OFFERS_PER_CYCLE: usize = 50;

/// Requests submitted per cycle
const REQUESTS_PER_CYCLE: usize = 40;

const MARKET_ID: u64 = 100;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Pick a grade: mostly natural uranium, some enriched.
fn random_resource(rng: &mut ChaCha8Rng, max_units: u64) -> Resource {
    let quality = if rng.gen_bool(0.8) { "natu" } else { "leu" };
    Resource::new("kg", quality, units(rng.gen_range(1..=max_units)))
}

/// Generate one cycle's worth of messages, offers and requests interleaved.
///
/// Quantities are whole units so split remainders are never negligible.
fn generate_cycle(rng: &mut ChaCha8Rng) -> Vec<Message> {
    let mut messages = Vec::with_capacity(OFFERS_PER_CYCLE + REQUESTS_PER_CYCLE);
    let mut offers_left = OFFERS_PER_CYCLE;
    let mut requests_left = REQUESTS_PER_CYCLE;

    while offers_left + requests_left > 0 {
        let pick_offer = requests_left == 0 || (offers_left > 0 && rng.gen_bool(0.55));
        if pick_offer {
            let supplier = rng.gen_range(1..=500);
            let tx = Transaction::offer("uranium", supplier, random_resource(rng, 50))
                .with_price(units(rng.gen_range(20..=80)));
            messages.push(Message::new(supplier, MARKET_ID, tx));
            offers_left -= 1;
        } else {
            let requester = rng.gen_range(1_000..=1_500);
            let tx = Transaction::request("uranium", requester, random_resource(rng, 40));
            messages.push(Message::new(requester, MARKET_ID, tx));
            requests_left -= 1;
        }
    }

    messages
}

/// Run every cycle for `seed` and return each cycle's state root.
fn run_deterministic_sequence(seed: u64, cycles: usize) -> Vec<[u8; 32]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut market = Market::new(ClearingConfig::new("uranium"), Vec::<Message>::new()).unwrap();

    let mut roots = Vec::with_capacity(cycles);
    for _ in 0..cycles {
        for message in generate_cycle(&mut rng) {
            market.accept(message);
        }
        roots.push(market.resolve().receipt.state_root);
    }
    roots
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Main stress test: many cycles of mixed offers and requests.
///
/// # Verification
/// - Every committed request is filled to exactly its quantity
/// - No offer id appears in two trades
/// - Offered quantity = dispatched + still pooled
#[test]
fn stress_many_cycles() {
    println!("\n=== STRESS TEST: {} cycles ===\n", CYCLES);

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut market = Market::new(
        ClearingConfig::new("uranium").with_market_id(MARKET_ID),
        Vec::<Message>::new(),
    )
    .unwrap();

    let mut offered_total = 0u64;
    let mut dispatched_total = 0u64;
    let mut trade_count = 0usize;
    let mut satisfied_total = 0u64;
    let mut processed_total = 0u64;
    let mut seen_offers = HashSet::new();

    let start = Instant::now();

    for _ in 0..CYCLES {
        let mut requested = HashMap::new();
        for message in generate_cycle(&mut rng) {
            let is_offer = message.is_offer();
            let quantity = message.quantity();
            let id = market.try_accept(message).unwrap();
            if is_offer {
                offered_total += quantity;
            } else {
                requested.insert(id, quantity);
            }
        }

        let result = market.resolve();

        let mut filled: HashMap<u64, u64> = HashMap::new();
        for trade in &result.trades {
            *filled.entry(trade.request_id).or_default() += trade.quantity;
            assert!(
                seen_offers.insert(trade.offer_id),
                "offer {} consumed twice",
                trade.offer_id
            );
        }
        for (request_id, quantity) in &filled {
            assert_eq!(*quantity, requested[request_id], "request {} not filled exactly", request_id);
        }
        assert_eq!(filled.len() as u64, result.receipt.requests_satisfied);

        dispatched_total += result.receipt.quantity_dispatched;
        trade_count += result.trades.len();
        satisfied_total += result.receipt.requests_satisfied;
        processed_total += result.receipt.requests_processed;
    }

    let elapsed = start.elapsed();
    let pooled = market.registry().offered_quantity();

    println!("=== RESULTS ===");
    println!("  Cycles:            {:>12}", CYCLES);
    println!("  Requests:          {:>12}", processed_total);
    println!("  Satisfied:         {:>12}", satisfied_total);
    println!("  Orders dispatched: {:>12}", trade_count);
    println!("  Offers pooled:     {:>12}", market.registry().offer_count());
    println!("  Offered:           {:>12}", from_fixed_trimmed(offered_total));
    println!("  Dispatched:        {:>12}", from_fixed_trimmed(dispatched_total));
    println!("  Elapsed time:      {:>12.2?}", elapsed);

    assert_eq!(processed_total, (CYCLES * REQUESTS_PER_CYCLE) as u64);
    assert_eq!(market.registry().request_count(), 0);
    assert_eq!(offered_total, dispatched_total + pooled, "offered quantity not conserved");
    assert_eq!(market.downstream().len(), trade_count);
    assert!(satisfied_total > 0, "Expected some requests to clear");

    println!("\n=== STRESS TEST PASSED ===\n");
}

/// Verify determinism: same sequence produces identical state roots.
#[test]
fn verify_determinism() {
    println!("\n=== DETERMINISM TEST ===\n");

    const TEST_CYCLES: usize = 50;
    const SEED: u64 = 12345;

    let roots1 = run_deterministic_sequence(SEED, TEST_CYCLES);
    let roots2 = run_deterministic_sequence(SEED, TEST_CYCLES);

    println!("  Run 1 last root: {}", hex::encode(roots1[TEST_CYCLES - 1]));
    println!("  Run 2 last root: {}", hex::encode(roots2[TEST_CYCLES - 1]));

    assert_eq!(roots1, roots2, "State roots must match for determinism");

    let roots3 = run_deterministic_sequence(SEED + 1, TEST_CYCLES);
    println!("  Different seed:  {}", hex::encode(roots3[TEST_CYCLES - 1]));
    assert_ne!(roots1, roots3, "Different seeds should produce different roots");

    println!("\n=== DETERMINISM VERIFIED ===\n");
}

/// Every rejected request must leave the offer pool as it found it.
#[test]
fn stress_rollback_exactness() {
    println!("\n=== ROLLBACK STRESS TEST ===\n");

    const OFFERS: usize = 2_000;
    const REQUESTS: usize = 2_000;

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut registry = TransactionRegistry::with_capacity(OFFERS * 2);
    let engine = MatchingEngine::new();
    let mut ledger = OrderLedger::default();

    for _ in 0..OFFERS {
        let supplier = rng.gen_range(1..=500);
        let tx = Transaction::offer("uranium", supplier, random_resource(&mut rng, 30));
        registry.accept(Message::new(supplier, MARKET_ID, tx));
    }

    let mut rejected = 0;
    let mut committed = 0;

    for _ in 0..REQUESTS {
        // occasionally ask for far more than any single cycle could hold
        let max_units = if rng.gen_bool(0.1) { 100_000 } else { 60 };
        let requester = rng.gen_range(1_000..=1_500);
        let tx = Transaction::request("uranium", requester, random_resource(&mut rng, max_units));
        let request_id = registry.accept(Message::new(requester, MARKET_ID, tx));
        assert_eq!(registry.pop_largest_request(), Some(request_id));

        let before = registry.offer_snapshot();
        let tentative = engine.match_request(&mut registry, request_id);

        if tentative.is_satisfied() {
            ledger.commit(&mut registry, tentative);
            committed += 1;
        } else {
            ledger.rollback(&mut registry, tentative);
            assert_eq!(registry.offer_snapshot(), before, "rollback changed the pool");
            rejected += 1;
        }
        registry.remove(request_id);
    }

    println!("  Committed:         {:>12}", committed);
    println!("  Rejected:          {:>12}", rejected);
    println!("  Firm orders:       {:>12}", ledger.firm_len());
    println!("  Offers left:       {:>12}", registry.offer_count());

    assert!(rejected > 0, "Expected some rejections");
    assert!(committed > 0, "Expected some commits");

    println!("\n=== ROLLBACK STRESS TEST PASSED ===\n");
}

/// Pool size and time per cycle as the carried-over offer pool grows.
#[test]
fn stress_scaling() {
    println!("\n=== SCALING TEST ===\n");

    let test_cycles = [10, 50, 100];

    println!("{:>12} {:>12} {:>12} {:>12}", "Cycles", "Time", "Per cycle", "Pooled");
    println!("{:-<12} {:-<12} {:-<12} {:-<12}", "", "", "", "");

    for &cycles in &test_cycles {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut market = Market::new(ClearingConfig::new("uranium"), Vec::<Message>::new()).unwrap();

        let start = Instant::now();
        for _ in 0..cycles {
            for message in generate_cycle(&mut rng) {
                market.accept(message);
            }
            market.resolve();
            market.downstream_mut().clear();
        }
        let elapsed = start.elapsed();

        println!(
            "{:>12} {:>12.2?} {:>12.2?} {:>12}",
            cycles,
            elapsed,
            elapsed / cycles as u32,
            market.registry().offer_count()
        );
        assert_eq!(market.cycle(), cycles as u64);
    }

    println!("\n=== SCALING TEST COMPLETE ===\n");
}
