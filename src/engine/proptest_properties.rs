//! Property-based tests for the engine-level invariants.
//!
//! 1. **Non-decreasing product** — with a positive fee, a pool's
//!    reserve product never shrinks across any swap sequence.
//! 2. **Round-trip loss** — swapping A→B→A returns strictly less than
//!    the original input.
//! 3. **Liquidity round-trip** — add-then-remove on a fresh pool
//!    returns the deposit within integer rounding.
//! 4. **Position conservation** — LP units across positions always sum
//!    to the pool's total.
//! 5. **Quote sanity** — `min_out ≤ expected_out` and the fee matches
//!    the configured rate.

#![allow(clippy::panic)]

use chrono::{Duration, Utc};
use proptest::prelude::*;

use crate::config::ExchangeConfig;
use crate::domain::{Amount, Liquidity, TokenId};
use crate::memory::{InMemoryLedger, InMemoryPoolStore};
use crate::pool::OwnerAddress;
use crate::store::PoolStore;

use super::{AddLiquidityRequest, Exchange, RemoveLiquidityRequest, SwapRequest};

fn tok(sym: &str) -> TokenId {
    let Ok(t) = TokenId::new(sym) else {
        panic!("invalid test symbol: {sym}");
    };
    t
}

fn owner(addr: &str) -> OwnerAddress {
    let Ok(o) = OwnerAddress::new(addr) else {
        panic!("invalid test address: {addr}");
    };
    o
}

/// Engine with one funded PVX/USDC pool and a whale wallet.
fn engine_with_pool(
    reserve_pvx: u128,
    reserve_usdc: u128,
) -> (Exchange<InMemoryPoolStore, InMemoryLedger>, OwnerAddress) {
    let ledger = InMemoryLedger::new();
    let alice = owner("alice");
    ledger.credit(&alice, &tok("PVX"), Amount::new(u128::MAX / 4));
    ledger.credit(&alice, &tok("USDC"), Amount::new(u128::MAX / 4));

    let exchange = Exchange::new(
        InMemoryPoolStore::new(),
        ledger,
        ExchangeConfig::new(tok("PVX")),
    );
    let Ok(_) = exchange.add_liquidity(
        &alice,
        &AddLiquidityRequest {
            token_a: tok("PVX"),
            token_b: tok("USDC"),
            amount_a: Amount::new(reserve_pvx),
            amount_b: Amount::new(reserve_usdc),
            min_liquidity: Liquidity::ZERO,
            deadline: Utc::now() + Duration::minutes(5),
        },
    ) else {
        panic!("seeding the pool failed");
    };
    (exchange, alice)
}

fn reserve_product(exchange: &Exchange<InMemoryPoolStore, InMemoryLedger>) -> u128 {
    let Ok(pools) = exchange.list_pools() else {
        panic!("listing pools failed");
    };
    let Some(pool) = pools.first() else {
        panic!("expected a pool");
    };
    pool.reserve_a().get() * pool.reserve_b().get()
}

fn swap(
    exchange: &Exchange<InMemoryPoolStore, InMemoryLedger>,
    alice: &OwnerAddress,
    from: &str,
    to: &str,
    amount: u128,
) -> Option<u128> {
    exchange
        .execute_swap(
            alice,
            &SwapRequest {
                from_token: tok(from),
                to_token: tok(to),
                amount_in: Amount::new(amount),
                slippage_bps: None,
                deadline: Utc::now() + Duration::minutes(5),
            },
        )
        .ok()
        .map(|r| r.amount_out().get())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn product_never_decreases(
        reserve_a in 10_000u128..1_000_000_000,
        reserve_b in 10_000u128..1_000_000_000,
        amounts in prop::collection::vec(1u128..100_000, 1..12),
        directions in prop::collection::vec(any::<bool>(), 12),
    ) {
        let (exchange, alice) = engine_with_pool(reserve_a, reserve_b);
        let mut product = reserve_product(&exchange);

        for (amount, forward) in amounts.iter().zip(directions.iter()) {
            let (from, to) = if *forward { ("PVX", "USDC") } else { ("USDC", "PVX") };
            // Undersized trades legitimately fail; the invariant only
            // concerns committed swaps.
            if swap(&exchange, &alice, from, to, *amount).is_some() {
                let next = reserve_product(&exchange);
                prop_assert!(next >= product, "product shrank: {next} < {product}");
                product = next;
            }
        }
    }

    #[test]
    fn round_trip_loses_value(
        reserve in 1_000_000u128..1_000_000_000,
        amount in 1_000u128..100_000,
    ) {
        let (exchange, alice) = engine_with_pool(reserve, reserve);
        let Some(mid) = swap(&exchange, &alice, "PVX", "USDC", amount) else {
            return Ok(());
        };
        let Some(back) = swap(&exchange, &alice, "USDC", "PVX", mid) else {
            return Ok(());
        };
        prop_assert!(back < amount, "round trip returned {back} of {amount}");
    }

    #[test]
    fn liquidity_round_trip_is_exact_within_rounding(
        amount_a in 1_000u128..1_000_000_000,
        amount_b in 1_000u128..1_000_000_000,
    ) {
        let ledger = InMemoryLedger::new();
        let alice = owner("alice");
        ledger.credit(&alice, &tok("PVX"), Amount::new(u128::MAX / 4));
        ledger.credit(&alice, &tok("USDC"), Amount::new(u128::MAX / 4));
        let exchange = Exchange::new(
            InMemoryPoolStore::new(),
            ledger,
            ExchangeConfig::new(tok("PVX")),
        );

        let deadline = Utc::now() + Duration::minutes(5);
        let Ok(minted) = exchange.add_liquidity(&alice, &AddLiquidityRequest {
            token_a: tok("PVX"),
            token_b: tok("USDC"),
            amount_a: Amount::new(amount_a),
            amount_b: Amount::new(amount_b),
            min_liquidity: Liquidity::ZERO,
            deadline,
        }) else {
            return Ok(());
        };

        let Ok(removed) = exchange.remove_liquidity(&alice, &RemoveLiquidityRequest {
            pool_id: minted.pool_id(),
            liquidity: minted.liquidity_delta(),
            min_amount_a: Amount::ZERO,
            min_amount_b: Amount::ZERO,
            deadline,
        }) else {
            panic!("removing the full claim failed");
        };

        // Full burn of the only claim returns the reserves exactly.
        prop_assert_eq!(removed.amount_a(), minted.amount_a());
        prop_assert_eq!(removed.amount_b(), minted.amount_b());
    }

    #[test]
    fn positions_sum_to_total_liquidity(
        deposits in prop::collection::vec((1_000u128..1_000_000, 0usize..3), 1..8),
    ) {
        let ledger = InMemoryLedger::new();
        let owners = [owner("alice"), owner("bob"), owner("carol")];
        for o in &owners {
            ledger.credit(o, &tok("PVX"), Amount::new(u128::MAX / 4));
            ledger.credit(o, &tok("USDC"), Amount::new(u128::MAX / 4));
        }
        let exchange = Exchange::new(
            InMemoryPoolStore::new(),
            ledger,
            ExchangeConfig::new(tok("PVX")),
        );

        let deadline = Utc::now() + Duration::minutes(5);
        for (amount, who) in deposits {
            // Equal amounts keep every deposit on the 1:1 pool ratio.
            let _ = exchange.add_liquidity(&owners[who], &AddLiquidityRequest {
                token_a: tok("PVX"),
                token_b: tok("USDC"),
                amount_a: Amount::new(amount),
                amount_b: Amount::new(amount),
                min_liquidity: Liquidity::ZERO,
                deadline,
            });
        }

        let Ok(pools) = exchange.list_pools() else {
            panic!("listing pools failed");
        };
        let Some(pool) = pools.first() else {
            return Ok(());
        };
        let Ok(positions) = exchange.store().positions_in_pool(&pool.id()) else {
            panic!("listing positions failed");
        };
        let held: u128 = positions.iter().map(|p| p.liquidity_tokens().get()).sum();
        prop_assert_eq!(held, pool.total_liquidity().get());
    }

    #[test]
    fn quote_floor_never_exceeds_expectation(
        reserve_a in 10_000u128..1_000_000_000,
        reserve_b in 10_000u128..1_000_000_000,
        amount in 100u128..1_000_000,
    ) {
        let (exchange, _) = engine_with_pool(reserve_a, reserve_b);
        let Ok(quote) = exchange.quote(&tok("PVX"), &tok("USDC"), Amount::new(amount)) else {
            return Ok(());
        };
        prop_assert!(quote.min_out <= quote.expected_out);
        prop_assert!(quote.fee < quote.amount_in);
    }
}
