//! End-to-end tests exercising the public engine API: pool bootstrap,
//! swap pricing and execution, two-hop routing, liquidity round trips,
//! failure taxonomy, concurrency, and the statistics rollup.

#![allow(clippy::panic)]

use chrono::{Duration, Utc};

use amm_exchange::config::ExchangeConfig;
use amm_exchange::domain::{Amount, BasisPoints, Liquidity, TokenId};
use amm_exchange::engine::{
    AddLiquidityRequest, Exchange, RemoveLiquidityRequest, SwapPath, SwapRequest,
};
use amm_exchange::error::ExchangeError;
use amm_exchange::memory::{InMemoryLedger, InMemoryPoolStore};
use amm_exchange::pool::OwnerAddress;
use amm_exchange::store::PoolStore;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

type TestExchange = Exchange<InMemoryPoolStore, InMemoryLedger>;

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

fn soon() -> chrono::DateTime<Utc> {
    Utc::now() + Duration::minutes(5)
}

fn expired() -> chrono::DateTime<Utc> {
    Utc::now() - Duration::seconds(1)
}

/// Engine whose ledger credits `owners` generously in every listed token.
fn exchange_with_funds(owners: &[&str], tokens: &[&str]) -> TestExchange {
    let ledger = InMemoryLedger::new();
    for o in owners {
        for t in tokens {
            ledger.credit(&owner(o), &tok(t), Amount::new(u128::MAX / 4));
        }
    }
    Exchange::new(
        InMemoryPoolStore::new(),
        ledger,
        ExchangeConfig::new(tok("PVX")),
    )
}

fn add_liquidity(
    exchange: &TestExchange,
    who: &str,
    token_a: &str,
    amount_a: u128,
    token_b: &str,
    amount_b: u128,
) -> amm_exchange::receipt::LiquidityReceipt {
    let Ok(receipt) = exchange.add_liquidity(
        &owner(who),
        &AddLiquidityRequest {
            token_a: tok(token_a),
            token_b: tok(token_b),
            amount_a: Amount::new(amount_a),
            amount_b: Amount::new(amount_b),
            min_liquidity: Liquidity::ZERO,
            deadline: soon(),
        },
    ) else {
        panic!("seeding {token_a}/{token_b} failed");
    };
    receipt
}

fn swap_request(from: &str, to: &str, amount: u128) -> SwapRequest {
    SwapRequest {
        from_token: tok(from),
        to_token: tok(to),
        amount_in: Amount::new(amount),
        slippage_bps: None,
        deadline: soon(),
    }
}

fn balance(exchange: &TestExchange, who: &str, token: &str) -> u128 {
    use amm_exchange::store::LedgerStore;
    let Ok(b) = exchange.ledger().balance(&owner(who), &tok(token)) else {
        panic!("balance lookup failed");
    };
    b.get()
}

// ---------------------------------------------------------------------------
// Pool bootstrap (Scenario A) and full withdrawal (Scenario B)
// ---------------------------------------------------------------------------

#[test]
fn bootstrap_mints_geometric_mean() {
    let exchange = exchange_with_funds(&["alice"], &["PVX", "USDC"]);
    let receipt = add_liquidity(&exchange, "alice", "PVX", 100, "USDC", 400);

    // √(100 × 400) = 200
    assert_eq!(receipt.liquidity_delta(), Liquidity::new(200));

    let Ok(pools) = exchange.list_pools() else {
        panic!("expected Ok");
    };
    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0].reserve_a(), Amount::new(100));
    assert_eq!(pools[0].reserve_b(), Amount::new(400));
    assert_eq!(pools[0].total_liquidity(), Liquidity::new(200));
}

#[test]
fn full_withdrawal_drains_pool_and_deletes_position() {
    let exchange = exchange_with_funds(&["alice"], &["PVX", "USDC"]);
    let minted = add_liquidity(&exchange, "alice", "PVX", 100, "USDC", 400);

    let Ok(removed) = exchange.remove_liquidity(
        &owner("alice"),
        &RemoveLiquidityRequest {
            pool_id: minted.pool_id(),
            liquidity: Liquidity::new(200),
            min_amount_a: Amount::ZERO,
            min_amount_b: Amount::ZERO,
            deadline: soon(),
        },
    ) else {
        panic!("expected Ok");
    };

    assert_eq!(removed.amount_a(), Amount::new(100));
    assert_eq!(removed.amount_b(), Amount::new(400));

    // The pool stays registered, drained and inert; the position is gone.
    let Ok(pools) = exchange.list_pools() else {
        panic!("expected Ok");
    };
    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0].reserve_a(), Amount::ZERO);
    assert_eq!(pools[0].reserve_b(), Amount::ZERO);
    assert!(pools[0].total_liquidity().is_zero());

    let Ok(positions) = exchange.positions(&owner("alice")) else {
        panic!("expected Ok");
    };
    assert!(positions.is_empty());
}

#[test]
fn liquidity_round_trip_returns_balances() {
    let exchange = exchange_with_funds(&["alice"], &["PVX", "USDC"]);
    let pvx_before = balance(&exchange, "alice", "PVX");
    let usdc_before = balance(&exchange, "alice", "USDC");

    let minted = add_liquidity(&exchange, "alice", "PVX", 123_456, "USDC", 654_321);
    let Ok(_) = exchange.remove_liquidity(
        &owner("alice"),
        &RemoveLiquidityRequest {
            pool_id: minted.pool_id(),
            liquidity: minted.liquidity_delta(),
            min_amount_a: Amount::ZERO,
            min_amount_b: Amount::ZERO,
            deadline: soon(),
        },
    ) else {
        panic!("expected Ok");
    };

    assert_eq!(balance(&exchange, "alice", "PVX"), pvx_before);
    assert_eq!(balance(&exchange, "alice", "USDC"), usdc_before);
}

// ---------------------------------------------------------------------------
// Quoting (Scenario C) and routing failures (Scenario E)
// ---------------------------------------------------------------------------

#[test]
fn quote_reference_pricing() {
    let exchange = exchange_with_funds(&["lp"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "lp", "PVX", 250_000_000_000, "USDC", 750_000_000);

    let Ok(quote) = exchange.quote(&tok("PVX"), &tok("USDC"), Amount::new(1_000_000)) else {
        panic!("expected Ok");
    };

    // fee = 3_000; net = 997_000
    // out = 997_000 × 750e6 / (250e9 + 997_000) = 2_990
    // min_out = 2_990 × 9_950 / 10_000 = 2_975
    assert_eq!(quote.fee, Amount::new(3_000));
    assert_eq!(quote.expected_out, Amount::new(2_990));
    assert_eq!(quote.min_out, Amount::new(2_975));
    assert_eq!(
        quote.path,
        SwapPath::Direct {
            from: tok("PVX"),
            to: tok("USDC"),
        }
    );
}

#[test]
fn quote_without_any_path_is_no_route() {
    let exchange = exchange_with_funds(&["lp"], &["PVX", "ETH", "USDC"]);
    // Only an ETH/PVX pool: USDC is unreachable on the second leg.
    add_liquidity(&exchange, "lp", "ETH", 1_000_000, "PVX", 4_000_000);

    let r = exchange.quote(&tok("ETH"), &tok("USDC"), Amount::new(1_000));
    assert_eq!(r, Err(ExchangeError::NoRouteFound));
}

#[test]
fn quote_zero_amount_rejected() {
    let exchange = exchange_with_funds(&["lp"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "lp", "PVX", 1_000_000, "USDC", 1_000_000);
    let r = exchange.quote(&tok("PVX"), &tok("USDC"), Amount::ZERO);
    assert!(matches!(r, Err(ExchangeError::InvalidInput(_))));
}

#[test]
fn quote_same_token_rejected() {
    let exchange = exchange_with_funds(&[], &[]);
    let r = exchange.quote(&tok("PVX"), &tok("PVX"), Amount::new(10));
    assert!(matches!(r, Err(ExchangeError::InvalidInput(_))));
}

#[test]
fn two_hop_quote_routes_through_base() {
    let exchange = exchange_with_funds(&["lp"], &["PVX", "ETH", "USDC"]);
    add_liquidity(&exchange, "lp", "ETH", 1_000_000, "PVX", 4_000_000);
    add_liquidity(&exchange, "lp", "PVX", 4_000_000, "USDC", 1_000_000);

    let Ok(quote) = exchange.quote(&tok("ETH"), &tok("USDC"), Amount::new(10_000)) else {
        panic!("expected Ok");
    };
    assert_eq!(
        quote.path.tokens(),
        vec![tok("ETH"), tok("PVX"), tok("USDC")]
    );
    assert_eq!(quote.legs.len(), 2);
    assert_eq!(quote.legs[0].amount_out, quote.legs[1].amount_in);
}

// ---------------------------------------------------------------------------
// Swap execution
// ---------------------------------------------------------------------------

#[test]
fn swap_moves_balances_and_reserves() {
    let exchange = exchange_with_funds(&["lp", "alice"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "lp", "PVX", 1_000_000, "USDC", 1_000_000);

    let pvx_before = balance(&exchange, "alice", "PVX");
    let usdc_before = balance(&exchange, "alice", "USDC");

    let Ok(receipt) = exchange.execute_swap(&owner("alice"), &swap_request("PVX", "USDC", 10_000))
    else {
        panic!("expected Ok");
    };

    assert_eq!(receipt.amount_in(), Amount::new(10_000));
    assert!(receipt.amount_out().get() > 0);
    assert_eq!(receipt.fee(), Amount::new(30));
    assert_eq!(
        balance(&exchange, "alice", "PVX"),
        pvx_before - 10_000,
    );
    assert_eq!(
        balance(&exchange, "alice", "USDC"),
        usdc_before + receipt.amount_out().get(),
    );

    let Ok(pools) = exchange.list_pools() else {
        panic!("expected Ok");
    };
    assert_eq!(pools[0].reserve_a(), Amount::new(1_010_000));
    assert_eq!(
        pools[0].reserve_b().get(),
        1_000_000 - receipt.amount_out().get(),
    );
}

#[test]
fn swap_price_is_worse_than_spot() {
    let exchange = exchange_with_funds(&["lp", "alice"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "lp", "PVX", 1_000_000, "USDC", 1_000_000);

    let Ok(receipt) = exchange.execute_swap(&owner("alice"), &swap_request("PVX", "USDC", 1_000))
    else {
        panic!("expected Ok");
    };

    // Spot is 1:1; with a 30bp fee the payout must trail the input by at
    // least the fee.
    assert!(receipt.amount_out() <= Amount::new(997));
    assert!(receipt.amount_out().get() > 0);
}

#[test]
fn round_trip_costs_roughly_twice_the_fee() {
    let exchange = exchange_with_funds(&["lp", "alice"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "lp", "PVX", 100_000_000, "USDC", 100_000_000);

    let Ok(out) = exchange.execute_swap(&owner("alice"), &swap_request("PVX", "USDC", 10_000))
    else {
        panic!("expected Ok");
    };
    let Ok(back) = exchange.execute_swap(
        &owner("alice"),
        &swap_request("USDC", "PVX", out.amount_out().get()),
    ) else {
        panic!("expected Ok");
    };

    let returned = back.amount_out().get();
    assert!(returned < 10_000);
    // Loss ≈ 2 × 30bp of 10_000 = 60, plus impact and rounding.
    let loss = 10_000 - returned;
    assert!((50..=75).contains(&loss), "unexpected round-trip loss {loss}");
}

#[test]
fn two_hop_swap_executes_atomically() {
    let exchange = exchange_with_funds(&["lp", "alice"], &["PVX", "ETH", "USDC"]);
    add_liquidity(&exchange, "lp", "ETH", 1_000_000, "PVX", 4_000_000);
    add_liquidity(&exchange, "lp", "PVX", 4_000_000, "USDC", 1_000_000);

    let eth_before = balance(&exchange, "alice", "ETH");
    let usdc_before = balance(&exchange, "alice", "USDC");
    let pvx_before = balance(&exchange, "alice", "PVX");

    let Ok(receipt) = exchange.execute_swap(&owner("alice"), &swap_request("ETH", "USDC", 10_000))
    else {
        panic!("expected Ok");
    };

    assert_eq!(receipt.path().len(), 3);
    assert_eq!(balance(&exchange, "alice", "ETH"), eth_before - 10_000);
    assert_eq!(
        balance(&exchange, "alice", "USDC"),
        usdc_before + receipt.amount_out().get(),
    );
    // The intermediate base amount never touches the wallet.
    assert_eq!(balance(&exchange, "alice", "PVX"), pvx_before);

    // Both pools moved.
    let Ok(pools) = exchange.list_pools() else {
        panic!("expected Ok");
    };
    for pool in pools {
        if pool.pair().contains(&tok("ETH")) {
            assert!(pool.reserve_of(&tok("ETH")).is_ok_and(|r| r > Amount::new(1_000_000)));
        } else {
            assert!(pool.reserve_of(&tok("USDC")).is_ok_and(|r| r < Amount::new(1_000_000)));
        }
    }
}

#[test]
fn swap_rejects_expired_deadline() {
    let exchange = exchange_with_funds(&["lp", "alice"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "lp", "PVX", 1_000_000, "USDC", 1_000_000);

    let mut request = swap_request("PVX", "USDC", 1_000);
    request.deadline = expired();
    let r = exchange.execute_swap(&owner("alice"), &request);
    assert_eq!(r, Err(ExchangeError::DeadlineExceeded));
}

#[test]
fn swap_rejects_insufficient_balance() {
    let exchange = exchange_with_funds(&["lp"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "lp", "PVX", 1_000_000, "USDC", 1_000_000);

    // "poor" holds nothing.
    let r = exchange.execute_swap(&owner("poor"), &swap_request("PVX", "USDC", 1_000));
    assert_eq!(r, Err(ExchangeError::InsufficientBalance));
}

#[test]
fn swap_rejects_unroutable_pair() {
    let exchange = exchange_with_funds(&["alice"], &["PVX", "ETH", "USDC"]);
    let r = exchange.execute_swap(&owner("alice"), &swap_request("ETH", "USDC", 1_000));
    assert_eq!(r, Err(ExchangeError::NoRouteFound));
}

#[test]
fn swap_accepts_custom_slippage() {
    let exchange = exchange_with_funds(&["lp", "alice"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "lp", "PVX", 1_000_000, "USDC", 1_000_000);

    let mut request = swap_request("PVX", "USDC", 1_000);
    request.slippage_bps = Some(BasisPoints::new(200));
    let Ok(receipt) = exchange.execute_swap(&owner("alice"), &request) else {
        panic!("expected Ok");
    };
    assert!(receipt.amount_out().get() > 0);
}

// ---------------------------------------------------------------------------
// Liquidity failure taxonomy (Scenario D among them)
// ---------------------------------------------------------------------------

#[test]
fn disproportionate_deposit_rejected() {
    let exchange = exchange_with_funds(&["lp", "alice"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "lp", "PVX", 1_000, "USDC", 4_000);

    // Pool ratio 1:4; 100:300 is 1:3 and misses the ±1% band.
    let r = exchange.add_liquidity(
        &owner("alice"),
        &AddLiquidityRequest {
            token_a: tok("PVX"),
            token_b: tok("USDC"),
            amount_a: Amount::new(100),
            amount_b: Amount::new(300),
            min_liquidity: Liquidity::ZERO,
            deadline: soon(),
        },
    );
    assert_eq!(r, Err(ExchangeError::RatioMismatch));
}

#[test]
fn deposit_below_min_liquidity_rejected() {
    let exchange = exchange_with_funds(&["lp", "alice"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "lp", "PVX", 1_000_000, "USDC", 1_000_000);

    let r = exchange.add_liquidity(
        &owner("alice"),
        &AddLiquidityRequest {
            token_a: tok("PVX"),
            token_b: tok("USDC"),
            amount_a: Amount::new(10_000),
            amount_b: Amount::new(10_000),
            // Proportional mint would be 10_000.
            min_liquidity: Liquidity::new(10_001),
            deadline: soon(),
        },
    );
    assert_eq!(r, Err(ExchangeError::InsufficientLiquidityMinted));
}

#[test]
fn deposit_with_expired_deadline_rejected() {
    let exchange = exchange_with_funds(&["alice"], &["PVX", "USDC"]);
    let r = exchange.add_liquidity(
        &owner("alice"),
        &AddLiquidityRequest {
            token_a: tok("PVX"),
            token_b: tok("USDC"),
            amount_a: Amount::new(100),
            amount_b: Amount::new(400),
            min_liquidity: Liquidity::ZERO,
            deadline: expired(),
        },
    );
    assert_eq!(r, Err(ExchangeError::DeadlineExceeded));
}

#[test]
fn deposit_without_funds_rejected() {
    let exchange = exchange_with_funds(&[], &[]);
    let r = exchange.add_liquidity(
        &owner("poor"),
        &AddLiquidityRequest {
            token_a: tok("PVX"),
            token_b: tok("USDC"),
            amount_a: Amount::new(100),
            amount_b: Amount::new(400),
            min_liquidity: Liquidity::ZERO,
            deadline: soon(),
        },
    );
    assert_eq!(r, Err(ExchangeError::InsufficientBalance));
}

#[test]
fn withdrawal_floors_enforced() {
    let exchange = exchange_with_funds(&["alice"], &["PVX", "USDC"]);
    let minted = add_liquidity(&exchange, "alice", "PVX", 100, "USDC", 400);

    let r = exchange.remove_liquidity(
        &owner("alice"),
        &RemoveLiquidityRequest {
            pool_id: minted.pool_id(),
            liquidity: Liquidity::new(100),
            // Half the claim pays out (50, 200); demand more.
            min_amount_a: Amount::new(51),
            min_amount_b: Amount::ZERO,
            deadline: soon(),
        },
    );
    assert_eq!(r, Err(ExchangeError::SlippageExceeded));
}

#[test]
fn withdrawal_from_unknown_pool_rejected() {
    let exchange = exchange_with_funds(&["alice"], &["PVX", "USDC"]);
    let Ok(pair) = amm_exchange::domain::TokenPair::new(tok("PVX"), tok("WBTC")) else {
        panic!("valid pair");
    };
    let r = exchange.remove_liquidity(
        &owner("alice"),
        &RemoveLiquidityRequest {
            pool_id: amm_exchange::pool::PoolId::derive(&pair),
            liquidity: Liquidity::new(1),
            min_amount_a: Amount::ZERO,
            min_amount_b: Amount::ZERO,
            deadline: soon(),
        },
    );
    assert_eq!(r, Err(ExchangeError::PoolNotFound));
}

#[test]
fn withdrawal_without_position_rejected() {
    let exchange = exchange_with_funds(&["alice", "bob"], &["PVX", "USDC"]);
    let minted = add_liquidity(&exchange, "alice", "PVX", 100, "USDC", 400);

    let r = exchange.remove_liquidity(
        &owner("bob"),
        &RemoveLiquidityRequest {
            pool_id: minted.pool_id(),
            liquidity: Liquidity::new(1),
            min_amount_a: Amount::ZERO,
            min_amount_b: Amount::ZERO,
            deadline: soon(),
        },
    );
    assert_eq!(r, Err(ExchangeError::PositionNotFound));
}

#[test]
fn over_withdrawal_rejected() {
    let exchange = exchange_with_funds(&["alice"], &["PVX", "USDC"]);
    let minted = add_liquidity(&exchange, "alice", "PVX", 100, "USDC", 400);

    let r = exchange.remove_liquidity(
        &owner("alice"),
        &RemoveLiquidityRequest {
            pool_id: minted.pool_id(),
            liquidity: Liquidity::new(201),
            min_amount_a: Amount::ZERO,
            min_amount_b: Amount::ZERO,
            deadline: soon(),
        },
    );
    assert_eq!(r, Err(ExchangeError::InsufficientLiquidityHeld));
}

// ---------------------------------------------------------------------------
// Registry semantics
// ---------------------------------------------------------------------------

#[test]
fn one_pool_per_unordered_pair() {
    let exchange = exchange_with_funds(&["alice", "bob"], &["PVX", "USDC"]);
    let first = add_liquidity(&exchange, "alice", "PVX", 1_000_000, "USDC", 1_000_000);
    // Reversed token order lands in the same pool.
    let second = add_liquidity(&exchange, "bob", "USDC", 500_000, "PVX", 500_000);

    assert_eq!(first.pool_id(), second.pool_id());
    let Ok(pools) = exchange.list_pools() else {
        panic!("expected Ok");
    };
    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0].reserve_a(), Amount::new(1_500_000));
}

#[test]
fn repeat_deposits_top_up_one_position() {
    let exchange = exchange_with_funds(&["alice"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "alice", "PVX", 1_000_000, "USDC", 1_000_000);
    add_liquidity(&exchange, "alice", "PVX", 500_000, "USDC", 500_000);

    let Ok(positions) = exchange.positions(&owner("alice")) else {
        panic!("expected Ok");
    };
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].liquidity_tokens(), Liquidity::new(1_500_000));
}

#[test]
fn positions_conserve_total_liquidity() {
    let exchange = exchange_with_funds(&["alice", "bob", "carol"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "alice", "PVX", 1_000_000, "USDC", 1_000_000);
    add_liquidity(&exchange, "bob", "PVX", 300_000, "USDC", 300_000);
    let carol = add_liquidity(&exchange, "carol", "PVX", 200_000, "USDC", 200_000);

    let Ok(_) = exchange.remove_liquidity(
        &owner("bob"),
        &RemoveLiquidityRequest {
            pool_id: carol.pool_id(),
            liquidity: Liquidity::new(123_456),
            min_amount_a: Amount::ZERO,
            min_amount_b: Amount::ZERO,
            deadline: soon(),
        },
    ) else {
        panic!("expected Ok");
    };

    let Ok(pools) = exchange.list_pools() else {
        panic!("expected Ok");
    };
    let Ok(positions) = exchange.store().positions_in_pool(&pools[0].id()) else {
        panic!("expected Ok");
    };
    let held: u128 = positions.iter().map(|p| p.liquidity_tokens().get()).sum();
    assert_eq!(held, pools[0].total_liquidity().get());
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_swaps_preserve_invariants() {
    let exchange = exchange_with_funds(&["lp", "alice"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "lp", "PVX", 10_000_000, "USDC", 10_000_000);

    let pvx_total = balance(&exchange, "alice", "PVX") + 10_000_000;
    let usdc_total = balance(&exchange, "alice", "USDC") + 10_000_000;
    let initial_product = 10_000_000u128 * 10_000_000u128;

    std::thread::scope(|scope| {
        for worker in 0..4u128 {
            let exchange = &exchange;
            scope.spawn(move || {
                for i in 0..25u128 {
                    let forward = (worker + i) % 2 == 0;
                    let (from, to) = if forward {
                        ("PVX", "USDC")
                    } else {
                        ("USDC", "PVX")
                    };
                    let _ = exchange
                        .execute_swap(&owner("alice"), &swap_request(from, to, 5_000 + i * 17));
                }
            });
        }
    });

    let Ok(pools) = exchange.list_pools() else {
        panic!("expected Ok");
    };
    let pool = &pools[0];

    // Serialized mutation keeps the product monotone.
    assert!(pool.reserve_a().get() * pool.reserve_b().get() >= initial_product);
    // Conservation: whatever left the wallet is in the pool, and vice
    // versa — no token is created or destroyed.
    assert_eq!(
        balance(&exchange, "alice", "PVX") + pool.reserve_a().get(),
        pvx_total,
    );
    assert_eq!(
        balance(&exchange, "alice", "USDC") + pool.reserve_b().get(),
        usdc_total,
    );
}

// ---------------------------------------------------------------------------
// Statistics rollup
// ---------------------------------------------------------------------------

#[test]
fn stats_reflect_pools_and_recent_swaps() {
    let exchange = exchange_with_funds(&["lp", "alice"], &["PVX", "ETH", "USDC"]);
    add_liquidity(&exchange, "lp", "PVX", 1_000_000, "USDC", 1_000_000);
    add_liquidity(&exchange, "lp", "ETH", 2_000_000, "PVX", 2_000_000);

    let Ok(swap) = exchange.execute_swap(&owner("alice"), &swap_request("PVX", "USDC", 50_000))
    else {
        panic!("expected Ok");
    };

    let Ok(stats) = exchange.stats() else {
        panic!("expected Ok");
    };
    assert_eq!(stats.pool_count, 2);
    // TVL: 2 × 1_050_000 (PVX/USDC, post-swap) + 2 × 2_000_000 (ETH/PVX).
    assert_eq!(stats.total_value_locked, Amount::new(6_100_000));
    // The swap sold 50_000 base units.
    assert_eq!(stats.volume_24h, Amount::new(50_000));
    assert_eq!(stats.fees_24h, swap.fee());
    assert!(stats.most_active_pool.is_some());
}

#[test]
fn stats_on_empty_engine_are_zero() {
    let exchange = exchange_with_funds(&[], &[]);
    let Ok(stats) = exchange.stats() else {
        panic!("expected Ok");
    };
    assert_eq!(stats.pool_count, 0);
    assert_eq!(stats.total_value_locked, Amount::ZERO);
    assert_eq!(stats.volume_24h, Amount::ZERO);
    assert!(stats.most_active_pool.is_none());
}

// ---------------------------------------------------------------------------
// Serialization boundary
// ---------------------------------------------------------------------------

#[test]
fn records_serialize_for_the_calling_layer() {
    let exchange = exchange_with_funds(&["alice"], &["PVX", "USDC"]);
    add_liquidity(&exchange, "alice", "PVX", 100, "USDC", 400);

    let Ok(pools) = exchange.list_pools() else {
        panic!("expected Ok");
    };
    let Ok(json) = serde_json::to_string(&pools[0]) else {
        panic!("pool should serialize");
    };
    let Ok(back) = serde_json::from_str::<amm_exchange::pool::LiquidityPool>(&json) else {
        panic!("pool should deserialize");
    };
    assert_eq!(back, pools[0]);

    let Ok(quote) = exchange.quote(&tok("PVX"), &tok("USDC"), Amount::new(10)) else {
        panic!("expected Ok");
    };
    assert!(serde_json::to_string(&quote).is_ok());
}
