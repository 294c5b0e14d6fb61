//! Integration test: full deposit, yield, sponsor and redeem loop.
//!
//! Exercises the yield source end to end with several accounts:
//! 1. Initialize a yield source over a simulated vault
//! 2. Two depositors supply at the bootstrap rate
//! 3. The vault earns yield and the share price doubles
//! 4. A sponsor adds tokens without receiving shares
//! 5. Depositors redeem at the new exchange rate
//! 6. Shares move between holders and are redeemed by the recipient
//!
//! Every amount is checked against hand-computed values.

use ethereum_types::{Address, U256};
use ysrc_shares::ShareError;
use ysrc_source::{SourceError, YieldSource, YieldSourceConfig, YieldSourceEvent};
use ysrc_vault::{DepositToken, SimulatedVault, TokenLedger, YieldVault};

const OWNER: u64 = 1;
const ALICE: u64 = 2;
const BOB: u64 = 3;
const CAROL: u64 = 4;
const DAVE: u64 = 5;
const TOKEN: u64 = 100;
const VAULT: u64 = 200;
const SOURCE: u64 = 300;

type Source = YieldSource<SimulatedVault, TokenLedger>;

fn addr(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

/// Whole DAI in wei.
fn dai(n: u64) -> U256 {
    U256::from(n) * U256::exp10(18)
}

/// Fractional DAI in wei: `tenths / 10` DAI.
fn dai_tenths(tenths: u64) -> U256 {
    U256::from(tenths) * U256::exp10(17)
}

fn deploy() -> Source {
    let mut token = TokenLedger::new(addr(TOKEN), "DAI", 18);
    for holder in [ALICE, BOB, CAROL] {
        token.mint(addr(holder), dai(1_000)).expect("mint");
        token
            .approve(addr(holder), addr(SOURCE), U256::MAX)
            .expect("approve");
    }
    let vault = SimulatedVault::new(addr(VAULT), &token);
    YieldSource::initialize(
        addr(SOURCE),
        YieldSourceConfig::default(),
        vault,
        token,
        addr(OWNER),
    )
    .expect("initialize")
}

#[test]
fn full_loop_deposit_yield_sponsor_redeem() {
    let mut source = deploy();

    // =========================================================
    // Step 1: Bootstrap deposits mint shares 1:1
    // =========================================================
    let alice_shares = source
        .supply_token_to(addr(ALICE), dai(100), addr(ALICE))
        .expect("alice supplies");
    let bob_shares = source
        .supply_token_to(addr(BOB), dai(300), addr(BOB))
        .expect("bob supplies");
    assert_eq!(alice_shares, dai(100));
    assert_eq!(bob_shares, dai(300));
    assert_eq!(source.total_supply(), dai(400));
    assert_eq!(source.balance_of_y_shares(), dai(400));
    assert_eq!(source.token().balance_of(addr(SOURCE)), U256::zero());

    // =========================================================
    // Step 2: Vault earns 400 DAI, price per share doubles
    // =========================================================
    source.token_mut().mint(addr(VAULT), dai(400)).expect("yield");
    assert_eq!(source.price_per_y_share().expect("pps"), dai(2));
    assert_eq!(source.total_assets_in_token().expect("assets"), dai(800));
    assert_eq!(source.balance_of_token(addr(ALICE)).expect("alice"), dai(200));
    assert_eq!(source.balance_of_token(addr(BOB)).expect("bob"), dai(600));

    // =========================================================
    // Step 3: Carol sponsors 200 DAI, no shares minted
    // =========================================================
    source.sponsor(addr(CAROL), dai(200)).expect("sponsor");
    assert_eq!(source.total_supply(), dai(400));
    assert_eq!(source.balance_of(addr(CAROL)), U256::zero());
    assert_eq!(source.balance_of_y_shares(), dai(500));
    assert_eq!(source.total_assets_in_token().expect("assets"), dai(1_000));
    assert_eq!(source.balance_of_token(addr(ALICE)).expect("alice"), dai(250));
    assert_eq!(source.balance_of_token(addr(BOB)).expect("bob"), dai(750));

    // =========================================================
    // Step 4: Alice redeems her whole position
    // =========================================================
    let withdrawn = source.redeem_token(addr(ALICE), dai(250)).expect("redeem");
    assert_eq!(withdrawn, dai(250));
    assert_eq!(source.balance_of(addr(ALICE)), U256::zero());
    assert_eq!(source.token().balance_of(addr(ALICE)), dai(1_150));
    assert_eq!(source.total_supply(), dai(300));
    assert_eq!(source.balance_of_y_shares(), dai(375));

    // =========================================================
    // Step 5: Bob hands half his shares to Dave, who redeems them
    // =========================================================
    source
        .transfer(addr(BOB), addr(DAVE), dai(150))
        .expect("transfer shares");
    assert_eq!(source.balance_of_token(addr(DAVE)).expect("dave"), dai(375));

    let withdrawn = source.redeem_token(addr(DAVE), dai(375)).expect("redeem");
    assert_eq!(withdrawn, dai(375));
    assert_eq!(source.token().balance_of(addr(DAVE)), dai(375));
    assert_eq!(source.balance_of(addr(DAVE)), U256::zero());
    assert_eq!(source.balance_of_token(addr(BOB)).expect("bob"), dai(375));
    assert_eq!(source.balance_of_y_shares(), dai_tenths(1_875));

    // =========================================================
    // Step 6: Event log records every state transition in order
    // =========================================================
    let names: Vec<&str> = source.events().iter().map(YieldSourceEvent::name).collect();
    assert_eq!(
        names,
        vec![
            "ownership_transferred",
            "initialized",
            "supplied_token_to",
            "supplied_token_to",
            "sponsored",
            "redeemed_token",
            "redeemed_token",
        ]
    );

    let json = source.events()[4].to_json().expect("json");
    assert_eq!(json["event_type"], "sponsored");
    assert_eq!(
        serde_json::from_value::<YieldSourceEvent>(json).expect("decode"),
        YieldSourceEvent::Sponsored {
            from: addr(CAROL),
            amount: dai(200),
        }
    );
}

#[test]
fn late_depositor_pays_current_price() {
    let mut source = deploy();
    source
        .supply_token_to(addr(ALICE), dai(100), addr(ALICE))
        .expect("alice supplies");
    source.token_mut().mint(addr(VAULT), dai(100)).expect("yield");

    // 100 shares against 200 DAI: 100 DAI buys 50 shares
    let shares = source
        .supply_token_to(addr(BOB), dai(100), addr(BOB))
        .expect("bob supplies");
    assert_eq!(shares, dai(50));
    assert_eq!(source.balance_of_token(addr(ALICE)).expect("alice"), dai(200));
    assert_eq!(source.balance_of_token(addr(BOB)).expect("bob"), dai(100));
}

#[test]
fn redeem_respects_max_losses() {
    let mut source = deploy();
    source
        .supply_token_to(addr(ALICE), dai(100), addr(ALICE))
        .expect("supply");
    source.take_events();
    source
        .vault_mut()
        .set_withdrawal_loss_bps(50)
        .expect("loss");

    // Default tolerance of 1 bp refuses a 50 bp loss and nothing moves
    assert!(source.redeem_token(addr(ALICE), dai(10)).is_err());
    assert_eq!(source.balance_of(addr(ALICE)), dai(100));
    assert_eq!(source.token().balance_of(addr(ALICE)), dai(900));
    assert!(source.events().is_empty());

    // Only the owner may raise the tolerance
    assert!(source.set_max_losses(addr(ALICE), 100).is_err());
    source.set_max_losses(addr(OWNER), 100).expect("set");

    let withdrawn = source.redeem_token(addr(ALICE), dai(10)).expect("redeem");
    assert_eq!(withdrawn, dai_tenths(995) / 10);
    assert_eq!(source.balance_of(addr(ALICE)), dai(90));
    assert_eq!(source.token().balance_of(Address::zero()), dai_tenths(5) / 10);
}

#[test]
fn deposit_limit_keeps_excess_idle() {
    let mut token = TokenLedger::new(addr(TOKEN), "DAI", 18);
    token.mint(addr(ALICE), dai(1_000)).expect("mint");
    token
        .approve(addr(ALICE), addr(SOURCE), U256::MAX)
        .expect("approve");
    let params = ysrc_vault::simulated::VaultParams {
        deposit_limit: Some(150),
        ..Default::default()
    };
    let vault = SimulatedVault::with_params(addr(VAULT), &token, &params).expect("vault");
    let mut source = YieldSource::initialize(
        addr(SOURCE),
        YieldSourceConfig::default(),
        vault,
        token,
        addr(OWNER),
    )
    .expect("initialize");

    source
        .supply_token_to(addr(ALICE), dai(200), addr(ALICE))
        .expect("supply");
    assert_eq!(source.vault().total_assets(source.token()), dai(150));
    assert_eq!(source.token().balance_of(addr(SOURCE)), dai(50));
    assert_eq!(source.balance_of_token(addr(ALICE)).expect("alice"), dai(200));

    // Idle tokens still count toward the exchange rate
    let shares = source
        .supply_token_to(addr(ALICE), dai(100), addr(ALICE))
        .expect("supply");
    assert_eq!(shares, dai(100));
    assert_eq!(source.token().balance_of(addr(SOURCE)), dai(150));
}

#[test]
fn ownership_handover_and_renounce() {
    let mut source = deploy();
    source
        .transfer_ownership(addr(OWNER), addr(CAROL))
        .expect("transfer");
    source.set_max_losses(addr(CAROL), 10).expect("carol is owner");
    source.renounce_ownership(addr(CAROL)).expect("renounce");

    assert!(source.owner().is_zero());
    assert!(source.set_max_losses(addr(CAROL), 20).is_err());
    assert_eq!(source.max_losses(), 10);
}

#[test]
fn drained_pool_refuses_new_deposits() {
    let mut source = deploy();
    source
        .supply_token_to(addr(ALICE), dai(100), addr(ALICE))
        .expect("supply");

    // Strategy wipes out the vault: shares exist against nothing
    source
        .token_mut()
        .transfer(addr(VAULT), addr(9), dai(100))
        .expect("drain");
    assert_eq!(source.total_assets_in_token().expect("assets"), U256::zero());
    assert_eq!(source.balance_of_token(addr(ALICE)).expect("alice"), U256::zero());

    let err = source
        .supply_token_to(addr(BOB), dai(50), addr(BOB))
        .expect_err("drained");
    assert!(matches!(
        err,
        SourceError::Shares(ShareError::DivisionByZero(_))
    ));
    assert_eq!(source.token().balance_of(addr(BOB)), dai(1_000));
    assert_eq!(source.total_supply(), dai(100));
}

#[test]
fn sponsored_pool_pays_non_holders_nothing() {
    let mut source = deploy();
    source
        .supply_token_to(addr(ALICE), U256::from(100), addr(ALICE))
        .expect("supply");
    source.sponsor(addr(CAROL), U256::from(900)).expect("sponsor");

    for _ in 0..10 {
        assert!(matches!(
            source.redeem_token(addr(DAVE), U256::from(9)),
            Err(SourceError::BurnExceedsBalance { .. })
        ));
    }
    assert_eq!(source.token().balance_of(addr(DAVE)), U256::zero());
    assert_eq!(
        source.balance_of_token(addr(ALICE)).expect("alice"),
        U256::from(1_000)
    );
}
