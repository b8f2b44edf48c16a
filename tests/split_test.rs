//! Tests for the balance splitting policy

mod common;

use common::asset;
use rand::Rng;
use unregd::split::{split, SplitError, MIN_SPLIT_BALANCE};
use unregd::types::{Asset, Symbol};

fn eos(amount: i64) -> Asset {
    Asset::new(amount, Symbol::new(4, "EOS").unwrap())
}

#[test]
fn test_split_large_balance() {
    let parts = split(&asset("150.0000 EOS")).unwrap();

    assert_eq!(parts.liquid, asset("10.0000 EOS"));
    assert_eq!(parts.stake_cpu, asset("70.0000 EOS"));
    assert_eq!(parts.stake_net, asset("70.0000 EOS"));
}

#[test]
fn test_split_medium_balance() {
    let parts = split(&asset("5.0000 EOS")).unwrap();

    assert_eq!(parts.liquid, asset("2.0000 EOS"));
    assert_eq!(parts.stake_cpu, asset("1.5000 EOS"));
    assert_eq!(parts.stake_net, asset("1.5000 EOS"));
}

#[test]
fn test_split_reference_amounts() {
    let large = split(&eos(200_000)).unwrap();
    assert_eq!(
        (large.stake_net.amount, large.stake_cpu.amount, large.liquid.amount),
        (50_000, 50_000, 100_000)
    );

    let medium = split(&eos(50_000)).unwrap();
    assert_eq!(
        (medium.stake_net.amount, medium.stake_cpu.amount, medium.liquid.amount),
        (15_000, 15_000, 20_000)
    );

    let small = split(&eos(2_000)).unwrap();
    assert_eq!(
        (small.stake_net.amount, small.stake_cpu.amount, small.liquid.amount),
        (500, 500, 1_000)
    );

    assert_eq!(
        split(&eos(500)).unwrap_err(),
        SplitError::InsufficientBalance(eos(500))
    );
}

#[test]
fn test_split_small_balance_gives_net_the_odd_unit() {
    let parts = split(&eos(2001)).unwrap();

    assert_eq!(parts.liquid.amount, 1000);
    assert_eq!(parts.stake_cpu.amount, 500);
    assert_eq!(parts.stake_net.amount, 501);
}

#[test]
fn test_split_tier_boundaries() {
    // Exactly at a threshold falls into the lower tier
    assert_eq!(split(&eos(110_000)).unwrap().liquid.amount, 20_000);
    assert_eq!(split(&eos(110_001)).unwrap().liquid.amount, 100_000);
    assert_eq!(split(&eos(30_000)).unwrap().liquid.amount, 1_000);
    assert_eq!(split(&eos(30_001)).unwrap().liquid.amount, 20_000);
}

#[test]
fn test_split_minimum_balance_is_all_liquid() {
    let parts = split(&eos(MIN_SPLIT_BALANCE)).unwrap();

    assert_eq!(parts.liquid.amount, 1000);
    assert!(parts.stake_cpu.is_zero());
    assert!(parts.stake_net.is_zero());
}

#[test]
fn test_split_rejects_balance_below_minimum() {
    for amount in [999, 0, -5] {
        let err = split(&eos(amount)).unwrap_err();
        assert_eq!(err, SplitError::InsufficientBalance(eos(amount)));
    }
}

#[test]
fn test_split_keeps_symbol() {
    let parts = split(&asset("12.345678 WAX")).unwrap();

    for part in [&parts.liquid, &parts.stake_cpu, &parts.stake_net] {
        assert_eq!(part.symbol.code(), "WAX");
        assert_eq!(part.symbol.precision(), 6);
    }
}

#[test]
fn test_split_parts_always_add_up() {
    let mut rng = rand::thread_rng();

    for _ in 0..2_000 {
        let amount = rng.gen_range(MIN_SPLIT_BALANCE..=i64::MAX / 2);
        let parts = split(&eos(amount)).unwrap();

        assert_eq!(parts.total(), Some(amount), "split of {} does not add up", amount);
        assert!(parts.stake_net.amount >= parts.stake_cpu.amount);
        assert!(parts.stake_net.amount - parts.stake_cpu.amount <= 1);
        assert!(parts.stake_cpu.amount >= 0);
    }
}
