//! Cache window specs
//!
//! Verify count and age windows bound what a cache retains.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn count_window_keeps_last_n_oldest_first() {
    for extra in [0, 1, 7] {
        let (cache, _) = cache("3");
        for id in 0..(3 + extra) {
            cache.add(Msg::on("r1", id));
        }

        let expected: Vec<u32> = (extra..extra + 3).collect();
        assert_eq!(ids(&cache.window()), expected, "extra = {}", extra);
    }
}

#[test]
fn age_window_prunes_on_read_without_new_admissions() {
    let (cache, clock) = cache("1000ms");
    cache.add(Msg::on("r1", 1));

    clock.advance_by(999);
    assert_eq!(ids(&cache.window()), vec![1]);

    clock.advance_by(2);
    assert!(cache.window().is_empty());
    assert_eq!(cache.size(), 0);
}

#[test]
fn combined_window_applies_both_limits() {
    let (cache, clock) = cache("2,10s");
    cache.add(Msg::on("r1", 1));
    clock.advance(Duration::from_secs(6));
    cache.add(Msg::on("r1", 2));
    cache.add(Msg::on("r1", 3));

    // Count limit first
    assert_eq!(ids(&cache.window()), vec![2, 3]);

    clock.advance(Duration::from_secs(5));
    assert_eq!(ids(&cache.window()), vec![2, 3]);
    clock.advance(Duration::from_secs(6));
    assert!(cache.window().is_empty());
}

#[test]
fn reconfiguring_window_applies_on_next_read() {
    let (cache, _) = cache("");
    for id in 0..5 {
        cache.add(Msg::on("r1", id));
    }

    cache.set_window("2").unwrap();
    assert_eq!(ids(&cache.window()), vec![3, 4]);
    assert!(cache.set_window("2 fortnights").is_err());
    assert_eq!(cache.window_spec(), Window::count(2));
}
