#![no_main]

use libfuzzer_sys::fuzz_target;

use addr_pool_fuzz::{addresses, assert_invariants, SmallPool};

use pool::{Difference, Pool};

fn expected_difference(a: &Pool<u8>, b: &Pool<u8>) -> Vec<u8> {
    let b = addresses(b);
    addresses(a)
        .into_iter()
        .filter(|x| !b.contains(x))
        .collect::<Vec<_>>()
}

fuzz_target!(|r: (SmallPool, SmallPool)| {
    let old: Pool<u8> = r.0.into();
    let new: Pool<u8> = r.1.into();

    let expected_values = expected_difference(&old, &new);

    let diff = old.difference(&new);

    let actual_values = diff.iter().collect::<Vec<_>>();

    assert_eq!(expected_values, actual_values);

    assert!(diff.is_canonical());
    assert_invariants(&diff.into_inner());
});
