#![no_main]

use libfuzzer_sys::fuzz_target;

use addr_pool_fuzz::{addresses, assert_invariants, SmallPool, SmallRange};

use pool::{Difference, Pool};

fuzz_target!(|r: (SmallPool, SmallRange)| {
    let old: Pool<u8> = r.0.into();
    let range = r.1 .0;

    let expected_values = addresses(&old)
        .into_iter()
        .filter(|x| !range.contains(x))
        .collect::<Vec<_>>();

    let diff = old.difference(&range);

    let actual_values = diff.iter().collect::<Vec<_>>();

    assert_eq!(expected_values, actual_values);

    assert_invariants(&diff.into_inner());
});
