#![no_main]

use libfuzzer_sys::fuzz_target;

use addr_pool_fuzz::{addresses, assert_invariants, SmallPool};

use pool::Pool;

fuzz_target!(|p: SmallPool| {
    let pool: Pool<u8> = p.into();

    let canonical = pool.canonical();

    assert_eq!(addresses(&pool), canonical.iter().collect::<Vec<_>>());
    assert_eq!(pool, canonical);
    assert_eq!(pool.len(), canonical.len());

    assert_invariants(&canonical.into_inner());
});
