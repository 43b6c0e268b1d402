#![no_main]

use coords::key::{MAX_XY_MAGNITUDE, MAX_Z};
use coords::{decode, encode, encode_checked};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: [u8; 8]| {
    let (x, y, z) = decode(i64::from_le_bytes(data));
    assert!(x.abs() <= MAX_XY_MAGNITUDE);
    assert!(y.abs() <= MAX_XY_MAGNITUDE);
    assert!((0..=MAX_Z).contains(&z));

    let key = encode(x, y, z).unwrap();
    assert_eq!(decode(key), (x, y, z));
    assert_eq!(encode_checked(x, y, z).unwrap(), key);
});
