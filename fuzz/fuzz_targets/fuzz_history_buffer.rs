//! Fuzz target: `BoundedHistoryBuffer`
//!
//! Drives arbitrary `put` / `get` / `average` / `clear` sequences into an
//! integer buffer and a shadow `Vec`, verifying:
//! - No panics (including averages over values near `i64` limits)
//! - `size()` never exceeds the capacity
//! - Contents always equal the newest `capacity` shadow entries
//!
//! cargo fuzz run fuzz_history_buffer

#![no_main]

use libfuzzer_sys::fuzz_target;
use rcsense::BoundedHistoryBuffer;

fuzz_target!(|data: &[u8]| {
    let Some((&cap, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap % 32) + 1;
    let mut buf = BoundedHistoryBuffer::<i64>::new(capacity);
    let mut shadow: Vec<i64> = Vec::new();

    for chunk in ops.chunks(9) {
        match chunk[0] % 4 {
            0 if chunk.len() == 9 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&chunk[1..9]);
                let v = i64::from_le_bytes(raw);
                buf.put(v);
                shadow.push(v);
                if shadow.len() > capacity {
                    shadow.remove(0);
                }
            }
            1 => {
                let got = buf.get().ok();
                let expected = (!shadow.is_empty()).then(|| shadow.remove(0));
                assert_eq!(got, expected);
            }
            2 => {
                let avg = buf.average();
                assert_eq!(avg.is_ok(), !shadow.is_empty());
                if let Ok(avg) = avg {
                    let lo = shadow.iter().min().copied().unwrap_or_default();
                    let hi = shadow.iter().max().copied().unwrap_or_default();
                    assert!(lo <= avg && avg <= hi, "mean {avg} outside [{lo}, {hi}]");
                }
            }
            _ => {
                buf.clear();
                shadow.clear();
            }
        }

        assert!(buf.size() <= capacity);
        assert!(buf.iter().eq(shadow.iter().copied()));
    }
});
