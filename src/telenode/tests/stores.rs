use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use embassy_futures::block_on;
use embassy_time::{Duration, Timer};
use telenode::store::{CachedReader, Store};

const TIMEOUT: Duration = Duration::from_millis(5);

#[test]
fn concurrent_readers_never_see_torn_writes() {
    static STORE: Store<u16, 10> = Store::new("stress", [0; 10]);
    static DONE: AtomicBool = AtomicBool::new(false);

    let writer = thread::spawn(|| {
        block_on(async {
            for generation in 1..=2000u16 {
                // A skipped write is fine, a partial one is not.
                let _ = STORE.write(&[generation; 10], TIMEOUT).await;
                if generation % 100 == 0 {
                    Timer::after_micros(100).await;
                }
            }
        });
        DONE.store(true, Ordering::Release);
    });

    let readers: Vec<_> = (0..3)
        .map(|_| {
            thread::spawn(|| {
                let mut reader = CachedReader::new(&STORE, TIMEOUT);
                let mut reads = 0u32;
                loop {
                    let values = block_on(reader.read());
                    assert!(
                        values.iter().all(|value| *value == values[0]),
                        "torn read: {values:?}"
                    );
                    reads += 1;
                    if DONE.load(Ordering::Acquire) {
                        break reads;
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(STORE.try_snapshot(), Some([2000; 10]));
}
