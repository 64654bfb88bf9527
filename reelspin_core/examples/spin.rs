use reelspin_core::{SeededDigits, Settings, SoundFx, SpinController, TimingConfig};

fn main() {
    // One full cycle on a virtual clock
    let digits = SeededDigits::new("example-seed", "example-tag");
    let seed_hash = digits.seed_hash_hex();
    let mut ctl = SpinController::new(
        Settings::default(),
        TimingConfig::default(),
        Box::new(digits),
        SoundFx::silent(),
    )
    .expect("default timing is valid");

    let cycle = ctl.request_spin(0).expect("widget is idle");
    let done = cycle.completes_at;
    println!("seed_hash={} targets={:?}", seed_hash, cycle.target_values);

    for ev in ctl.advance(done) {
        println!("{:?}", ev);
    }
}
