use gesture_demo::{run, DemoOptions};

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== flingkit gesture demo ===");
    println!("Replays scripted pointer input against the gesture models.");
    println!("Set RUST_LOG=debug to see every phase change.");
    println!();

    let report = run(&DemoOptions::default())?;
    for line in report.lines() {
        println!("{line}");
    }
    Ok(())
}
