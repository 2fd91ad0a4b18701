use collector::controller::Controller;
use collector::runtime::{boot, stop};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let (config, factory) = boot::boot()?;

    let mut controller = Controller::new();
    controller.init(&config, &factory)?;

    tokio::select! {
        _ = controller.run() => {},
        _ = stop::shutdown_signal() => {},
    }

    info!("Collector stopped");
    Ok(())
}
