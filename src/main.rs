/**
 * The main entry point for the probe, it creates
 * the probe object and passes control to it.
 */
use stunwire::StunProbe;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let probe = StunProbe::new()?;
    probe.run().await?;
    Ok(())
}
