use std::path::Path;

use carbongate_core::JobSpec;

pub fn init(path: &str) -> anyhow::Result<()> {
    let output = Path::new(path);
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }

    let spec = JobSpec::scaffold();
    std::fs::write(output, spec.to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}
