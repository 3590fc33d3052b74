use std::{
    fs,
    io::{stdout, Write},
    path::Path,
};

use anyhow::{ensure, Context};
use huffpack::Container;
use tracing::{debug, info};

pub fn encode(input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let bytes = fs::read(input).context(format!("reading from {}", input.display()))?;
    ensure!(!bytes.is_empty(), "{} is empty, nothing to encode", input.display());
    let container =
        Container::encode(&bytes).context(format!("encoding {}", input.display()))?;
    debug!(
        distinct_symbols = container.tree().leaf_count(),
        payload_bits = container.payload_bit_len(),
        "built code"
    );
    let encoded = container.to_bytes();
    info!(
        input_len = bytes.len(),
        output_len = encoded.len(),
        ratio = %format!("{:.2}%", encoded.len() as f64 * 100.0 / bytes.len() as f64),
        "encoded {}",
        input.display()
    );
    write_output(output, &encoded)
}

pub fn decode(input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let container = read_container(input)?;
    let decoded = container
        .decode()
        .context(format!("decoding {}", input.display()))?;
    info!(
        input_len = container.serialization_len(),
        output_len = decoded.len(),
        "decoded {}",
        input.display()
    );
    write_output(output, &decoded)
}

pub fn inspect(input: &Path) -> anyhow::Result<()> {
    let container = read_container(input)?;
    print!("{container}");
    Ok(())
}

fn read_container(input: &Path) -> anyhow::Result<Container> {
    let bytes = fs::read(input).context(format!("reading from {}", input.display()))?;
    let container = Container::try_from(bytes.as_slice())
        .context(format!("parsing container in {}", input.display()))?;
    debug!(
        original_length = container.original_length(),
        distinct_symbols = container.tree().leaf_count(),
        last_byte_valid_bits = container.last_byte_valid_bits(),
        "parsed header"
    );
    Ok(container)
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, bytes).context(format!("writing to {}", path.display()))?;
            debug!("wrote {} bytes to {}", bytes.len(), path.display());
            Ok(())
        }
        None => {
            stdout().write_all(bytes).context("writing to stdout")?;
            stdout().flush().context("flushing stdout")
        }
    }
}
