//! Host-side helper: `cargo run -- [port]` builds the wasm package into
//! `static/pkg` and serves the demo page from `static/`.

use std::process::{Command, Stdio};
use std::{env, thread, time::Duration};

use anyhow::{bail, Context};

const DEFAULT_PORT: u16 = 8000;

fn main() -> anyhow::Result<()> {
    let port = match env::args().nth(1) {
        Some(arg) => arg
            .parse::<u16>()
            .with_context(|| format!("invalid port {arg:?}"))?,
        None => DEFAULT_PORT,
    };

    println!("Building wasm package …");
    let status = Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
        .context("wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/)")?;
    if !status.success() {
        bail!("wasm-pack build failed with {status}");
    }

    println!("Serving demo at http://127.0.0.1:{port} …");
    let mut server = Command::new("python3")
        .args(["-m", "http.server", &port.to_string(), "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("failed to start http server")?;

    loop {
        if let Some(status) = server.try_wait()? {
            bail!("http server exited with {status}");
        }
        thread::sleep(Duration::from_secs(1));
    }
}
