use clap::Parser;

mod commands;

use anyhow::Result;
use commands::sync::SyncCommand;

#[derive(Parser)]
#[clap(name = "gitlab-vars", bin_name = "gitlab-vars", version, about)]
struct GitlabVarsApp {
    #[clap(flatten)]
    command: SyncCommand,
}

impl GitlabVarsApp {
    pub async fn run(&self) -> Result<()> {
        self.command.run().await
    }
}

// reqwest and rustls must agree on one crypto backend; install ring up front
fn init_crypto_provider() {
    use std::sync::Once;
    static CRYPTO_PROVIDER_INIT: Once = Once::new();

    CRYPTO_PROVIDER_INIT.call_once(|| {
        // Fails if a provider is already installed, which is fine
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    init_crypto_provider();

    let app = GitlabVarsApp::parse();
    app.run().await
}
