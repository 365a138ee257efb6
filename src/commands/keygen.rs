//! Key generation command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pvdhide::{KeyPair, StegoConfig};

use super::report::print_keys;
use super::CommandExecutor;

/// Generate a new key pair.
#[derive(Args, Debug)]
pub struct KeygenCommand {
    /// Output path for keys (creates .pub and .key files)
    #[arg(short, long, default_value = "pvdhide")]
    pub output: PathBuf,
}

impl CommandExecutor for KeygenCommand {
    fn execute(&self, _config: &StegoConfig) -> Result<()> {
        let keypair = KeyPair::generate();
        keypair
            .save_to_files(&self.output)
            .context("Failed to save key pair")?;

        let pub_path = self.output.with_extension("pub");
        let key_path = self.output.with_extension("key");

        println!("Key pair generated successfully:");
        println!("  Public key:  {}", pub_path.display());
        println!("  Private key: {}", key_path.display());
        println!();
        print_keys(&keypair, &keypair.shared_key());
        println!();
        println!("Anyone holding both files can derive the AES key.");
        println!("Hand them to the recipient over a channel you trust.");

        Ok(())
    }
}
