//! certbind demo
//!
//! Generates a key pair for the chosen algorithm, issues a token bound to one
//! client certificate, then verifies it as presented over a second connection.
//! Certificates are either DER files or plain thumbprint labels.
//!
//! ```text
//! certbind-demo --algorithm ES256 --issued-for F1 --presented F2 -vv
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use rand::rngs::OsRng;
use tracing::{Level, info};

use certbind::{
    Algorithm, Claims, ConnectionInfo, EcPrivateKey, EcPublicKey, IssuerConfig, SigningKey,
    SystemClock, TokenIssuer, TokenVerifier, VerifierConfig, VerifyingKey, certificate_thumbprint,
};

#[derive(Parser, Debug)]
#[command(
    name = "certbind-demo",
    version,
    about = "Issue a certificate-bound token and verify it over a connection"
)]
struct Cli {
    /// Signing algorithm (HS256, RS256 or ES256)
    #[arg(short, long, default_value = "HS256")]
    algorithm: Algorithm,

    /// Thumbprint of the certificate the token is issued for
    #[arg(long, default_value = "F1", conflicts_with = "issued_for_cert")]
    issued_for: String,

    /// DER certificate the token is issued for
    #[arg(long)]
    issued_for_cert: Option<PathBuf>,

    /// Thumbprint presented at verification (defaults to the issued one)
    #[arg(long, conflicts_with_all = ["presented_cert", "no_client_cert"])]
    presented: Option<String>,

    /// DER certificate presented at verification
    #[arg(long, conflicts_with = "no_client_cert")]
    presented_cert: Option<PathBuf>,

    /// Verify as if no client certificate was presented
    #[arg(long)]
    no_client_cert: bool,

    /// Token lifetime in seconds
    #[arg(long, default_value_t = 3600)]
    lifetime_secs: u64,

    /// Extra claims as a JSON object
    #[arg(long, default_value = "{}")]
    claims: String,

    /// Enable verbose logging (-v, -vv, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn init_tracing(&self) {
        let level = match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    fn issued_thumbprint(&self) -> Result<String> {
        match &self.issued_for_cert {
            Some(path) => thumbprint_of(path),
            None => Ok(self.issued_for.clone()),
        }
    }

    fn connection(&self, issued: &str) -> Result<ConnectionInfo> {
        if self.no_client_cert {
            return Ok(ConnectionInfo::without_client_certificate());
        }
        if let Some(path) = &self.presented_cert {
            return Ok(ConnectionInfo::mutual_tls(thumbprint_of(path)?));
        }
        Ok(ConnectionInfo::mutual_tls(
            self.presented.as_deref().unwrap_or(issued),
        ))
    }
}

fn thumbprint_of(path: &Path) -> Result<String> {
    let der = std::fs::read(path)
        .with_context(|| format!("Failed to read certificate {}", path.display()))?;
    Ok(certificate_thumbprint(&der))
}

fn key_pair(algorithm: Algorithm) -> Result<(SigningKey, VerifyingKey)> {
    Ok(match algorithm {
        Algorithm::HS256 => {
            let secret: [u8; 32] = rand::random();
            (SigningKey::hmac(secret), VerifyingKey::hmac(secret))
        }
        Algorithm::RS256 => {
            let private_key = rsa::RsaPrivateKey::new(&mut OsRng, 2048)
                .context("RSA key generation failed")?;
            let public_key = rsa::RsaPublicKey::from(&private_key);
            (SigningKey::rsa(private_key), VerifyingKey::rsa(public_key))
        }
        Algorithm::ES256 => {
            let signing_key = p256::ecdsa::SigningKey::random(&mut OsRng);
            let verifying_key = p256::ecdsa::VerifyingKey::from(&signing_key);
            (
                EcPrivateKey::from_p256(&signing_key).into(),
                EcPublicKey::from_p256(&verifying_key).into(),
            )
        }
    })
}

fn run(cli: &Cli) -> Result<()> {
    let (signing_key, verifying_key) = key_pair(cli.algorithm)?;

    let issuer = TokenIssuer::new(
        cli.algorithm,
        signing_key,
        IssuerConfig {
            token_lifetime: std::time::Duration::from_secs(cli.lifetime_secs),
        },
    )?;
    let verifier = TokenVerifier::new(cli.algorithm, verifying_key, VerifierConfig::default())?;

    let claims = Claims::from_json(
        serde_json::from_str(&cli.claims).context("--claims is not valid JSON")?,
    )
    .context("--claims must be a JSON object")?;

    let issued = cli.issued_thumbprint()?;
    let clock = SystemClock;
    let token = issuer.issue(claims, &issued, &clock)?;
    info!(algorithm = %cli.algorithm, "Issued token bound to {issued}");
    println!("{token}");

    let connection = cli.connection(&issued)?;
    // Operators get the cause; a client would only see the public message
    let claims = verifier
        .verify(&token, &connection, &clock)
        .map_err(|e| anyhow!("rejected: {} ({e})", e.public_message()))?;
    println!("accepted: {}", claims.to_json()?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_tracing();
    run(&cli)
}
