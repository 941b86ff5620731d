use anyhow::{bail, Context, Result};
use approovtoken::binding;
use approovtoken::config::{
    parse_switch, ApproovConfig, Config, Protocol, ServerConfig, DEFAULT_CERTIFICATES_PATH,
    DEFAULT_ENV, DEFAULT_HOSTNAME, DEFAULT_PORT,
};
use approovtoken::policy::Policy;
use approovtoken::server;
use approovtoken::token::{Claims, Issuer, Verifier, CLAIM_EXAMPLE};
use clap::{ArgAction, Parser};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
enum ApproovTokenCli {
    Serve(ServeArgs),
    Generate(GenerateArgs),
    Check(CheckArgs),
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Run the shapes API server, with the Approov token and token \
    binding checks in front of the /v2 endpoints")]
struct ServeArgs {
    /// Base64 encoded Approov secret, as retrieved with the Approov CLI tool
    #[arg(long = "secret", env = "APPROOV_BASE64_SECRET", hide_env_values = true)]
    base64_secret: Option<String>,

    #[arg(long, env = "APPROOV_ABORT_REQUEST_ON_INVALID_TOKEN",
        default_value = "true", value_parser = parse_switch, action = ArgAction::Set)]
    abort_on_invalid_token: bool,

    #[arg(long, env = "APPROOV_ABORT_REQUEST_ON_INVALID_TOKEN_BINDING",
        default_value = "true", value_parser = parse_switch, action = ArgAction::Set)]
    abort_on_invalid_binding: bool,

    #[arg(long = "logging", env = "APPROOV_LOGGING_ENABLED",
        default_value = "true", value_parser = parse_switch, action = ArgAction::Set)]
    logging_enabled: bool,

    #[arg(long, env = "APPROOV_ALLOW_MISSING_BINDING_CLAIM",
        default_value = "true", value_parser = parse_switch, action = ArgAction::Set)]
    allow_missing_binding_claim: bool,

    /// Request header the Approov token is bound to
    #[arg(long, env = "APPROOV_TOKEN_BINDING_HEADER",
        default_value = binding::DEFAULT_BINDING_HEADER)]
    binding_header: String,

    #[arg(long, env = "ENV", default_value = DEFAULT_ENV)]
    env: String,

    #[arg(long, env = "HTTP_PROTOCOL", default_value = "http")]
    protocol: Protocol,

    #[arg(long, env = "SERVER_HOSTNAME", default_value = DEFAULT_HOSTNAME)]
    hostname: String,

    #[arg(long, env = "HTTP_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    #[arg(long, env = "HTTP_BIND", default_value = "0.0.0.0")]
    bind: IpAddr,

    #[arg(long, env = "CERTIFICATES_PATH", default_value = DEFAULT_CERTIFICATES_PATH)]
    certificates_path: PathBuf,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Generate an Approov token for testing purposes during \
    development")]
struct GenerateArgs {
    /// The Approov token expire time in minutes
    #[arg(short, long, default_value_t = 5)]
    expire: u64,

    /// The base64 encoded sha256 hash of the custom payload claim
    #[arg(short, long, conflicts_with_all = ["claim_example", "bind"])]
    claim: Option<String>,

    /// Same as --claim but using a hard-coded claim example
    #[arg(long, conflicts_with = "bind")]
    claim_example: bool,

    /// Bind the token to this header value (sets the claim to its digest)
    #[arg(short, long)]
    bind: Option<String>,

    /// The base64 encoded secret to sign the Approov token
    #[arg(short, long, env = "APPROOV_BASE64_SECRET", hide_env_values = true)]
    secret: String,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Verify an Approov token and, optionally, its binding to the \
    supplied header value")]
struct CheckArgs {
    #[arg(short, long)]
    token: String,

    /// Value of the binding header
    #[arg(short, long)]
    binding: Option<String>,

    /// Reject tokens without a binding claim
    #[arg(long)]
    strict: bool,

    /// The base64 encoded Approov secret
    #[arg(short, long, env = "APPROOV_BASE64_SECRET", hide_env_values = true)]
    secret: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match ApproovTokenCli::parse() {
        ApproovTokenCli::Serve(args) => serve(args).await,
        ApproovTokenCli::Generate(args) => generate(&args),
        ApproovTokenCli::Check(args) => check(&args),
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let policy = Policy {
        abort_on_invalid_token: args.abort_on_invalid_token,
        abort_on_invalid_binding: args.abort_on_invalid_binding,
        logging_enabled: args.logging_enabled,
        allow_missing_binding_claim: args.allow_missing_binding_claim,
    };

    let approov = ApproovConfig::new(args.base64_secret.as_deref(), &args.binding_header, policy)
        .context("Failed to load the Approov configuration")?;

    let config = Config {
        server: ServerConfig {
            env: args.env,
            protocol: args.protocol,
            hostname: args.hostname,
            port: args.port,
            bind: args.bind,
            certificates_path: args.certificates_path,
        },
        approov,
    };

    info!("Starting shapes server: {:?}", config);

    server::serve(config).await
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let issuer = Issuer::from_base64(&args.secret).context("Failed to decode the secret")?;

    let mut claims = Claims::expiring_in(args.expire);

    if let Some(claim) = &args.claim {
        claims = claims.with_pay(claim.as_str());
    }

    if args.claim_example {
        claims = claims.with_pay(CLAIM_EXAMPLE);
    }

    if let Some(value) = &args.bind {
        claims = claims.bound_to(value)?;
    }

    let token = issuer.issue(&claims)?;

    println!("Token:\n{token}");

    Ok(())
}

fn check(args: &CheckArgs) -> Result<()> {
    let verifier = Verifier::new(&args.secret).context("Failed to decode the secret")?;

    let claims = match verifier.verify(&args.token) {
        Ok(c) => c,
        Err(e) => bail!("verification failed: {e}"),
    };

    println!("verification successful: {}", serde_json::to_string(&claims)?);

    let outcome = binding::validate(&claims, args.binding.as_deref(), !args.strict)?;

    if !outcome.is_valid() {
        bail!("token binding check failed: {outcome}");
    }

    println!("token binding check successful");

    Ok(())
}
