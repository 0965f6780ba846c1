//! Command-line front end: build a profile QR code, inspect a payload, extract its documents.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use qiprofile::error::{RenderError, SessionError};
use qiprofile::profile::DraftProfile;
use qiprofile::share::{self, ShareBundle};
use qiprofile::viewer::{DocumentViewer, PdfPageCounter};
use qiprofile::{export, payload, render, telemetry, Config, EditingSession, ProfileRecord, QrCodeEcc};
use tracing::{debug, info};

/// Turn a personal profile and its PDF attachments into a QR code.
#[derive(Parser)]
#[command(name = "qiprofile", version)]
struct Cli {
    /// Optional path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a profile, attach documents and write the QR code as PNG
    Generate(GenerateArgs),
    /// Print the fields and documents carried by a payload
    Inspect {
        /// File holding the payload text
        payload: PathBuf,
    },
    /// Write every document carried by a payload back to disk
    Extract {
        /// File holding the payload text
        payload: PathBuf,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    profile: ProfileArgs,
    /// PDF to attach; may be repeated
    #[arg(long = "document", value_name = "PATH")]
    documents: Vec<PathBuf>,
    /// Output directory
    #[arg(long, default_value = ".")]
    out: PathBuf,
    /// Also write the payload text to this file
    #[arg(long, value_name = "FILE")]
    payload: Option<PathBuf>,
    /// Also write an SVG next to the PNG
    #[arg(long)]
    svg: bool,
    /// Print the symbol to the terminal
    #[arg(long)]
    show: bool,
    /// Error correction level override
    #[arg(long, value_enum)]
    ecc: Option<EccArg>,
}

#[derive(Args)]
struct ProfileArgs {
    #[arg(long, default_value_t)]
    first_name: String,
    #[arg(long, default_value_t)]
    last_name: String,
    #[arg(long, default_value_t)]
    email: String,
    #[arg(long, default_value_t)]
    phone: String,
    #[arg(long, default_value_t)]
    address: String,
    #[arg(long, default_value_t)]
    city: String,
    #[arg(long, default_value_t)]
    state: String,
    #[arg(long, default_value_t)]
    zip_code: String,
    #[arg(long, default_value_t)]
    country: String,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    job_title: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl From<ProfileArgs> for DraftProfile {
    fn from(args: ProfileArgs) -> Self {
        DraftProfile {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            address: args.address,
            city: args.city,
            state: args.state,
            zip_code: args.zip_code,
            country: args.country,
            company: args.company,
            job_title: args.job_title,
            notes: args.notes,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum EccArg {
    L,
    M,
    Q,
    H,
}

impl From<EccArg> for QrCodeEcc {
    fn from(arg: EccArg) -> Self {
        match arg {
            EccArg::L => QrCodeEcc::Low,
            EccArg::M => QrCodeEcc::Medium,
            EccArg::Q => QrCodeEcc::Quartile,
            EccArg::H => QrCodeEcc::High,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = telemetry::init_tracing(None) {
        eprintln!("tracing disabled: {e}");
    }

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", cli.config))?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Command::Generate(args) => generate(config, args).await,
        Command::Inspect { payload } => {
            inspect(&payload).with_context(|| format!("failed to inspect {}", payload.display()))
        }
        Command::Extract { payload, out } => {
            extract(&payload, &out).with_context(|| format!("failed to extract {}", payload.display()))
        }
    }
}

async fn generate(config: Config, args: GenerateArgs) -> anyhow::Result<()> {
    let mut options = config.render_options();
    if let Some(ecc) = args.ecc {
        options.ecc = ecc.into();
    }

    let mut session = EditingSession::new(config);
    *session.draft_mut() = args.profile.into();

    let report = session.attach_paths(args.documents).await;
    for rejected in &report.rejected {
        eprintln!("skipped {}: {rejected}", rejected.file_name());
    }
    for added in &report.added {
        println!("attached {}", added.name);
    }
    if !report.is_clean() {
        eprintln!("{} document(s) skipped", report.rejected.len());
    }

    let attached = session.attached_bytes();
    let capacity = payload::capacity(options.ecc);
    if attached > capacity {
        eprintln!(
            "warning: attachments alone encode to {attached} bytes, a level {} symbol holds {capacity}",
            options.ecc.letter()
        );
    }

    let record = match session.submit().await {
        Ok(record) => record,
        Err(SessionError::Validation(errors)) => {
            for error in errors.errors() {
                eprintln!("  - {error}");
            }
            bail!("profile is incomplete ({} field(s) need attention)", errors.errors().len());
        }
        Err(e) => return Err(e.into()),
    };

    let text = payload::encode(&record)?;
    if let Some(path) = &args.payload {
        fs::write(path, &text).with_context(|| format!("failed to write payload to {}", path.display()))?;
    }

    let qr = match render::render_with(&text, &options) {
        Ok(qr) => qr,
        Err(RenderError::CapacityExceeded {
            payload_bytes,
            capacity_bytes,
            level,
        }) => {
            let hint = if payload::fits(&text, QrCodeEcc::Low) {
                "try a lower error correction level"
            } else if record.documents().is_empty() {
                "shorten the profile fields"
            } else {
                "attach fewer or smaller documents"
            };
            bail!(
                "QR capacity exceeded: payload is {payload_bytes} bytes, level {level} holds at most {capacity_bytes}; {hint}"
            );
        }
        Err(e) => return Err(e.into()),
    };

    let bundle = ShareBundle::for_profile(&record, qr.to_png()?);
    let png_path = share::save_qr(&bundle, &args.out)?;
    println!("{} -> {}", bundle.title, png_path.display());

    if args.svg {
        let svg_path = png_path.with_extension("svg");
        fs::write(&svg_path, qr.to_svg_string())?;
        println!("svg -> {}", svg_path.display());
    }
    if args.show {
        print!("{}", qr.to_text());
    }
    info!(version = qr.version().value(), "QR code generated");
    Ok(())
}

fn read_payload(path: &Path) -> qiprofile::Result<ProfileRecord> {
    let text = fs::read_to_string(path)?;
    Ok(payload::decode(text.trim())?)
}

fn inspect(path: &Path) -> qiprofile::Result<()> {
    let record = read_payload(path)?;
    let details = record.details();

    println!("id:         {}", record.id());
    println!("name:       {}", record.display_name());
    println!("email:      {}", details.email);
    println!("phone:      {}", details.phone);
    println!(
        "address:    {}, {}, {} {}, {}",
        details.address, details.city, details.state, details.zip_code, details.country
    );
    for (label, value) in [
        ("company", &details.company),
        ("job title", &details.job_title),
        ("notes", &details.notes),
    ] {
        if let Some(value) = value {
            println!("{:<11} {value}", format!("{label}:"));
        }
    }
    println!("created at: {}", record.created_at().to_rfc3339());

    println!("documents:  {}", record.documents().len());
    for document in record.documents() {
        match DocumentViewer::open(document, &PdfPageCounter) {
            Ok(viewer) => println!("  {} ({} page(s))", viewer.name(), viewer.cursor().total()),
            Err(e) => println!("  {} (not viewable: {e})", document.name),
        }
    }
    Ok(())
}

fn extract(path: &Path, out: &Path) -> qiprofile::Result<()> {
    let record = read_payload(path)?;
    if record.documents().is_empty() {
        println!("no documents attached");
        return Ok(());
    }
    for document in record.documents() {
        let file = export::reconstruct(document)?;
        let saved = file.save_to(out)?;
        println!("{}", saved.display());
    }
    Ok(())
}
