use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use mailprobe_lib::smtp::DEFAULT_MAIL_FROM;
use mailprobe_lib::{
    DelayRange, MxSelection, ProbeOptions, ValidationMode, VerifierOptions,
};

#[derive(Parser)]
#[command(name = "mailprobe-cli", version)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// journal horodaté (ouvert en ajout)
    #[arg(long, global = true, default_value = "email_verification.log")]
    pub log_file: PathBuf,

    /// trace le dialogue SMTP complet dans le journal
    #[arg(long, global = true)]
    pub smtp_debug: bool,

    /// enveloppe MAIL FROM utilisée pour la sonde
    #[arg(long = "mail-from", alias = "from", global = true, default_value = DEFAULT_MAIL_FROM)]
    pub mail_from: String,

    /// nom annoncé dans HELO
    #[arg(long, global = true, default_value = "localhost")]
    pub helo: String,

    /// timeout de connexion/lecture SMTP (ms, 0 = aucun)
    #[arg(long = "timeout", global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// mode: strict|relaxed
    #[arg(long, global = true, default_value = "strict")]
    pub mode: String,

    /// choix du MX: first (ordre de la réponse DNS) | lowest (préférence la plus basse)
    #[arg(long = "mx-priority", global = true, default_value = "first")]
    pub mx_priority: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// vérifie toutes les adresses d'une colonne CSV et écrit le résultat
    Batch {
        /// fichier CSV d'entrée (ligne d'en-tête obligatoire)
        #[arg(long, default_value = "input_emails.csv")]
        input: PathBuf,
        /// nom de la colonne contenant les adresses
        #[arg(long, default_value = "Email")]
        column: String,
        /// fichier CSV de sortie
        #[arg(long, default_value = "verified_emails.csv")]
        output: PathBuf,
        /// délai minimum entre deux sondes (s)
        #[arg(long, default_value_t = 1.0)]
        min_delay: f64,
        /// délai maximum entre deux sondes (s)
        #[arg(long, default_value_t = 5.0)]
        max_delay: f64,
        /// format du récapitulatif: human|json
        #[arg(long, default_value = "human")]
        format: String,
    },
    /// vérifie une seule adresse
    Verify {
        email: String,
    },
    /// liste les enregistrements MX d'un domaine
    Mx {
        domain: String,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn verifier_options(&self) -> Result<VerifierOptions> {
        Ok(VerifierOptions {
            validation_mode: mode_from_str(&self.mode),
            mx_selection: mx_selection_from_str(&self.mx_priority)?,
        })
    }

    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            helo_domain: self.helo.clone(),
            mail_from: self.mail_from.clone(),
            timeout_ms: self.timeout_ms,
            debug: self.smtp_debug,
            ..ProbeOptions::default()
        }
    }
}

pub fn mode_from_str(s: &str) -> ValidationMode {
    match s {
        "relaxed" => ValidationMode::Relaxed,
        _ => ValidationMode::Strict,
    }
}

pub fn mx_selection_from_str(s: &str) -> Result<MxSelection> {
    match s {
        "first" => Ok(MxSelection::FirstReturned),
        "lowest" => Ok(MxSelection::LowestPreference),
        other => bail!("unknown --mx-priority '{other}', use: first|lowest"),
    }
}

pub fn delay_range(min: f64, max: f64) -> Result<DelayRange> {
    Ok(DelayRange::new(min, max)?)
}
