//! minipas-cli/src/lib.rs — CLI lib pour minipas
//!
//! Sous-commandes :
//!   - emit  : traduit un AST JSON en fichier C (ou sur stdout)
//!   - check : traduit en mémoire et rapporte, sans rien écrire
//!
//! Configuration, du plus faible au plus fort : défauts → fichier TOML
//! (`--config`, table `[codegen]`) → ENV `MINIPAS_*` → flags.

use std::{ffi::OsString, fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::{debug, info};
use minipas_ast::{Program, Stmt};
use minipas_codegen::config::{parse_empty_entry, parse_indent};
use minipas_codegen::output::default_output_path;
use minipas_codegen::{translate, translate_to_path, CliOverrides, Config, EmptyEntry, IndentStyle};
use serde::Deserialize;

/// Point d’entrée du binaire (à appeler depuis src/main.rs)
pub fn run() -> Result<()> {
    execute(Cli::parse())
}

/// Variante testable : arguments explicites (le premier est le nom du binaire).
pub fn run_from<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    execute(Cli::try_parse_from(args)?)
}

fn execute(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);
    match cli.cmd {
        Cmd::Emit(args) => cmd_emit(args),
        Cmd::Check { input, config } => cmd_check(input, config),
    }
}

#[derive(Parser, Debug)]
#[command(name = "minipas", version, about = "Générateur C pour minipas (AST JSON → .c)")]
struct Cli {
    /// Verbosité (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Traduit un AST JSON en fichier C
    Emit(EmitArgs),
    /// Traduit en mémoire et rapporte, sans écrire
    Check {
        /// AST JSON d’entrée
        input: PathBuf,
        /// Fichier de configuration TOML
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct EmitArgs {
    /// AST JSON d’entrée
    input: PathBuf,
    /// Fichier C de sortie (défaut : entrée avec l’extension `.c`)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Fichier de configuration TOML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Indentation : `tab` ou un nombre d’espaces
    #[arg(long, value_parser = indent_arg)]
    indent: Option<IndentStyle>,
    /// Programme sans Var/Block de premier niveau : `emit` ou `omit`
    #[arg(long, value_parser = empty_entry_arg)]
    empty_entry: Option<EmptyEntry>,
    /// Garde les lignes vides du tampon brut
    #[arg(long)]
    keep_blank_lines: bool,
    /// Écrit le C sur stdout au lieu d’un fichier
    #[arg(long, conflicts_with = "output")]
    stdout: bool,
}

impl EmitArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            indent: self.indent,
            empty_entry: self.empty_entry,
            collapse_blank_lines: self.keep_blank_lines.then_some(false),
        }
    }
}

fn indent_arg(s: &str) -> Result<IndentStyle, String> {
    parse_indent(s).ok_or_else(|| format!("`{s}` : attendu `tab` ou un nombre d’espaces"))
}

fn empty_entry_arg(s: &str) -> Result<EmptyEntry, String> {
    parse_empty_entry(s).ok_or_else(|| format!("`{s}` : attendu `emit` ou `omit`"))
}

/* ───────────────────────────── Commandes ───────────────────────────── */

fn cmd_emit(args: EmitArgs) -> Result<()> {
    let overrides = args.overrides();
    let input = utf8(args.input)?;
    let config = args.config.map(utf8).transpose()?;

    let program = load_program(&input)?;
    let cfg = resolve_config(config.as_deref(), &overrides)?;

    if args.stdout {
        let text = translate(&program, &cfg).with_context(|| format!("génération de {input}"))?;
        print!("{text}");
        return Ok(());
    }

    let out = match args.output {
        Some(p) => utf8(p)?,
        None => utf8(default_output_path(input.as_std_path()))?,
    };
    let art = translate_to_path(&program, &cfg, &out).with_context(|| format!("génération de {input}"))?;
    eprintln!("✅  écrit {out} ({} octets)", art.size);
    Ok(())
}

fn cmd_check(input: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let input = utf8(input)?;
    let config = config.map(utf8).transpose()?;

    let program = load_program(&input)?;
    let cfg = resolve_config(config.as_deref(), &CliOverrides::default())?;
    let text = translate(&program, &cfg).with_context(|| format!("génération de {input}"))?;

    let procs = program.nodes.iter().filter(|n| matches!(n, Stmt::Proc(_))).count();
    eprintln!("✅  {input} : {} ligne(s) C, {procs} procédure(s) de premier niveau", text.lines().count());
    Ok(())
}

/* ───────────────────────────── Entrées ───────────────────────────── */

/// Fichier de configuration ; seules les tables connues sont lues.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    codegen: Config,
}

fn load_program(path: &Utf8Path) -> Result<Program> {
    let s = fs::read_to_string(path).with_context(|| format!("lecture de {path}"))?;
    let program: Program = serde_json::from_str(&s).with_context(|| format!("AST JSON invalide ({path})"))?;
    debug!("AST chargé : {} nœud(s) de premier niveau", program.nodes.len());
    Ok(program)
}

fn load_config_file(path: &Utf8Path) -> Result<Config> {
    let s = fs::read_to_string(path).with_context(|| format!("lecture de {path}"))?;
    let file: ConfigFile = toml::from_str(&s).with_context(|| format!("TOML invalide ({path})"))?;
    Ok(file.codegen)
}

fn resolve_config(file: Option<&Utf8Path>, overrides: &CliOverrides) -> Result<Config> {
    let mut cfg = match file {
        Some(p) => load_config_file(p)?,
        None => Config::default(),
    };
    cfg.apply_env();
    cfg.apply_cli_overrides(overrides);
    cfg.validate().map_err(|e| anyhow!("configuration invalide : {e}"))?;
    info!("configuration : {cfg:?}");
    Ok(cfg)
}

fn utf8(p: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(p).map_err(|p| anyhow!("chemin non UTF-8 : {}", p.display()))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // déjà initialisé (tests) : on garde le logger existant
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).try_init();
}
