//! portreset command-line entry point.
//!
//! ```bash
//! # dry run: logs in to every switch, sends nothing
//! portreset inventory.txt --user netops
//!
//! # apply, capturing the new port configs under ./captures
//! portreset inventory.txt --user netops --live --capture-dir captures
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use log::{error, info, warn};
use secrecy::SecretString;

use portreset::platform::vendors::catalyst;
use portreset::{
    AuthMethod, HostKeyVerification, RunContext, RunMode, SshConfig, SshConnector, SwitchReport,
};

#[derive(Debug, Parser)]
#[command(version, about = "Reset and rebuild access ports across a switch fleet")]
struct Args {
    /// Inventory file: `<model> <address> <template> <vlan>:<keep|reset>[,...]` per line
    inventory: PathBuf,

    /// Login user for every switch
    #[arg(short, long, env = "PORTRESET_USER")]
    user: String,

    /// Login password; prompted for when neither this nor --key is given
    #[arg(long, env = "PORTRESET_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Private key file to authenticate with instead of a password
    #[arg(short, long)]
    key: Option<PathBuf>,

    /// Passphrase for an encrypted --key
    #[arg(long, env = "PORTRESET_KEY_PASSPHRASE", hide_env_values = true, requires = "key")]
    key_passphrase: Option<String>,

    #[arg(short, long, default_value_t = 22)]
    port: u16,

    /// Connect and prompt timeout, in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Send configuration commands; without this nothing is changed
    #[arg(long)]
    live: bool,

    /// Pause after every configuration command, in milliseconds
    #[arg(long, default_value_t = 100)]
    settle_delay_ms: u64,

    /// Host key checking: strict, accept-new or disabled
    #[arg(long, default_value = "accept-new")]
    host_keys: HostKeyVerification,

    /// known_hosts file (default: ~/.ssh/known_hosts)
    #[arg(long)]
    known_hosts: Option<PathBuf>,

    /// Directory for per-switch post-change captures
    #[arg(long, default_value = ".")]
    capture_dir: PathBuf,

    /// Log file (default: portreset_<date>_<time>.log in the current directory)
    #[arg(long, conflicts_with = "log_stderr")]
    log_file: Option<PathBuf>,

    /// Log to stderr instead of a file
    #[arg(long)]
    log_stderr: bool,

    /// Write the run statistics here as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

/// Per-run log file name, e.g. `portreset_2026-10-16_14-05-09.log`.
fn default_log_file() -> PathBuf {
    PathBuf::from(format!(
        "portreset_{}.log",
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    ))
}

fn init_logging(args: &Args) -> std::io::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if !args.log_stderr {
        let path = args.log_file.clone().unwrap_or_else(default_log_file);
        let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
        eprintln!("logging to {}", path.display());
    }
    builder.init();
    Ok(())
}

fn auth_method(args: &Args) -> std::io::Result<AuthMethod> {
    if let Some(password) = &args.password {
        return Ok(AuthMethod::Password(SecretString::from(password.clone())));
    }
    if let Some(path) = &args.key {
        return Ok(AuthMethod::PrivateKey {
            path: path.clone(),
            passphrase: args.key_passphrase.clone().map(SecretString::from),
        });
    }
    let password = rpassword::prompt_password(format!("Password for {}: ", args.user))?;
    Ok(AuthMethod::Password(SecretString::from(password)))
}

fn write_capture(dir: &Path, report: &SwitchReport) {
    let Some(capture) = &report.capture else {
        return;
    };
    let path = dir.join(format!("{}.txt", report.address));
    match fs::write(&path, capture) {
        Ok(()) => info!("{}: capture written to {}", report.address, path.display()),
        Err(e) => warn!("{}: cannot write {}: {}", report.address, path.display(), e),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("cannot open log file: {e}");
        return ExitCode::FAILURE;
    }

    let inventory = match fs::read_to_string(&args.inventory) {
        Ok(text) => text,
        Err(e) => {
            error!("cannot read {}: {}", args.inventory.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let auth = match auth_method(&args) {
        Ok(auth) => auth,
        Err(e) => {
            error!("cannot read password: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let platform = match catalyst::platform() {
        Ok(platform) => platform,
        Err(e) => {
            error!("invalid platform pattern: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut config = SshConfig::new(args.user.as_str(), auth)
        .with_port(args.port)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_host_key_verification(args.host_keys);
    if let Some(path) = &args.known_hosts {
        config = config.with_known_hosts(path);
    }
    let connector = SshConnector::new(config, platform.clone());

    if args.live {
        if let Err(e) = fs::create_dir_all(&args.capture_dir) {
            error!("cannot create {}: {}", args.capture_dir.display(), e);
            return ExitCode::FAILURE;
        }
    } else {
        info!("dry run: no commands will be sent (use --live to apply)");
    }

    let mode = if args.live { RunMode::Live } else { RunMode::DryRun };
    let mut ctx = RunContext::new(mode, Duration::from_millis(args.settle_delay_ms));
    let records = portreset::parse_inventory(&inventory);

    let result = portreset::run_all(&connector, &platform, records, &mut ctx, |report| {
        write_capture(&args.capture_dir, report)
    })
    .await;

    ctx.stats.log_summary();

    if let Some(path) = &args.summary_json {
        match serde_json::to_string_pretty(&ctx.stats) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    warn!("cannot write {}: {}", path.display(), e);
                }
            }
            Err(e) => warn!("cannot serialize run summary: {}", e),
        }
    }

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("run aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_key_passphrase_reaches_auth() {
        let args = Args::try_parse_from([
            "portreset",
            "inventory.txt",
            "--user",
            "netops",
            "--key",
            "/home/netops/.ssh/id_ed25519",
            "--key-passphrase",
            "open sesame",
        ])
        .unwrap();

        match auth_method(&args).unwrap() {
            AuthMethod::PrivateKey { path, passphrase } => {
                assert_eq!(path, PathBuf::from("/home/netops/.ssh/id_ed25519"));
                assert_eq!(passphrase.unwrap().expose_secret(), "open sesame");
            }
            other => panic!("unexpected auth: {other:?}"),
        }
    }

    #[test]
    fn test_key_passphrase_requires_key() {
        let parsed = Args::try_parse_from([
            "portreset",
            "inventory.txt",
            "--user",
            "netops",
            "--password",
            "pw",
            "--key-passphrase",
            "open sesame",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_default_log_file_is_timestamped() {
        let name = default_log_file().to_string_lossy().into_owned();
        assert!(name.starts_with("portreset_"));
        assert!(name.ends_with(".log"));
        // portreset_YYYY-MM-DD_HH-MM-SS.log
        assert_eq!(name.len(), "portreset_".len() + 19 + ".log".len());
        assert!(!name.contains(':'));
    }

    #[test]
    fn test_log_file_and_stderr_conflict() {
        let parsed = Args::try_parse_from([
            "portreset",
            "inventory.txt",
            "--user",
            "netops",
            "--log-file",
            "run.log",
            "--log-stderr",
        ]);
        assert!(parsed.is_err());
    }
}
