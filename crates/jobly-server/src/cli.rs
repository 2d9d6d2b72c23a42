use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Serve(ServeArgs),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// Explicit config path; when unset, `JOBLY_CONFIG` or `jobly.toml`.
    pub config: Option<PathBuf>,
    pub bind: Option<String>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1).map(|s| s.as_str());
    let mut serve = ServeArgs::default();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                serve.config = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--config=") => {
                serve.config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            "--bind" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--bind requires a value");
                };
                serve.bind = Some(v.to_string());
            }
            _ if token.starts_with("--bind=") => {
                serve.bind = Some(token.trim_start_matches("--bind=").to_string());
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Serve(serve))
}

pub fn print_help() {
    println!(
        "\
jobly-server - JSON API for companies, jobs and users

USAGE:
  jobly-server [OPTIONS]

OPTIONS:
  --config <PATH>   Config file (default: $JOBLY_CONFIG or jobly.toml)
  --bind <ADDR>     Listen address, overrides [server] bind
  -h, --help        Print help

ENVIRONMENT:
  DATABASE_URL      Overrides [database] url
  JOBLY_BIND        Overrides [server] bind
  RUST_LOG          Log filter (default: info,jobly.sql=debug)"
    );
}
