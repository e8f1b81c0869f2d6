use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::info;
use metar_decoder::{
    decode_input, normalize_station, normalize_wfo, open_output, pretty_json,
    AreaForecastDiscussion, DecodedOutput, MetarError, MetarFormat, WeatherClient,
    DEFAULT_USER_AGENT,
};
use std::error::Error;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "metar-tool",
    version,
    about = "Fetch and decode METAR observations and NWS forecast discussions",
    long_about = None,
    after_help = "Examples:\n  metar-tool --obs KRDU\n  metar-tool --obs KTYS --json --pretty\n  metar-tool --obs KRDU --decode\n  metar-tool --forecast nws mrx\n  echo 'KRDU 211251Z 00000KT 10SM CLR 22/18 A2969' | metar-tool --decode"
)]
struct Args {
    /// Fetch the current METAR for a station (e.g. KRDU)
    #[arg(long, value_name = "STATION")]
    obs: Option<String>,

    /// For --obs: request JSON instead of raw METAR text
    #[arg(long)]
    json: bool,

    /// For --json: pretty-print the JSON
    #[arg(long)]
    pretty: bool,

    /// Forecast provider. Supported: "nws"
    #[arg(long, value_name = "PROVIDER")]
    forecast: Option<String>,

    /// Forecast office for --forecast nws (e.g. mrx or kmrx)
    #[arg(value_name = "WFO")]
    wfo: Option<String>,

    /// Decode into readable lines; reads stdin unless --obs is given
    #[arg(long)]
    decode: bool,

    /// HTTP timeout (e.g. 500ms, 10s, 2m)
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout, default_value = "10s")]
    timeout: Duration,

    /// User-Agent sent to the APIs
    #[arg(long, value_name = "UA", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Write output to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Observation(String),
    Forecast(String),
    DecodeStdin,
}

/// Parses `500ms`, `10s`, `2m`, `1h` or bare seconds.
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    let value: f64 = number
        .parse()
        .map_err(|_| format!("invalid duration '{}'", s))?;
    let seconds = match unit {
        "ms" => value / 1000.0,
        "" | "s" => value,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        _ => return Err(format!("unknown duration unit '{}' in '{}'", unit, s)),
    };
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(format!("duration must be positive, got '{}'", s));
    }
    Duration::try_from_secs_f64(seconds)
        .map_err(|e| format!("duration out of range '{}': {}", s, e))
}

fn select_mode(args: &Args) -> Result<Mode, (ErrorKind, &'static str)> {
    if let Some(station) = args.obs.as_deref().map(normalize_station) {
        if !station.is_empty() {
            return Ok(Mode::Observation(station));
        }
    }
    match args.forecast.as_deref().map(str::to_ascii_lowercase) {
        Some(provider) if provider == "nws" => match args.wfo.as_deref().map(normalize_wfo) {
            Some(wfo) if !wfo.is_empty() => Ok(Mode::Forecast(wfo)),
            _ => Err((
                ErrorKind::MissingRequiredArgument,
                "missing WFO id (e.g. \"mrx\" or \"kmrx\")",
            )),
        },
        Some(_) => Err((
            ErrorKind::InvalidValue,
            "unsupported --forecast value (supported: \"nws\")",
        )),
        None if args.decode => Ok(Mode::DecodeStdin),
        None => Err((
            ErrorKind::MissingRequiredArgument,
            "missing --forecast (e.g. --forecast nws mrx), --obs KRDU or --decode",
        )),
    }
}

fn client(args: &Args) -> Result<WeatherClient, MetarError> {
    Ok(WeatherClient::builder()
        .timeout(args.timeout)
        .user_agent(args.user_agent.clone())
        .build()?)
}

/// What a run produces, before anything is written.
enum Rendered {
    Decoded(DecodedOutput),
    Text(String),
    Forecast(AreaForecastDiscussion),
}

impl Rendered {
    fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            Rendered::Decoded(decoded) => decoded.write_to(out),
            Rendered::Text(text) => writeln!(out, "{}", text),
            Rendered::Forecast(afd) => afd.write_to(out),
        }
    }
}

fn read_input<R: Read>(mut reader: R) -> Result<String, MetarError> {
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .map_err(MetarError::InputRead)?;
    info!("Read {} bytes of input", input.len());
    Ok(input)
}

async fn run(args: &Args, mode: Mode) -> Result<(), MetarError> {
    let rendered = match mode {
        Mode::Observation(station) => {
            let format = if args.json {
                MetarFormat::Json
            } else {
                MetarFormat::Raw
            };
            let body = client(args)?.metar(&station, format).await?;
            if args.decode {
                Rendered::Decoded(decode_input(&body)?)
            } else if args.json && args.pretty {
                Rendered::Text(pretty_json(&body)?)
            } else {
                Rendered::Text(body)
            }
        }
        Mode::Forecast(wfo) => {
            Rendered::Forecast(client(args)?.latest_area_forecast_discussion(&wfo).await?)
        }
        Mode::DecodeStdin => Rendered::Decoded(decode_input(&read_input(io::stdin().lock())?)?),
    };

    let mut out = open_output(args.output.as_deref())?;
    rendered
        .write_to(&mut out)
        .and_then(|()| out.flush())
        .map_err(MetarError::OutputWrite)
}

/// The error and its causes joined into one line.
fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mode = match select_mode(&args) {
        Ok(mode) => mode,
        Err((kind, message)) => Args::command().error(kind, message).exit(),
    };

    match run(&args, mode).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {}", error_chain(&e));
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("metar-tool").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("10s"), Ok(Duration::from_secs(10)));
        assert_eq!(parse_timeout("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_timeout("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_timeout("7"), Ok(Duration::from_secs(7)));
        assert!(parse_timeout("0s").is_err());
        assert!(parse_timeout("10 parsecs").is_err());
        assert!(parse_timeout("s").is_err());
        assert!(parse_timeout("99999999999999999999999h").is_err());
    }

    #[test]
    fn test_obs_takes_precedence() {
        let a = args(&["--obs", " krdu ", "--forecast", "nws", "mrx"]);
        assert_eq!(select_mode(&a), Ok(Mode::Observation("KRDU".to_string())));
        assert_eq!(a.timeout, Duration::from_secs(10));
        assert_eq!(a.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_forecast_mode() {
        let a = args(&["--forecast", "NWS", "kmrx"]);
        assert_eq!(select_mode(&a), Ok(Mode::Forecast("MRX".to_string())));

        let a = args(&["--forecast", "nws"]);
        assert_eq!(
            select_mode(&a).map_err(|(kind, _)| kind),
            Err(ErrorKind::MissingRequiredArgument)
        );

        let a = args(&["--forecast", "ecmwf", "mrx"]);
        assert_eq!(
            select_mode(&a).map_err(|(kind, _)| kind),
            Err(ErrorKind::InvalidValue)
        );
    }

    #[test]
    fn test_decode_and_no_mode() {
        assert_eq!(select_mode(&args(&["--decode"])), Ok(Mode::DecodeStdin));
        assert!(select_mode(&args(&[])).is_err());
        // A blank station does not count as --obs.
        assert!(select_mode(&args(&["--obs", " "])).is_err());
    }

    #[test]
    fn test_unreadable_input_is_a_read_error() {
        let err = read_input(&[b'K', 0xff, 0xfe][..]).unwrap_err();
        assert!(matches!(err, MetarError::InputRead(_)));
        assert!(error_chain(&err).starts_with("Failed to read input: "));

        assert_eq!(read_input(&b"KRDU 211251Z AUTO\n"[..]).unwrap(), "KRDU 211251Z AUTO\n");
    }

    #[test]
    fn test_rendered_text_ends_with_newline() {
        let mut out = Vec::new();
        Rendered::Text("KRDU 211251Z AUTO".to_string())
            .write_to(&mut out)
            .unwrap();
        assert_eq!(out, b"KRDU 211251Z AUTO\n");
    }

    #[test]
    fn test_error_chain() {
        let err = MetarError::OutputCreate(
            PathBuf::from("/nope/out.txt"),
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(
            error_chain(&err),
            "Failed to create output file '/nope/out.txt': not found"
        );
    }
}
